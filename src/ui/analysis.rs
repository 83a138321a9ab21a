use bevy_egui::egui;

use crate::journal::JournalSubmissionController;

/// Mood and summary card. Clicking it opens the entry dialog.
pub fn draw_card(ui: &mut egui::Ui, controller: &mut JournalSubmissionController) {
    let Some(analysis) = controller.state().analysis.clone() else {
        return;
    };

    let response = egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(16))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(egui::RichText::new("Your Mood").strong());
            ui.weak(&analysis.mood);
            ui.add_space(8.0);
            ui.label(egui::RichText::new("Summary").strong());
            ui.weak(&analysis.summary);
            if let Some(insights) = &analysis.key_insights {
                ui.add_space(8.0);
                ui.label(egui::RichText::new("Key Insights").strong());
                ui.weak(insights);
            }
        })
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);

    if response.clicked() {
        controller.open_analysis();
    }
}

/// "Your Journal Entry" dialog showing the saved entry verbatim
pub fn draw_entry_dialog(ctx: &egui::Context, controller: &mut JournalSubmissionController) {
    if !controller.state().popup_visible {
        return;
    }

    let mut open = true;
    let entry = controller.state().saved_entry.clone().unwrap_or_default();
    egui::Window::new("Your Journal Entry")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(480.0)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .max_height(400.0)
                .show(ui, |ui| {
                    ui.add(egui::Label::new(entry).wrap());
                });
        });

    if !open {
        controller.close_analysis();
    }
}
