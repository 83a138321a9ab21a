use bevy_egui::egui;
use bevy_egui::egui::{Align, Layout};

use crate::journal::JournalSubmissionController;

/// Draw the journal box and the Save button.
///
/// `focus` puts the cursor in the journal box this frame. Returns true when
/// the user asked to save and saving is allowed.
pub fn draw(ui: &mut egui::Ui, controller: &mut JournalSubmissionController, focus: bool) -> bool {
    let draft_id = ui.make_persistent_id("journal_draft");

    // Ctrl/Cmd+Enter saves; take the key before the text box turns it into a newline
    let shortcut = ui.memory(|m| m.has_focus(draft_id))
        && ui.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::Enter));

    let text_edit = egui::TextEdit::multiline(controller.draft_mut())
        .id(draft_id)
        .hint_text("Write about your day...")
        .desired_rows(10)
        .desired_width(f32::INFINITY)
        .margin(egui::vec2(8.0, 8.0));
    let response = ui.add(text_edit);

    if focus {
        response.request_focus();
    }

    let mut clicked = false;
    ui.add_space(8.0);
    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
        let label = if controller.is_saving() {
            "Saving..."
        } else {
            "Save"
        };
        let button = egui::Button::new(label).min_size(egui::vec2(96.0, 28.0));
        clicked = ui.add_enabled(controller.can_submit(), button).clicked();
        ui.small("Ctrl+Enter to save");
    });

    (clicked || shortcut) && controller.can_submit()
}
