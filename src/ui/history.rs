use bevy_egui::egui;

use crate::journal::{EntryHistory, EntryRecord};

/// What the user asked for in the past entries window this frame
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HistoryActions {
    pub refresh: bool,
    /// A delete was confirmed; `EntryHistory::begin_delete` has the id
    pub delete: bool,
}

/// Past entries window
pub fn draw(ctx: &egui::Context, history: &mut EntryHistory) -> HistoryActions {
    let mut actions = HistoryActions::default();
    if !history.visible {
        return actions;
    }

    let mut open = true;
    egui::Window::new("Past Entries")
        .open(&mut open)
        .default_width(460.0)
        .default_height(520.0)
        .show(ctx, |ui| {
            let mut submitted = false;
            ui.horizontal(|ui| {
                for (label, date) in [("From", &mut history.start_date), ("To", &mut history.end_date)] {
                    ui.label(label);
                    let field = ui.add(
                        egui::TextEdit::singleline(date)
                            .hint_text("YYYY-MM-DD")
                            .desired_width(90.0),
                    );
                    submitted |= field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                }
            });
            ui.horizontal(|ui| {
                let search = ui.add(
                    egui::TextEdit::singleline(&mut history.search)
                        .hint_text("Search entries...")
                        .desired_width(240.0),
                );
                submitted |= search.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let button = ui.add_enabled(!history.loading, egui::Button::new("Refresh"));
                actions.refresh = submitted || button.clicked();
                if history.loading || history.deleting.is_some() {
                    ui.spinner();
                }
            });

            if let Some(error) = &history.last_error {
                ui.colored_label(ui.visuals().error_fg_color, error);
            }
            ui.separator();

            if history.entries.is_empty() && !history.loading {
                ui.weak("No entries found for the selected filters.");
            }

            let mut asked: Option<String> = None;
            let mut cancelled = false;
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for (index, record) in history.entries.iter().enumerate() {
                        let confirming = record.id.is_some()
                            && history.confirm_delete.as_deref() == record.id.as_deref();
                        let busy = history.deleting.is_some();

                        egui::CollapsingHeader::new(row_title(record))
                            .id_salt(("entry", index))
                            .show(ui, |ui| {
                                ui.label(&record.entry);
                                if let Some(analysis) = record.analysis() {
                                    ui.separator();
                                    ui.label(format!("Mood: {}", analysis.mood));
                                    ui.label(format!("Summary: {}", analysis.summary));
                                    if let Some(insights) = &analysis.key_insights {
                                        ui.label(format!("Key Insights: {}", insights));
                                    }
                                }

                                let Some(id) = &record.id else {
                                    return;
                                };
                                ui.separator();
                                if confirming {
                                    ui.horizontal(|ui| {
                                        ui.colored_label(
                                            ui.visuals().warn_fg_color,
                                            "Delete this entry?",
                                        );
                                        if ui.add_enabled(!busy, egui::Button::new("Yes, delete")).clicked() {
                                            actions.delete = true;
                                        }
                                        if ui.button("Cancel").clicked() {
                                            cancelled = true;
                                        }
                                    });
                                } else if ui.add_enabled(!busy, egui::Button::new("Delete")).clicked() {
                                    asked = Some(id.clone());
                                }
                            });
                        ui.add_space(2.0);
                    }
                });

            if cancelled {
                history.cancel_delete();
            }
            if let Some(id) = asked {
                history.request_delete(id);
            }
        });

    history.visible = open;
    actions
}

fn row_title(record: &EntryRecord) -> String {
    let date = record.date().unwrap_or("----------");
    match record.mood() {
        Some(mood) => format!("{}  {}  ({})", date, record.headline(), mood),
        None => format!("{}  {}", date, record.headline()),
    }
}
