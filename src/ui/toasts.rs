use bevy_egui::egui;
use std::collections::VecDeque;

use crate::notify::{Notification, Notifier, Severity};

/// Most toasts on screen at once; older ones are pushed out
const MAX_TOASTS: usize = 3;

pub struct Toast {
    id: u64,
    pub notification: Notification,
    shown_at: f64,
}

/// Notification surface for the window: stacked toasts in the bottom-right
/// corner that expire on their own or when clicked.
pub struct Toaster {
    toasts: VecDeque<Toast>,
    lifetime: f64,
    now: f64,
    next_id: u64,
}

impl Toaster {
    pub fn new(lifetime_secs: f64) -> Self {
        Self {
            toasts: VecDeque::new(),
            lifetime: lifetime_secs,
            now: 0.0,
            next_id: 0,
        }
    }

    /// Advance the clock and drop toasts that have outlived their lifetime
    pub fn tick(&mut self, now: f64) {
        self.now = now;
        let lifetime = self.lifetime;
        self.toasts.retain(|toast| now - toast.shown_at < lifetime);
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Notifier for Toaster {
    fn notify(&mut self, notification: Notification) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            id: self.next_id,
            notification,
            shown_at: self.now,
        });
        self.next_id += 1;
    }
}

pub fn draw(ctx: &egui::Context, toaster: &mut Toaster) {
    if toaster.is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.set_max_width(320.0);
            for toast in toaster.iter() {
                let (fill, text) = match toast.notification.severity {
                    Severity::Normal => (ui.visuals().extreme_bg_color, ui.visuals().text_color()),
                    Severity::Destructive => {
                        (egui::Color32::from_rgb(127, 29, 29), egui::Color32::WHITE)
                    }
                };

                let response = egui::Frame::popup(ui.style())
                    .fill(fill)
                    .inner_margin(egui::Margin::same(12))
                    .show(ui, |ui| {
                        ui.set_min_width(280.0);
                        ui.label(
                            egui::RichText::new(&toast.notification.title)
                                .strong()
                                .color(text),
                        );
                        ui.label(egui::RichText::new(&toast.notification.description).color(text));
                    })
                    .response
                    .interact(egui::Sense::click());

                if response.clicked() {
                    dismissed = Some(toast.id);
                }
                ui.add_space(6.0);
            }
        });

    if let Some(id) = dismissed {
        toaster.dismiss(id);
    }
    // Keep repainting so toasts expire even without input
    ctx.request_repaint_after(std::time::Duration::from_millis(250));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_lifetime() {
        let mut toaster = Toaster::new(5.0);
        toaster.tick(10.0);
        toaster.notify(Notification::saved());

        toaster.tick(14.9);
        assert_eq!(toaster.iter().count(), 1);

        toaster.tick(15.0);
        assert!(toaster.is_empty());
    }

    #[test]
    fn oldest_toast_makes_room() {
        let mut toaster = Toaster::new(5.0);
        toaster.notify(Notification::saved());
        toaster.notify(Notification::partially_saved());
        toaster.notify(Notification::save_failed());
        toaster.notify(Notification::new("Fourth", "", Severity::Normal));

        let titles: Vec<&str> = toaster
            .iter()
            .map(|t| t.notification.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Partially Saved", "Error", "Fourth"]);
    }

    #[test]
    fn dismiss_removes_only_that_toast() {
        let mut toaster = Toaster::new(5.0);
        toaster.notify(Notification::saved());
        toaster.notify(Notification::save_failed());
        let first = toaster.iter().next().unwrap().id;

        toaster.dismiss(first);
        assert_eq!(toaster.iter().count(), 1);
        assert_eq!(toaster.iter().next().unwrap().notification.title, "Error");
    }
}
