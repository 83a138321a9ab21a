use bevy_egui::egui;
use tracing::trace;

pub mod analysis;
pub mod composer;
pub mod history;
pub mod toasts;

// UI initialization and management
pub fn init() {
    trace!("Initializing UI components...");
}

pub fn apply_theme(ctx: &egui::Context, dark_mode: bool) {
    let visuals = if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    ctx.set_visuals(visuals);
}
