use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy_egui::egui;
use bevy_egui::egui::{Align, Layout};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::journal::{
    EntryHistory, EntryRecord, HttpJournalService, JournalError, JournalService,
    JournalSubmissionController, SaveOutcome,
};
use crate::tasks::Pending;
use crate::ui;
use crate::ui::toasts::Toaster;

/// What the header badge shows about the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Checking,
    Online(String),
    Offline,
}

/// Everything on the page
#[derive(Resource)]
pub struct JournalPage {
    pub controller: JournalSubmissionController,
    pub toaster: Toaster,
    pub history: EntryHistory,
    pub health: HealthStatus,
    pub dark_mode: bool,
    /// Whether the journal box has been given its startup focus
    pub draft_focused: bool,
}

impl JournalPage {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            controller: JournalSubmissionController::new(),
            toaster: Toaster::new(config.toast_lifetime_secs),
            history: EntryHistory::new(),
            health: HealthStatus::Checking,
            dark_mode: config.dark_mode,
            draft_focused: false,
        }
    }

    /// True exactly once, on the first frame the composer is drawn
    pub fn take_initial_focus(&mut self) -> bool {
        !std::mem::replace(&mut self.draft_focused, true)
    }
}

/// The journal service and the runtime its requests run on
#[derive(Resource, Clone)]
pub struct Services {
    pub journal: Arc<dyn JournalService>,
    pub runtime: Handle,
}

/// Requests in flight, polled once per frame
#[derive(Resource, Default)]
pub struct Tasks {
    pub save: Pending<Result<SaveOutcome, JournalError>>,
    pub history: Pending<Result<Vec<EntryRecord>, JournalError>>,
    pub health: Pending<Result<String, JournalError>>,
    pub delete: Pending<Result<(), JournalError>>,
}

/// Registers the page resources and systems
pub struct JournalPlugin {
    pub config: AppConfig,
    pub services: Services,
}

impl Plugin for JournalPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(JournalPage::new(&self.config))
            .insert_resource(self.services.clone())
            .init_resource::<Tasks>()
            .add_systems(Startup, setup_system)
            .add_systems(Update, (poll_tasks, ui_system).chain());
    }
}

pub fn run(config: AppConfig) -> Result<()> {
    ui::init();

    let journal = HttpJournalService::with_config(config.service())
        .context("building journal service client")?;
    info!("Using journal service at {}", journal.config().base_url);

    let services = Services {
        journal: Arc::new(journal),
        runtime: Handle::current(),
    };

    App::new()
        // Tracing is set up by us, not by bevy
        .add_plugins(
            DefaultPlugins
                .build()
                .disable::<bevy::log::LogPlugin>()
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Check-In Digital Diary".to_string(),
                        resolution: (config.window_width, config.window_height).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(bevy_egui::EguiPlugin)
        .add_plugins(JournalPlugin { config, services })
        .run();

    Ok(())
}

// Setup function runs once at startup
fn setup_system(mut commands: Commands, mut tasks: ResMut<Tasks>, services: Res<Services>) {
    commands.spawn(Camera2d);

    let journal = services.journal.clone();
    tasks
        .health
        .start(&services.runtime, async move { journal.health().await });
}

fn start_save(controller: &mut JournalSubmissionController, tasks: &mut Tasks, services: &Services) {
    let Some(pending) = controller.begin_submit() else {
        return;
    };

    let journal = services.journal.clone();
    tasks.save.start(&services.runtime, async move {
        journal.save_entry(&pending.content).await
    });
}

fn start_history_refresh(history: &mut EntryHistory, tasks: &mut Tasks, services: &Services) {
    let Some(query) = history.begin_refresh() else {
        return;
    };
    debug!("Refreshing past entries ({:?})", query);

    let journal = services.journal.clone();
    tasks.history.start(&services.runtime, async move {
        journal.list_entries(&query).await
    });
}

fn start_delete(history: &mut EntryHistory, tasks: &mut Tasks, services: &Services) {
    let Some(id) = history.begin_delete() else {
        return;
    };
    debug!("Deleting entry {}", id);

    let journal = services.journal.clone();
    tasks.delete.start(&services.runtime, async move {
        journal.delete_entry(&id).await
    });
}

// Settle whatever came back since the last frame
fn poll_tasks(mut page: ResMut<JournalPage>, mut tasks: ResMut<Tasks>) {
    let page = &mut *page;

    if let Some(result) = tasks.save.poll() {
        let result = result.and_then(|inner| inner);
        let stored = matches!(
            result,
            Ok(SaveOutcome::Success { .. } | SaveOutcome::PartialSuccess { .. })
        );
        page.controller.settle(result, &mut page.toaster);
        if stored {
            page.history.mark_stale();
        }
    }

    if let Some(result) = tasks.history.poll() {
        page.history.settle(result.and_then(|inner| inner));
    }

    if let Some(result) = tasks.delete.poll() {
        page.history.settle_delete(result.and_then(|inner| inner));
    }

    if let Some(result) = tasks.health.poll() {
        page.health = match result.and_then(|inner| inner) {
            Ok(message) => {
                info!("Journal service is up: {}", message);
                HealthStatus::Online(message)
            }
            Err(e) => {
                warn!("Journal service health check failed: {}", e);
                HealthStatus::Offline
            }
        };
    }
}

// UI system runs every frame
fn ui_system(
    mut contexts: bevy_egui::EguiContexts,
    mut page: ResMut<JournalPage>,
    mut tasks: ResMut<Tasks>,
    services: Res<Services>,
    time: Res<Time>,
) {
    let ctx = contexts.ctx_mut();
    let focus_draft = page.take_initial_focus();
    let JournalPage {
        controller,
        toaster,
        history,
        health,
        dark_mode,
        ..
    } = &mut *page;

    toaster.tick(time.elapsed_secs_f64());
    ui::apply_theme(ctx, *dark_mode);

    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.heading("Check-In Digital Diary");
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button(if *dark_mode { "☀" } else { "🌙" }).clicked() {
                    *dark_mode = !*dark_mode;
                }
                if ui.button("Past entries").clicked() {
                    history.visible = !history.visible;
                }
                match health {
                    HealthStatus::Checking => {
                        ui.weak("checking service...");
                    }
                    HealthStatus::Online(message) => {
                        ui.colored_label(egui::Color32::from_rgb(100, 200, 120), "● online")
                            .on_hover_text(message.as_str());
                    }
                    HealthStatus::Offline => {
                        ui.colored_label(ui.visuals().error_fg_color, "● offline");
                    }
                }
            });
        });
        ui.add_space(6.0);
    });

    let mut save_requested = false;
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.set_max_width(760.0);
                egui::Frame::group(ui.style())
                    .inner_margin(egui::Margin::same(16))
                    .show(ui, |ui| {
                        save_requested = ui::composer::draw(ui, controller, focus_draft);
                    });
                ui.add_space(16.0);
                ui::analysis::draw_card(ui, controller);
            });
    });

    ui::analysis::draw_entry_dialog(ctx, controller);
    let history_actions = ui::history::draw(ctx, history);
    ui::toasts::draw(ctx, toaster);

    if save_requested {
        start_save(controller, &mut tasks, &services);
    }
    if history_actions.delete {
        start_delete(history, &mut tasks, &services);
    }
    if history_actions.refresh || history.needs_refresh() {
        start_history_refresh(history, &mut tasks, &services);
    }
}
