// Main application window

use crate::audio::parameters::AtomicF32;
use crate::messaging::channels::NotificationConsumer;
use crate::messaging::notification::{Notification, NotificationLevel};
use crate::sequencer::metronome::Metronome;
use crate::sequencer::timing::{MAX_BPM, MIN_BPM};
use eframe::egui;
use std::collections::VecDeque;

/// Step applied by the tempo +/- buttons
const TEMPO_STEP: u32 = 10;

/// Upper bound for the multiplier input widget
const MAX_MULTIPLIER: u32 = 16;

pub struct MetronomeApp {
    metronome: Metronome,
    volume_atomic: AtomicF32,
    volume_ui: f32,
    tempo_ui: u32,
    multiplier_ui: u32,
    // Notification system
    notification_rx: NotificationConsumer,
    notification_queue: VecDeque<Notification>,
    max_notifications: usize,
}

impl MetronomeApp {
    pub fn new(
        metronome: Metronome,
        volume_atomic: AtomicF32,
        notification_rx: NotificationConsumer,
    ) -> Self {
        let initial_volume = volume_atomic.get();
        let tempo_ui = metronome.tempo_bpm();
        let multiplier_ui = metronome.beat_multiplier();

        Self {
            metronome,
            volume_atomic,
            volume_ui: initial_volume,
            tempo_ui,
            multiplier_ui,
            notification_rx,
            notification_queue: VecDeque::new(),
            max_notifications: 10,
        }
    }

    /// Drain new notifications from the ringbuffer into the queue
    fn update_notifications(&mut self) {
        while let Some(notification) =
            ringbuf::traits::Consumer::try_pop(&mut self.notification_rx)
        {
            self.notification_queue.push_back(notification);

            if self.notification_queue.len() > self.max_notifications {
                self.notification_queue.pop_front();
            }
        }
    }

    /// Notifications younger than 5 seconds, newest first
    fn get_recent_notifications(&self) -> Vec<&Notification> {
        self.notification_queue
            .iter()
            .rev()
            .filter(|n| n.is_recent(5000))
            .take(3)
            .collect()
    }

    fn apply_tempo(&mut self, bpm: u32) {
        self.metronome.set_tempo(bpm);
        // Read back so the widget shows the clamped value
        self.tempo_ui = self.metronome.tempo_bpm();
    }

    fn apply_multiplier(&mut self, multiplier: u32) {
        self.metronome.set_beat_multiplier(multiplier);
        self.multiplier_ui = self.metronome.beat_multiplier();
    }

    fn draw_transport_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Tempo:");
            let mut tempo = self.tempo_ui;
            let drag = egui::DragValue::new(&mut tempo)
                .range(MIN_BPM..=MAX_BPM)
                .suffix(" BPM");
            if ui.add(drag).changed() {
                self.tempo_ui = tempo;
            }
            if ui.button("+").clicked() {
                self.tempo_ui = self.tempo_ui.saturating_add(TEMPO_STEP);
            }
            if ui.button("−").clicked() {
                self.tempo_ui = self.tempo_ui.saturating_sub(TEMPO_STEP);
            }
        });
        if self.tempo_ui != self.metronome.tempo_bpm() {
            self.apply_tempo(self.tempo_ui);
        }

        ui.horizontal(|ui| {
            ui.label("Subdivision:");
            let mut multiplier = self.multiplier_ui;
            let drag = egui::DragValue::new(&mut multiplier).range(1..=MAX_MULTIPLIER);
            if ui.add(drag).changed() {
                self.multiplier_ui = multiplier;
            }
            if ui.button("+").clicked() {
                self.multiplier_ui = (self.multiplier_ui + 1).min(MAX_MULTIPLIER);
            }
            if ui.button("−").clicked() {
                // Values below 1 are rejected downstream as well
                self.multiplier_ui = self.multiplier_ui.saturating_sub(1).max(1);
            }
        });
        if self.multiplier_ui != self.metronome.beat_multiplier() {
            self.apply_multiplier(self.multiplier_ui);
        }

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            if ui.button("▶ Start").clicked() {
                self.metronome.start();
            }
            if ui.button("⏹ Stop").clicked() {
                self.metronome.stop();
            }

            if self.metronome.is_running() {
                ui.colored_label(egui::Color32::GREEN, "●");
                ui.label("running");
            } else {
                ui.colored_label(egui::Color32::GRAY, "○");
                ui.label("stopped");
            }
        });
    }

    fn draw_beat_row(&self, ui: &mut egui::Ui) {
        let shared = self.metronome.shared_state();
        let current = shared.current_slot();
        let multiplier = self.metronome.beat_multiplier().max(1) as usize;
        let pattern = self.metronome.pattern();

        ui.horizontal_wrapped(|ui| {
            for index in 0..pattern.len() {
                let is_group_start = index % multiplier == 0;
                let is_current = current == index as i64;

                // Beat number on group starts, a dot on subdivision fillers
                let text = if is_group_start {
                    format!("{}", index / multiplier + 1)
                } else {
                    "·".to_string()
                };

                let color = if is_current {
                    egui::Color32::WHITE
                } else {
                    egui::Color32::DARK_GRAY
                };

                let mut rich = egui::RichText::new(text).size(32.0).color(color);
                if index == 0 {
                    // Downbeat accent drawn heavier
                    rich = rich.strong();
                }

                ui.label(rich);
            }
        });
    }

    fn draw_status_bar(&self, ui: &mut egui::Ui) {
        ui.separator();
        ui.horizontal(|ui| {
            let recent_notifications = self.get_recent_notifications();

            if recent_notifications.is_empty() {
                ui.label("Ready");
            } else {
                for notification in recent_notifications {
                    let (icon, color) = match notification.level {
                        NotificationLevel::Info => ("ℹ", egui::Color32::from_rgb(100, 150, 255)),
                        NotificationLevel::Warning => ("⚠", egui::Color32::from_rgb(255, 165, 0)),
                        NotificationLevel::Error => ("✖", egui::Color32::RED),
                    };

                    ui.colored_label(color, icon);
                    ui.colored_label(color, &notification.message);
                    ui.add_space(10.0);
                }
            }
        });
    }
}

impl eframe::App for MetronomeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keep the highlight moving while the clock runs
        ctx.request_repaint();

        self.update_notifications();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Metronaut");
            ui.separator();
            ui.add_space(10.0);

            self.draw_transport_controls(ui);

            ui.add_space(10.0);
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Volume:");
                if ui
                    .add(egui::Slider::new(&mut self.volume_ui, 0.0..=1.0))
                    .changed()
                {
                    self.volume_atomic.set(self.volume_ui);
                }
            });

            ui.add_space(20.0);
            self.draw_beat_row(ui);

            ui.add_space(10.0);
            self.draw_status_bar(ui);
        });
    }
}
