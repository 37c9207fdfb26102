// UI - egui application

pub mod app;

pub use app::MetronomeApp;
