use metronaut::ui::app::MetronomeApp;
use metronaut::{AudioEngine, Metronome, create_command_channel, create_notification_channel};
use std::sync::{Arc, Mutex};

// Ringbuffer capacities: triggers arrive at most a few per second, so
// small buffers leave plenty of headroom
const COMMAND_RINGBUFFER_CAPACITY: usize = 256;
const NOTIFICATION_RINGBUFFER_CAPACITY: usize = 256;

fn main() {
    println!("=== Metronaut ===\n");

    let (command_tx, command_rx) = create_command_channel(COMMAND_RINGBUFFER_CAPACITY);

    // Notification channel (for error reporting in the status bar)
    let (notification_tx, notification_rx) =
        create_notification_channel(NOTIFICATION_RINGBUFFER_CAPACITY);
    let notification_tx = Arc::new(Mutex::new(notification_tx));

    println!("Audio engine initialisation...");
    let audio_engine = match AudioEngine::new(command_rx, notification_tx) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return;
        }
    };

    println!("Graphical UI launching...\n");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 320.0])
            .with_title("Metronaut"),
        ..Default::default()
    };

    let _ = eframe::run_native(
        "Metronaut",
        native_options,
        Box::new(|_cc| {
            // The engine stays owned by main so the stream outlives the UI
            let metronome = Metronome::new(command_tx);
            let app = MetronomeApp::new(metronome, audio_engine.volume.clone(), notification_rx);
            Ok(Box::new(app))
        }),
    );
}
