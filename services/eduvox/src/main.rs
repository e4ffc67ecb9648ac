//! Main Entrypoint for Eduvox
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Acquiring the speech engine, the microphone and the canvas.
//! 4. Running the voice command loop until the user says "exit".

use anyhow::Context;
use eduvox_core::{GridSpec, Session, SessionOptions};
use eduvox_service::{
    canvas::PngCanvas, config::Config, listener::MicrophoneListener, microphone::Microphone,
    speaker::EspeakSpeaker, stt::WhisperClient,
};
use tracing::info;

fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing adapters...");

    // --- 3. Initialize Adapters ---
    let speaker = EspeakSpeaker::new(&config.espeak_bin)
        .with_context(|| format!("Failed to start speech engine '{}'", config.espeak_bin.display()))?;

    let microphone = Microphone::open_default().context("Failed to open microphone")?;
    info!(
        device = %microphone.name(),
        sample_rate = microphone.sample_rate(),
        channels = microphone.channels(),
        "Microphone ready"
    );

    let transcriber = WhisperClient::new(
        &config.stt_base_url,
        config.stt_api_key.clone(),
        config.stt_model.clone(),
        config.stt_language.clone(),
    )?;
    info!(endpoint = %transcriber.endpoint(), model = %config.stt_model, "Speech recognition configured");

    let listener = MicrophoneListener::new(microphone, transcriber);
    let canvas = PngCanvas::new(&config.canvas_path);
    info!(path = %canvas.path().display(), "Drawing to canvas image");

    // --- 4. Run the Command Loop ---
    let options = SessionOptions {
        grid: GridSpec::default(),
        listen_timeout: config.listen_timeout,
    };
    let mut session = Session::new(listener, speaker, canvas, options);
    let handled = session.run().context("Voice session failed")?;

    info!(handled, "Eduvox has shut down.");
    Ok(())
}
