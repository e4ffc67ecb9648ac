//! The real `SpeechInput`: microphone capture followed by remote transcription.

use crate::audio_utils::{STT_SAMPLE_RATE, encode_wav, resample_mono};
use crate::microphone::{Capture, CaptureError, Microphone};
use crate::stt::{SttError, Transcriber};
use eduvox_core::{SpeechInput, Transcript};
use std::time::Duration;
use tracing::{error, info, warn};

pub struct MicrophoneListener<T> {
    microphone: Microphone,
    transcriber: T,
}

impl<T: Transcriber> MicrophoneListener<T> {
    pub fn new(microphone: Microphone, transcriber: T) -> Self {
        Self {
            microphone,
            transcriber,
        }
    }
}

impl<T: Transcriber> SpeechInput for MicrophoneListener<T> {
    fn listen(&mut self, timeout: Duration) -> Transcript {
        info!("Listening...");
        let capture = self.microphone.capture(timeout);
        transcribe_capture(capture, &self.transcriber)
    }
}

/// Turns a capture result into a transcript.
///
/// Every failure mode is logged and collapsed into an empty transcript.
pub fn transcribe_capture<T: Transcriber + ?Sized>(
    capture: Result<Capture, CaptureError>,
    transcriber: &T,
) -> Transcript {
    let (samples, sample_rate) = match capture {
        Ok(Capture::Phrase {
            samples,
            sample_rate,
        }) => (samples, sample_rate),
        Ok(Capture::TimedOut) => {
            info!("Listening timed out.");
            return Transcript::empty();
        }
        Err(e) => {
            error!(error = %e, "Audio capture failed");
            return Transcript::empty();
        }
    };

    let wav = match resample_mono(&samples, sample_rate, STT_SAMPLE_RATE)
        .and_then(|resampled| encode_wav(&resampled, STT_SAMPLE_RATE))
    {
        Ok(wav) => wav,
        Err(e) => {
            error!(error = ?e, "Failed to prepare audio for transcription");
            return Transcript::empty();
        }
    };

    match transcriber.transcribe(wav) {
        Ok(text) => {
            let transcript = Transcript::new(text);
            info!(command = %transcript, "Recognized");
            transcript
        }
        Err(SttError::Unrecognized) => {
            info!("Could not understand the command.");
            Transcript::empty()
        }
        Err(e) => {
            warn!(error = %e, "Transcription request failed");
            Transcript::empty()
        }
    }
}
