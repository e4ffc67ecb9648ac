//! Microphone capture through the default cpal input device.

use crate::audio_utils::{convert_i16_to_f32, downmix_to_mono};
use crate::phrase::{
    CALIBRATION_DURATION, PHRASE_TIME_LIMIT, PhraseDetector, PhraseEvent, ambient_threshold,
};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// How long to wait for the driver to deliver a buffer before giving up.
const DEVICE_STALL_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no audio input device found")]
    NoDevice,
    #[error("unsupported input sample format: {0:?}")]
    UnsupportedFormat(SampleFormat),
    #[error("audio device error: {0}")]
    Device(String),
    #[error("audio device stopped delivering samples")]
    Stalled,
}

/// Result of one capture attempt.
#[derive(Debug)]
pub enum Capture {
    /// A phrase of mono samples at `sample_rate`.
    Phrase { samples: Vec<f32>, sample_rate: u32 },
    /// Nobody spoke within the listen window.
    TimedOut,
}

/// The default input device, described at startup and reopened per capture.
pub struct Microphone {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
}

impl Microphone {
    /// Finds the default input device. Fails when the machine has none.
    pub fn open_default() -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;
        let config = device
            .default_input_config()
            .map_err(|e| CaptureError::Device(e.to_string()))?;
        Ok(Self { device, config })
    }

    pub fn name(&self) -> String {
        self.device.name().unwrap_or_else(|_| "unknown".to_string())
    }

    pub fn sample_rate(&self) -> u32 {
        let SampleRate(rate) = self.config.sample_rate();
        rate
    }

    pub fn channels(&self) -> usize {
        usize::from(self.config.channels())
    }

    /// Calibrates against ambient noise, then records one phrase.
    ///
    /// The input stream lives only for the duration of this call.
    pub fn capture(&self, timeout: Duration) -> Result<Capture, CaptureError> {
        let (tx, rx) = mpsc::channel::<Vec<f32>>();
        let stream = self.build_stream(tx)?;
        stream
            .play()
            .map_err(|e| CaptureError::Device(e.to_string()))?;

        let sample_rate = self.sample_rate();
        let channels = self.channels();

        let ambient = self.collect(&rx, CALIBRATION_DURATION, channels)?;
        let threshold = ambient_threshold(&ambient);
        debug!(threshold, "Adjusted for ambient noise");

        let mut detector = PhraseDetector::new(threshold, sample_rate, timeout);
        let deadline = Instant::now() + timeout + PHRASE_TIME_LIMIT + DEVICE_STALL_TIMEOUT;
        loop {
            if Instant::now() > deadline {
                return Err(CaptureError::Stalled);
            }
            let block = recv_block(&rx)?;
            match detector.push(&downmix_to_mono(&block, channels)) {
                PhraseEvent::Waiting | PhraseEvent::Recording => continue,
                PhraseEvent::TimedOut => return Ok(Capture::TimedOut),
                PhraseEvent::Complete(samples) => {
                    return Ok(Capture::Phrase {
                        samples,
                        sample_rate,
                    });
                }
            }
        }
    }

    fn collect(
        &self,
        rx: &Receiver<Vec<f32>>,
        duration: Duration,
        channels: usize,
    ) -> Result<Vec<f32>, CaptureError> {
        let wanted = (duration.as_secs_f64() * f64::from(self.sample_rate())) as usize;
        let mut mono = Vec::with_capacity(wanted);
        while mono.len() < wanted {
            mono.extend(downmix_to_mono(&recv_block(rx)?, channels));
        }
        Ok(mono)
    }

    fn build_stream(&self, tx: mpsc::Sender<Vec<f32>>) -> Result<cpal::Stream, CaptureError> {
        let config: cpal::StreamConfig = self.config.clone().into();
        let on_error = |e: cpal::StreamError| error!(error = %e, "Audio input stream error");

        let stream = match self.config.sample_format() {
            SampleFormat::F32 => self.device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let _ = tx.send(data.to_vec());
                },
                on_error,
                None,
            ),
            SampleFormat::I16 => self.device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let _ = tx.send(convert_i16_to_f32(data));
                },
                on_error,
                None,
            ),
            SampleFormat::U16 => self.device.build_input_stream(
                &config,
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    let samples = data
                        .iter()
                        .map(|&s| (f32::from(s) - 32768.0) / 32768.0)
                        .collect();
                    let _ = tx.send(samples);
                },
                on_error,
                None,
            ),
            other => return Err(CaptureError::UnsupportedFormat(other)),
        };
        stream.map_err(|e| CaptureError::Device(e.to_string()))
    }
}

fn recv_block(rx: &Receiver<Vec<f32>>) -> Result<Vec<f32>, CaptureError> {
    match rx.recv_timeout(DEVICE_STALL_TIMEOUT) {
        Ok(block) => Ok(block),
        Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
            Err(CaptureError::Stalled)
        }
    }
}
