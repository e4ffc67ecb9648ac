//! Eduvox Service Library Crate
//!
//! Hardware-facing adapters for the voice drawing tool: microphone capture and
//! phrase detection, remote speech-to-text, `espeak-ng` speech output, and a
//! PNG-backed canvas. The `eduvox` binary wires these into an
//! `eduvox_core::Session`.

pub mod audio_utils;
pub mod canvas;
pub mod config;
pub mod listener;
pub mod microphone;
pub mod phrase;
pub mod speaker;
pub mod stt;
