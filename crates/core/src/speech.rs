//! Speech input and output capabilities.
//!
//! The dispatcher only ever sees these two traits, so it can be driven by
//! real hardware adapters or by the deterministic `ScriptedInput` and
//! `RecordingOutput` defined here.

use crate::transcript::Transcript;
use std::collections::VecDeque;
use std::time::Duration;

/// How long a listen attempt waits for speech to start.
pub const DEFAULT_LISTEN_TIMEOUT: Duration = Duration::from_secs(5);

/// Converts microphone audio into a lowercase transcript.
///
/// Implementations never fail: an unrecognized phrase or an expired listen
/// window both come back as an empty transcript.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechInput {
    fn listen(&mut self, timeout: Duration) -> Transcript;
}

/// Speaks text aloud, blocking until playback has finished.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechOutput {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;
}

/// Failure of the speech output engine.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("speech engine could not be started: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("speech engine exited with {0}")]
    Engine(String),
}

/// A `SpeechInput` that replays a fixed list of utterances.
///
/// Once the script runs out every further listen returns an empty
/// transcript, exactly like a silent microphone.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    remaining: VecDeque<Transcript>,
    listens: usize,
}

impl ScriptedInput {
    pub fn new<I, S>(utterances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            remaining: utterances.into_iter().map(Transcript::new).collect(),
            listens: 0,
        }
    }

    /// Number of listen attempts made so far.
    pub fn listens(&self) -> usize {
        self.listens
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }
}

impl SpeechInput for ScriptedInput {
    fn listen(&mut self, _timeout: Duration) -> Transcript {
        self.listens += 1;
        self.remaining.pop_front().unwrap_or_default()
    }
}

/// A `SpeechOutput` that remembers everything it was asked to say.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    spoken: Vec<String>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }

    pub fn last(&self) -> Option<&str> {
        self.spoken.last().map(String::as_str)
    }
}

impl SpeechOutput for RecordingOutput {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        self.spoken.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_input_replays_then_goes_silent() {
        let mut input = ScriptedInput::new(["Move", "10"]);
        assert_eq!(input.listen(DEFAULT_LISTEN_TIMEOUT).as_str(), "move");
        assert_eq!(input.listen(DEFAULT_LISTEN_TIMEOUT).as_str(), "10");
        assert!(input.is_exhausted());
        assert!(input.listen(DEFAULT_LISTEN_TIMEOUT).is_empty());
        assert_eq!(input.listens(), 3);
    }

    #[test]
    fn recording_output_keeps_order() {
        let mut output = RecordingOutput::new();
        output.speak("one").unwrap();
        output.speak("two").unwrap();
        assert_eq!(output.spoken(), ["one", "two"]);
        assert_eq!(output.last(), Some("two"));
    }
}
