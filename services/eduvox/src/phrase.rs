//! Energy-based phrase detection.
//!
//! The detector is fed mono sample blocks in capture order and decides when
//! speech starts, when it has ended, and when the user never spoke at all.
//! It counts time in samples, so it behaves identically on live and recorded
//! audio.

use crate::audio_utils::rms;
use std::collections::VecDeque;
use std::time::Duration;

/// Length of ambient-noise sampling before each listen.
pub const CALIBRATION_DURATION: Duration = Duration::from_secs(1);
/// Silence that ends a phrase.
pub const PAUSE_THRESHOLD: Duration = Duration::from_millis(800);
/// Longest phrase recorded before it is cut off.
pub const PHRASE_TIME_LIMIT: Duration = Duration::from_secs(10);
/// Audio kept from just before speech starts so the first syllable survives.
pub const PRE_ROLL: Duration = Duration::from_millis(300);

/// Threshold never drops below this, even in a silent room.
pub const MIN_ENERGY_THRESHOLD: f32 = 0.01;
/// Speech must be this many times louder than the ambient level.
pub const AMBIENT_MULTIPLIER: f32 = 1.5;

/// Derives a speech threshold from a sample of background noise.
pub fn ambient_threshold(ambient: &[f32]) -> f32 {
    (rms(ambient) * AMBIENT_MULTIPLIER).max(MIN_ENERGY_THRESHOLD)
}

fn samples_for(duration: Duration, sample_rate: u32) -> usize {
    (duration.as_secs_f64() * f64::from(sample_rate)).round() as usize
}

/// What the detector concluded after a block.
#[derive(Debug, Clone, PartialEq)]
pub enum PhraseEvent {
    /// Still waiting for speech to start.
    Waiting,
    /// Speech in progress.
    Recording,
    /// A full phrase, pre-roll included.
    Complete(Vec<f32>),
    /// No speech started within the listen window.
    TimedOut,
}

#[derive(Debug)]
enum State {
    Waiting { waited: usize },
    Recording { silence: usize },
    Done,
}

#[derive(Debug)]
pub struct PhraseDetector {
    threshold: f32,
    wait_limit: usize,
    pause_limit: usize,
    phrase_limit: usize,
    pre_roll_limit: usize,
    pre_roll: VecDeque<f32>,
    phrase: Vec<f32>,
    state: State,
}

impl PhraseDetector {
    pub fn new(threshold: f32, sample_rate: u32, timeout: Duration) -> Self {
        Self {
            threshold,
            wait_limit: samples_for(timeout, sample_rate),
            pause_limit: samples_for(PAUSE_THRESHOLD, sample_rate),
            phrase_limit: samples_for(PHRASE_TIME_LIMIT, sample_rate),
            pre_roll_limit: samples_for(PRE_ROLL, sample_rate),
            pre_roll: VecDeque::new(),
            phrase: Vec::new(),
            state: State::Waiting { waited: 0 },
        }
    }

    /// Feeds one block of mono samples.
    ///
    /// After `Complete` or `TimedOut` has been returned, further blocks are
    /// ignored and reported as `TimedOut`.
    pub fn push(&mut self, block: &[f32]) -> PhraseEvent {
        let loud = rms(block) > self.threshold;

        match &mut self.state {
            State::Done => PhraseEvent::TimedOut,
            State::Waiting { waited } => {
                if loud {
                    self.phrase = self.pre_roll.drain(..).collect();
                    self.phrase.extend_from_slice(block);
                    self.state = State::Recording { silence: 0 };
                    return self.check_phrase_limit();
                }

                *waited += block.len();
                if *waited >= self.wait_limit {
                    self.state = State::Done;
                    return PhraseEvent::TimedOut;
                }

                self.pre_roll.extend(block.iter().copied());
                let excess = self.pre_roll.len().saturating_sub(self.pre_roll_limit);
                self.pre_roll.drain(..excess);
                PhraseEvent::Waiting
            }
            State::Recording { silence } => {
                self.phrase.extend_from_slice(block);
                if loud {
                    *silence = 0;
                } else {
                    *silence += block.len();
                }

                if *silence >= self.pause_limit {
                    self.finish()
                } else {
                    self.check_phrase_limit()
                }
            }
        }
    }

    fn check_phrase_limit(&mut self) -> PhraseEvent {
        if self.phrase.len() >= self.phrase_limit {
            self.finish()
        } else {
            PhraseEvent::Recording
        }
    }

    fn finish(&mut self) -> PhraseEvent {
        self.state = State::Done;
        PhraseEvent::Complete(std::mem::take(&mut self.phrase))
    }
}
