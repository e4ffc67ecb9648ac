//! Eduvox core: the hardware-free half of the voice drawing tool.
//!
//! Speech and drawing are reached only through the `SpeechInput`,
//! `SpeechOutput` and `Canvas` traits, so the whole dispatch loop can run
//! against the in-memory `Turtle` and scripted speech adapters.

pub mod canvas;
pub mod grid;
pub mod prompt;
pub mod session;
pub mod speech;
pub mod transcript;

pub use canvas::{Canvas, CanvasError, CanvasState, Color, Point, Stroke, Turtle};
pub use grid::{GridSpec, draw_grid};
pub use prompt::{DrawAction, PromptOutcome, prompt_and_execute};
pub use session::{Flow, Phase, Session, SessionError, SessionOptions};
pub use speech::{
    DEFAULT_LISTEN_TIMEOUT, RecordingOutput, ScriptedInput, SpeechError, SpeechInput, SpeechOutput,
};
pub use transcript::{Intent, ParseError, Transcript, extract_number};
