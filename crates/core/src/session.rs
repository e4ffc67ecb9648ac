//! The command dispatcher.
//!
//! A `Session` owns the speech adapters and the canvas for the lifetime of
//! the program and runs the listen → classify → act loop until the user says
//! "exit". Every step blocks; there is never more than one operation in flight.

use crate::canvas::Canvas;
use crate::grid::{GridSpec, draw_grid};
use crate::prompt::{DrawAction, PromptOutcome, prompt_and_execute};
use crate::speech::{DEFAULT_LISTEN_TIMEOUT, SpeechError, SpeechInput, SpeechOutput};
use crate::transcript::Intent;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const WELCOME: &str = "Welcome to Eduvox. Say a command.";
pub const FAREWELL: &str = "Exiting the program. Goodbye!";
pub const CLEARED: &str = "Cleared the screen.";
pub const NOT_UNDERSTOOD: &str = "I didn't understand that. Please try again.";

/// Where the program is in its interaction cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Listening,
    Dispatching,
    Prompting,
    Exited,
}

/// What the loop should do after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("speech output failed: {0}")]
    Speech(#[from] SpeechError),
    #[error("session has already exited")]
    AlreadyExited,
}

/// Tunables that stay fixed for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub grid: GridSpec,
    pub listen_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            listen_timeout: DEFAULT_LISTEN_TIMEOUT,
        }
    }
}

/// The voice-driven drawing loop.
pub struct Session<I, O, C> {
    input: I,
    output: O,
    canvas: C,
    options: SessionOptions,
    phase: Phase,
    handled: usize,
}

impl<I, O, C> Session<I, O, C>
where
    I: SpeechInput,
    O: SpeechOutput,
    C: Canvas,
{
    pub fn new(input: I, output: O, canvas: C, options: SessionOptions) -> Self {
        Self {
            input,
            output,
            canvas,
            options,
            phase: Phase::Listening,
            handled: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of transcripts dispatched so far, recognized or not.
    pub fn handled(&self) -> usize {
        self.handled
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Tears the session down, handing back its adapters.
    pub fn into_parts(self) -> (I, O, C) {
        (self.input, self.output, self.canvas)
    }

    /// Greets the user and draws the reference grid.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.output.speak(WELCOME)?;
        draw_grid(&mut self.canvas, &self.options.grid);
        self.present();
        Ok(())
    }

    /// Greets the user, then dispatches commands until "exit".
    ///
    /// Returns the number of transcripts handled, the final "exit" included.
    pub fn run(&mut self) -> Result<usize, SessionError> {
        self.start()?;
        while self.step()? == Flow::Continue {}
        info!(handled = self.handled, "Session finished");
        Ok(self.handled)
    }

    /// Listens for one command and carries it out.
    pub fn step(&mut self) -> Result<Flow, SessionError> {
        if self.phase == Phase::Exited {
            return Err(SessionError::AlreadyExited);
        }

        self.transition(Phase::Listening);
        let transcript = self.input.listen(self.options.listen_timeout);

        self.transition(Phase::Dispatching);
        self.handled += 1;
        let intent = Intent::classify(&transcript);
        info!(transcript = %transcript, ?intent, "Dispatching command");

        match intent {
            Intent::Exit => {
                self.output.speak(FAREWELL)?;
                self.transition(Phase::Exited);
                return Ok(Flow::Exit);
            }
            Intent::Move => self.prompt(DrawAction::Forward)?,
            Intent::Rotate => self.prompt(DrawAction::TurnLeft)?,
            Intent::Circle => self.prompt(DrawAction::Circle)?,
            Intent::Clear => {
                self.canvas.clear_all();
                draw_grid(&mut self.canvas, &self.options.grid);
                self.present();
                self.output.speak(CLEARED)?;
            }
            Intent::Unknown => self.output.speak(NOT_UNDERSTOOD)?,
        }

        self.transition(Phase::Listening);
        Ok(Flow::Continue)
    }

    fn prompt(&mut self, action: DrawAction) -> Result<(), SessionError> {
        self.transition(Phase::Prompting);
        let outcome = prompt_and_execute(
            &mut self.input,
            &mut self.output,
            &mut self.canvas,
            action,
            self.options.listen_timeout,
        )?;
        if let PromptOutcome::Performed(_) = outcome {
            self.present();
        }
        Ok(())
    }

    fn present(&mut self) {
        if let Err(e) = self.canvas.update() {
            warn!(error = %e, "Failed to present canvas; continuing");
        }
    }

    fn transition(&mut self, next: Phase) {
        if self.phase != next {
            debug!(from = ?self.phase, to = ?next, "Phase change");
            self.phase = next;
        }
    }
}
