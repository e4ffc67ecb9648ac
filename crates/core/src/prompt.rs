//! Follow-up prompts for commands that need a number.

use crate::canvas::Canvas;
use crate::speech::{SpeechError, SpeechInput, SpeechOutput};
use crate::transcript::extract_number;
use std::time::Duration;
use tracing::{info, warn};

/// A drawing action parameterized by a single non-negative number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawAction {
    /// Move forward `n` units.
    Forward,
    /// Turn left `n` degrees.
    TurnLeft,
    /// Draw a circle of radius `n`.
    Circle,
}

impl DrawAction {
    pub fn prompt(self) -> &'static str {
        match self {
            DrawAction::Forward => "How far should I move?",
            DrawAction::TurnLeft => "How many degrees should I turn?",
            DrawAction::Circle => "What radius should the circle have?",
        }
    }

    pub fn confirmation(self, n: u32) -> String {
        match self {
            DrawAction::Forward => format!("Moved {n} units."),
            DrawAction::TurnLeft => format!("Turned {n} degrees."),
            DrawAction::Circle => format!("Drew a circle with radius {n}."),
        }
    }

    pub fn failure(self) -> &'static str {
        match self {
            DrawAction::Forward => "I couldn't understand the distance. Please say a valid number.",
            DrawAction::TurnLeft => "I couldn't understand the angle. Please say a valid number.",
            DrawAction::Circle => "I couldn't understand the radius. Please say a valid number.",
        }
    }

    /// Performs the action on the canvas.
    pub fn apply<C: Canvas + ?Sized>(self, canvas: &mut C, n: u32) {
        let n = f64::from(n);
        match self {
            DrawAction::Forward => canvas.forward(n),
            DrawAction::TurnLeft => canvas.turn_left(n),
            DrawAction::Circle => canvas.circle(n),
        }
    }
}

/// Result of one prompt exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The reply held a number and the action was drawn with it.
    Performed(u32),
    /// The reply held no usable number; the canvas is untouched.
    Rejected,
}

/// Asks for a number, listens for the reply and draws with it.
///
/// Only errors from the speech output engine are returned. A reply without
/// digits is an ordinary `PromptOutcome::Rejected`.
pub fn prompt_and_execute<I, O, C>(
    input: &mut I,
    output: &mut O,
    canvas: &mut C,
    action: DrawAction,
    timeout: Duration,
) -> Result<PromptOutcome, SpeechError>
where
    I: SpeechInput + ?Sized,
    O: SpeechOutput + ?Sized,
    C: Canvas + ?Sized,
{
    output.speak(action.prompt())?;
    let reply = input.listen(timeout);

    match extract_number(&reply) {
        Ok(n) => {
            action.apply(canvas, n);
            info!(?action, n, "Performed drawing action");
            output.speak(&action.confirmation(n))?;
            Ok(PromptOutcome::Performed(n))
        }
        Err(e) => {
            warn!(?action, reply = %reply, error = %e, "Could not parse numeric reply");
            output.speak(action.failure())?;
            Ok(PromptOutcome::Rejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{MockCanvas, Point, Turtle};
    use crate::speech::{DEFAULT_LISTEN_TIMEOUT, MockSpeechOutput, RecordingOutput, ScriptedInput};
    use mockall::predicate::eq;

    #[test]
    fn forward_with_a_number_moves_once() {
        let mut input = ScriptedInput::new(["10"]);
        let mut output = RecordingOutput::new();
        let mut canvas = MockCanvas::new();
        canvas.expect_forward().with(eq(10.0)).times(1).return_const(());

        let outcome = prompt_and_execute(
            &mut input,
            &mut output,
            &mut canvas,
            DrawAction::Forward,
            DEFAULT_LISTEN_TIMEOUT,
        )
        .unwrap();

        assert_eq!(outcome, PromptOutcome::Performed(10));
        assert_eq!(output.spoken(), ["How far should I move?", "Moved 10 units."]);
    }

    #[test]
    fn reply_without_digits_leaves_canvas_alone() {
        let mut input = ScriptedInput::new(["abc"]);
        let mut output = RecordingOutput::new();
        // No expectations: any canvas call fails the test.
        let mut canvas = MockCanvas::new();

        let outcome = prompt_and_execute(
            &mut input,
            &mut output,
            &mut canvas,
            DrawAction::Circle,
            DEFAULT_LISTEN_TIMEOUT,
        )
        .unwrap();

        assert_eq!(outcome, PromptOutcome::Rejected);
        assert_eq!(
            output.spoken(),
            [
                "What radius should the circle have?",
                "I couldn't understand the radius. Please say a valid number.",
            ]
        );
    }

    #[test]
    fn silence_counts_as_a_parse_failure() {
        let mut input = ScriptedInput::new(Vec::<&str>::new());
        let mut output = RecordingOutput::new();
        let mut turtle = Turtle::new();

        let outcome = prompt_and_execute(
            &mut input,
            &mut output,
            &mut turtle,
            DrawAction::TurnLeft,
            DEFAULT_LISTEN_TIMEOUT,
        )
        .unwrap();

        assert_eq!(outcome, PromptOutcome::Rejected);
        assert_eq!(
            output.last(),
            Some("I couldn't understand the angle. Please say a valid number.")
        );
        assert_eq!(turtle.state().heading, 0.0);
    }

    #[test]
    fn embedded_digits_drive_the_turtle() {
        let mut input = ScriptedInput::new(["turn 9 then 0 please"]);
        let mut output = RecordingOutput::new();
        let mut turtle = Turtle::new();

        let outcome = prompt_and_execute(
            &mut input,
            &mut output,
            &mut turtle,
            DrawAction::TurnLeft,
            DEFAULT_LISTEN_TIMEOUT,
        )
        .unwrap();

        assert_eq!(outcome, PromptOutcome::Performed(90));
        assert_eq!(turtle.state().heading, 90.0);
        assert_eq!(output.last(), Some("Turned 90 degrees."));
    }

    #[test]
    fn circle_confirmation_mentions_radius() {
        let mut input = ScriptedInput::new(["radius 25"]);
        let mut output = RecordingOutput::new();
        let mut turtle = Turtle::new();

        prompt_and_execute(
            &mut input,
            &mut output,
            &mut turtle,
            DrawAction::Circle,
            DEFAULT_LISTEN_TIMEOUT,
        )
        .unwrap();

        assert_eq!(turtle.state().position, Point::ORIGIN);
        assert!(!turtle.strokes().is_empty());
        assert_eq!(output.last(), Some("Drew a circle with radius 25."));
    }

    #[test]
    fn speech_failure_stops_before_listening() {
        let mut input = ScriptedInput::new(["10"]);
        let mut output = MockSpeechOutput::new();
        output
            .expect_speak()
            .times(1)
            .returning(|_| Err(SpeechError::Engine("exit status: 1".into())));
        let mut canvas = MockCanvas::new();

        let result = prompt_and_execute(
            &mut input,
            &mut output,
            &mut canvas,
            DrawAction::Forward,
            DEFAULT_LISTEN_TIMEOUT,
        );

        assert!(matches!(result, Err(SpeechError::Engine(_))));
        assert_eq!(input.listens(), 0);
    }
}
