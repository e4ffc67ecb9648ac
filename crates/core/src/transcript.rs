//! Transcripts, intent classification and numeric parameter extraction.
//!
//! Everything here is pure string handling. A `Transcript` is always stored
//! lowercase so classification is a plain substring test.

use std::fmt;

/// Lowercase text produced by one speech-capture attempt.
///
/// An empty transcript means nothing was understood, either because the
/// recognizer could not map the audio to text or because the listen window
/// expired before anyone spoke.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript(String);

impl Transcript {
    /// Builds a transcript, normalizing the text to lowercase.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_lowercase())
    }

    /// The "nothing understood" transcript.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Transcript {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Transcript {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// The closed set of commands a transcript can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Exit,
    Move,
    Rotate,
    Circle,
    Clear,
    Unknown,
}

impl Intent {
    /// Keyword table in match priority order. "exit" wins over everything.
    const KEYWORDS: [(&'static str, Intent); 5] = [
        ("exit", Intent::Exit),
        ("move", Intent::Move),
        ("rotate", Intent::Rotate),
        ("circle", Intent::Circle),
        ("clear", Intent::Clear),
    ];

    /// Classifies a transcript by first-match substring containment.
    pub fn classify(transcript: &Transcript) -> Self {
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| transcript.contains(keyword))
            .map(|(_, intent)| *intent)
            .unwrap_or(Intent::Unknown)
    }

    /// Whether this intent needs a follow-up numeric reply.
    pub fn needs_parameter(self) -> bool {
        matches!(self, Intent::Move | Intent::Rotate | Intent::Circle)
    }
}

/// Why a follow-up reply could not be turned into a number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no digits found in '{0}'")]
    NoDigits(String),
    #[error("number '{0}' is too large")]
    Overflow(String),
}

/// Extracts a numeric parameter from a reply.
///
/// Every ASCII digit in the transcript is concatenated in order of appearance
/// and the result parsed as base 10, so "go4ward2" yields 42 and "go 4 ward"
/// yields 4. There is no sign handling.
pub fn extract_number(transcript: &Transcript) -> Result<u32, ParseError> {
    let digits: String = transcript
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        return Err(ParseError::NoDigits(transcript.to_string()));
    }

    digits.parse::<u32>().map_err(|_| ParseError::Overflow(digits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_is_lowercased_and_trimmed() {
        let t = Transcript::new("  Move Forward ");
        assert_eq!(t.as_str(), "move forward");
        assert!(Transcript::empty().is_empty());
    }

    #[test]
    fn exit_wins_regardless_of_other_content() {
        for text in ["exit", "please exit now", "move and exit", "EXIT the circle"] {
            assert_eq!(Intent::classify(&text.into()), Intent::Exit, "{text}");
        }
    }

    #[test]
    fn classification_follows_priority_order() {
        assert_eq!(Intent::classify(&"move then circle".into()), Intent::Move);
        assert_eq!(Intent::classify(&"circle then rotate".into()), Intent::Rotate);
        assert_eq!(Intent::classify(&"clear the circle".into()), Intent::Circle);
        assert_eq!(Intent::classify(&"clear".into()), Intent::Clear);
    }

    #[test]
    fn substring_matches_inside_words() {
        assert_eq!(Intent::classify(&"removed".into()), Intent::Move);
        assert_eq!(Intent::classify(&"semicircle".into()), Intent::Circle);
    }

    #[test]
    fn unknown_and_empty_transcripts() {
        assert_eq!(Intent::classify(&Transcript::empty()), Intent::Unknown);
        assert_eq!(Intent::classify(&"draw a square".into()), Intent::Unknown);
        assert!(!Intent::Unknown.needs_parameter());
        assert!(Intent::Circle.needs_parameter());
    }

    #[test]
    fn digits_are_concatenated_from_anywhere() {
        assert_eq!(extract_number(&"go 4 ward".into()), Ok(4));
        assert_eq!(extract_number(&"go4ward".into()), Ok(4));
        assert_eq!(extract_number(&"go4ward2".into()), Ok(42));
        assert_eq!(extract_number(&"1 2 3".into()), Ok(123));
        assert_eq!(extract_number(&"007".into()), Ok(7));
    }

    #[test]
    fn sign_is_ignored() {
        assert_eq!(extract_number(&"-15".into()), Ok(15));
        assert_eq!(extract_number(&"minus 15".into()), Ok(15));
    }

    #[test]
    fn no_digits_is_a_parse_failure() {
        assert_eq!(
            extract_number(&"a little bit".into()),
            Err(ParseError::NoDigits("a little bit".to_string()))
        );
        assert!(matches!(
            extract_number(&Transcript::empty()),
            Err(ParseError::NoDigits(_))
        ));
    }

    #[test]
    fn non_ascii_digits_are_not_accepted() {
        assert!(extract_number(&"²".into()).is_err());
    }

    #[test]
    fn oversized_numbers_are_rejected() {
        assert_eq!(
            extract_number(&"99999999999".into()),
            Err(ParseError::Overflow("99999999999".to_string()))
        );
    }
}
