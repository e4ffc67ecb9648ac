//! The real `SpeechOutput`, backed by the `espeak-ng` command-line engine.

use eduvox_core::{SpeechError, SpeechOutput};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Speaking rate in words per minute.
pub const SPEECH_RATE_WPM: u32 = 150;

/// Language used when a voice variant is selected.
const VARIANT_BASE_LANGUAGE: &str = "en";

/// Name fragments that mark a voice as female-sounding.
const PREFERRED_NAME_TOKENS: [&str; 2] = ["female", "zira"];

/// One row of `espeak-ng --voices` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceEntry {
    pub language: String,
    pub gender: Option<char>,
    pub name: String,
    pub file: String,
}

impl VoiceEntry {
    fn is_variant(&self) -> bool {
        self.language == "variant" || self.file.starts_with("!v/")
    }

    /// The value to pass to `espeak-ng -v`.
    pub fn voice_arg(&self) -> String {
        if self.is_variant() {
            let variant = self.file.trim_start_matches("!v/");
            format!("{VARIANT_BASE_LANGUAGE}+{variant}")
        } else {
            self.language.clone()
        }
    }
}

/// Parses the table printed by `espeak-ng --voices[=variant]`.
pub fn parse_voice_list(output: &str) -> Vec<VoiceEntry> {
    output
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("Pty"))
        .skip(1)
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let _priority = cols.next()?;
            let language = cols.next()?.to_string();
            let gender = cols.next()?.split('/').nth(1).and_then(|g| g.chars().next());
            let name = cols.next()?.to_string();
            let file = cols.next()?.to_string();
            Some(VoiceEntry {
                language,
                gender,
                name,
                file,
            })
        })
        .collect()
}

/// Picks a female-sounding voice if one is installed.
///
/// A name match wins over the gender column.
pub fn pick_preferred_voice(voices: &[VoiceEntry]) -> Option<&VoiceEntry> {
    voices
        .iter()
        .find(|v| {
            let name = v.name.to_lowercase();
            PREFERRED_NAME_TOKENS.iter().any(|token| name.contains(token))
        })
        .or_else(|| voices.iter().find(|v| v.gender == Some('F')))
}

pub struct EspeakSpeaker {
    program: PathBuf,
    voice: Option<String>,
}

impl EspeakSpeaker {
    /// Probes the engine and selects a voice. Fails if `program` cannot run.
    pub fn new(program: impl Into<PathBuf>) -> Result<Self, SpeechError> {
        let program = program.into();
        let mut voices = list_voices(&program, "--voices")?;
        voices.extend(list_voices(&program, "--voices=variant")?);

        let voice = pick_preferred_voice(&voices).map(VoiceEntry::voice_arg);
        info!(
            program = %program.display(),
            voice = voice.as_deref().unwrap_or("default"),
            rate_wpm = SPEECH_RATE_WPM,
            "Speech engine ready"
        );
        Ok(Self { program, voice })
    }

    pub fn voice(&self) -> Option<&str> {
        self.voice.as_deref()
    }

    fn command(&self, text: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-s").arg(SPEECH_RATE_WPM.to_string());
        if let Some(voice) = &self.voice {
            cmd.arg("-v").arg(voice);
        }
        cmd.arg(text).stdout(Stdio::null());
        cmd
    }
}

impl SpeechOutput for EspeakSpeaker {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        info!(%text, "Speaking");
        let status = self.command(text).status().map_err(SpeechError::Spawn)?;
        if status.success() {
            Ok(())
        } else {
            Err(SpeechError::Engine(status.to_string()))
        }
    }
}

fn list_voices(program: &Path, flag: &str) -> Result<Vec<VoiceEntry>, SpeechError> {
    let output = Command::new(program)
        .arg(flag)
        .stderr(Stdio::null())
        .output()
        .map_err(SpeechError::Spawn)?;
    let voices = parse_voice_list(&String::from_utf8_lossy(&output.stdout));
    debug!(flag, count = voices.len(), "Listed speech voices");
    Ok(voices)
}
