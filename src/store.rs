use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roster::SPEAKER_COUNT;

/// Number of ad-vocem panes (one per side).
pub const AD_VOCEM_COUNT: usize = 2;

/// Upper bound of a speaker score.
pub const SCORE_MAX: u8 = 10;

/// One speaker's text fields as they appear in the session file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerEntry {
    pub info: String,
    pub question1: String,
    pub question2: String,
}

/// The complete serializable state of a judging session: all speaker
/// texts (roster order), both ad-vocem panes, the notepad, and the
/// score row. The Polish field names `notatnik` and `punkty` are part
/// of the established session file format and must not change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub speakers: Vec<SpeakerEntry>,
    pub ad_vocem: Vec<String>,
    #[serde(rename = "notatnik", default)]
    pub notepad: String,
    #[serde(rename = "punkty")]
    pub scores: Vec<u8>,
}

impl SessionSnapshot {
    /// An empty snapshot with the fixed shape: 8 speakers, 2 ad-vocem
    /// panes, 8 zero scores.
    pub fn empty() -> Self {
        Self {
            speakers: vec![SpeakerEntry::default(); SPEAKER_COUNT],
            ad_vocem: vec![String::new(); AD_VOCEM_COUNT],
            notepad: String::new(),
            scores: vec![0; SPEAKER_COUNT],
        }
    }
}

/// Import failure: the document couldn't be parsed after comment
/// stripping, or a required array has the wrong shape. Surfaced to the
/// caller; nothing is partially applied.
#[derive(Debug, Error)]
pub enum MalformedSessionError {
    #[error("session file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected {expected} speaker entries, found {found}")]
    SpeakerCount { expected: usize, found: usize },
    #[error("expected {expected} ad-vocem entries, found {found}")]
    AdVocemCount { expected: usize, found: usize },
    #[error("expected {expected} scores, found {found}")]
    ScoreCount { expected: usize, found: usize },
}

/// Serialize a snapshot to the session document: pretty json with
/// two-space indentation and stable field order, so identical snapshots
/// always produce identical bytes. Never emits comment lines.
pub fn export(snapshot: &SessionSnapshot) -> Vec<u8> {
    let mut out = serde_json::to_string_pretty(snapshot).unwrap_or_default();
    out.push('\n');
    out.into_bytes()
}

/// Parse a session document. Lines whose trimmed form starts with `//`
/// are dropped first; the format is json-with-optional-comment-lines,
/// not standard json. A missing `notatnik` defaults to empty. Scores
/// above the 0..=10 range are clamped; shape violations are errors.
pub fn import(bytes: &[u8]) -> Result<SessionSnapshot, MalformedSessionError> {
    let text = String::from_utf8_lossy(bytes);
    let stripped = text
        .lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut snapshot: SessionSnapshot = serde_json::from_str(&stripped)?;

    if snapshot.speakers.len() != SPEAKER_COUNT {
        return Err(MalformedSessionError::SpeakerCount {
            expected: SPEAKER_COUNT,
            found: snapshot.speakers.len(),
        });
    }
    if snapshot.ad_vocem.len() != AD_VOCEM_COUNT {
        return Err(MalformedSessionError::AdVocemCount {
            expected: AD_VOCEM_COUNT,
            found: snapshot.ad_vocem.len(),
        });
    }
    if snapshot.scores.len() != SPEAKER_COUNT {
        return Err(MalformedSessionError::ScoreCount {
            expected: SPEAKER_COUNT,
            found: snapshot.scores.len(),
        });
    }
    for score in &mut snapshot.scores {
        *score = (*score).min(SCORE_MAX);
    }

    Ok(snapshot)
}
