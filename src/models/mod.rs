/// Models module
/// Shared data types between frontend and backend
/// All types here are serializable for IPC

use serde::{Deserialize, Serialize};
use std::fmt;

/// Baud rates offered in the connect controls.
pub const BAUD_RATES: [u32; 5] = [9600, 19200, 38400, 57600, 115200];

/// Direction tag for one transcript line.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Sent,
    Received,
    Error,
}

/// One line of the session transcript.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub kind: EntryKind,
    pub text: String,
}

impl TranscriptEntry {
    pub fn sent(text: &str) -> Self {
        Self {
            kind: EntryKind::Sent,
            text: text.to_string(),
        }
    }

    pub fn received(text: &str) -> Self {
        Self {
            kind: EntryKind::Received,
            text: text.to_string(),
        }
    }

    /// Error entries carry their full message, e.g. "Error sending: <msg>".
    pub fn error(text: String) -> Self {
        Self {
            kind: EntryKind::Error,
            text,
        }
    }
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntryKind::Sent => write!(f, "Sent: {}", self.text),
            EntryKind::Received => write!(f, "Received: {}", self.text),
            EntryKind::Error => write!(f, "{}", self.text),
        }
    }
}

/// One enumerated serial port.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PortInfo {
    pub name: String,
}
