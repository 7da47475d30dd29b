//! Severity-tagged results returned to the presentation layer.
//!
//! Every gameplay outcome is an expected, displayable value. Nothing in
//! this module is an error type in the Rust sense; the only fatal error in
//! the crate is [`crate::catalog::CatalogError`] at load time.
use serde::{Deserialize, Serialize};

use crate::catalog::IdList;

/// Display severity for a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// A displayable notification derived from an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Result of a take-card request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AcquisitionOutcome {
    /// The card was added to the inventory.
    Taken { id: String },
    /// The id names a card already in the inventory; nothing changed.
    AlreadyOwned { id: String },
    /// The input names no card in the deck; nothing changed.
    NotFound { input: String },
    /// The card's prerequisites are not satisfied; nothing changed.
    PrerequisiteUnmet { id: String },
    /// The input matched a known trap code. The penalty has been applied;
    /// `granted` carries the card id if the trap doubled as a collectible.
    TrapTriggered {
        code: String,
        penalty_minutes: u32,
        message: String,
        granted: Option<String>,
    },
}

impl AcquisitionOutcome {
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Taken { .. } => Severity::Success,
            Self::AlreadyOwned { .. } => Severity::Info,
            Self::NotFound { .. } | Self::PrerequisiteUnmet { .. } => Severity::Error,
            Self::TrapTriggered { .. } => Severity::Warning,
        }
    }

    /// Render the outcome as a player-facing notice.
    #[must_use]
    pub fn notice(&self) -> Notice {
        let message = match self {
            Self::Taken { id } => format!("Card {id} recovered!"),
            Self::AlreadyOwned { id } => format!("Already owned: {id}."),
            Self::NotFound { input } => format!("Number {input} not found."),
            Self::PrerequisiteUnmet { id } => format!("Cannot take {id} right now."),
            Self::TrapTriggered { message, .. } => message.clone(),
        };
        Notice::new(self.severity(), message)
    }
}

/// Result of a code submission on a machine card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Correct code: rewards granted, completions recorded.
    Solved { granted: IdList, message: String },
    /// Correct code on an already-solved machine; nothing changed.
    AlreadySolved,
    /// The submission matched a known trap code; penalty applied.
    TrapTriggered {
        penalty_minutes: u32,
        message: String,
    },
    /// Generic wrong answer; fixed penalty applied, tally incremented.
    WrongCode {
        attempts: u32,
        hint_unlocked: bool,
    },
    /// The target accepts no submission (not owned, not a machine, or
    /// already completed).
    Unavailable { id: String },
}

impl SubmitOutcome {
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Solved { .. } => Severity::Success,
            Self::AlreadySolved | Self::Unavailable { .. } => Severity::Info,
            Self::TrapTriggered { .. } => Severity::Warning,
            Self::WrongCode { hint_unlocked, .. } => {
                if *hint_unlocked {
                    Severity::Warning
                } else {
                    Severity::Error
                }
            }
        }
    }

    /// Render the outcome as a player-facing notice.
    #[must_use]
    pub fn notice(&self) -> Notice {
        let message = match self {
            Self::Solved { message, .. } => message.clone(),
            Self::AlreadySolved => "Already unlocked!".to_string(),
            Self::TrapTriggered { message, .. } => message.clone(),
            Self::WrongCode {
                attempts,
                hint_unlocked,
            } => {
                if *hint_unlocked {
                    "A hint is now available.".to_string()
                } else {
                    format!("Wrong code. (-1 min) [{attempts} wrong so far]")
                }
            }
            Self::Unavailable { id } => format!("No code entry available for {id}."),
        };
        Notice::new(self.severity(), message)
    }
}

/// What the presentation layer needs to draw the currently open card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: String,
    pub name: String,
    pub face_up: bool,
    /// Narrative text, present only while face up.
    pub text: Option<String>,
    /// Machine prompt, present only while a submission is offered.
    pub prompt: Option<String>,
    /// Whether a code-entry action should be offered.
    pub can_submit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquisition_severities_match_contract() {
        assert_eq!(
            AcquisitionOutcome::Taken { id: "4".into() }.severity(),
            Severity::Success
        );
        assert_eq!(
            AcquisitionOutcome::NotFound { input: "x".into() }.severity(),
            Severity::Error
        );
        let trap = AcquisitionOutcome::TrapTriggered {
            code: "49".into(),
            penalty_minutes: 5,
            message: "T9 error! (-5 min)".into(),
            granted: None,
        };
        assert_eq!(trap.severity(), Severity::Warning);
        assert_eq!(trap.notice().message, "T9 error! (-5 min)");
    }

    #[test]
    fn wrong_code_escalates_to_warning_on_hint_unlock() {
        let silent = SubmitOutcome::WrongCode {
            attempts: 2,
            hint_unlocked: false,
        };
        let unlocked = SubmitOutcome::WrongCode {
            attempts: 3,
            hint_unlocked: true,
        };
        assert_eq!(silent.severity(), Severity::Error);
        assert_eq!(unlocked.severity(), Severity::Warning);
    }
}
