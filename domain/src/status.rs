use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Approval state of a booking as reported by the backend.
///
/// Values the backend may add later are kept verbatim in `Unknown` and are
/// treated as display-only terminal states.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Unknown(String),
}

impl BookingStatus {
    pub const KNOWN: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Approved,
        BookingStatus::Rejected,
        BookingStatus::Completed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Completed => "completed",
            BookingStatus::Unknown(raw) => raw,
        }
    }

    /// Human label for badges.
    pub fn label(&self) -> &str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Approved => "Approved",
            BookingStatus::Rejected => "Rejected",
            BookingStatus::Completed => "Completed",
            BookingStatus::Unknown(raw) => raw,
        }
    }

    /// Actions an admin may take from this state.
    pub fn available_actions(&self) -> &'static [AdminAction] {
        match self {
            BookingStatus::Pending => &[AdminAction::Approve, AdminAction::Reject],
            BookingStatus::Approved => &[AdminAction::Complete],
            _ => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.available_actions().is_empty()
    }

    pub fn apply(&self, action: AdminAction) -> Result<BookingStatus, TransitionError> {
        if self.available_actions().contains(&action) {
            Ok(action.target())
        } else {
            Err(TransitionError {
                from: self.clone(),
                action,
            })
        }
    }
}

impl From<&str> for BookingStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "pending" => BookingStatus::Pending,
            "approved" => BookingStatus::Approved,
            "rejected" => BookingStatus::Rejected,
            "completed" => BookingStatus::Completed,
            other => BookingStatus::Unknown(other.to_string()),
        }
    }
}

impl From<String> for BookingStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" | "approved" | "rejected" | "completed" => BookingStatus::from(raw.as_str()),
            _ => BookingStatus::Unknown(raw),
        }
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transitions offered on the admin board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminAction {
    Approve,
    Reject,
    Complete,
}

impl AdminAction {
    pub fn target(self) -> BookingStatus {
        match self {
            AdminAction::Approve => BookingStatus::Approved,
            AdminAction::Reject => BookingStatus::Rejected,
            AdminAction::Complete => BookingStatus::Completed,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            AdminAction::Approve => "approve",
            AdminAction::Reject => "reject",
            AdminAction::Complete => "complete",
        }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} a booking that is {from}")]
pub struct TransitionError {
    pub from: BookingStatus,
    pub action: AdminAction,
}
