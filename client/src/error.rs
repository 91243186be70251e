use std::fmt;

use domain::{ErrorBody, TransitionError, ValidationError};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Which client call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    BookingCreation,
    BookingFetch,
    BookingUpdate,
    RoomFetch,
    FormValidation,
}

impl Operation {
    /// Shown when the server gave no message of its own.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::BookingCreation => "Failed to create booking",
            Operation::BookingFetch => "Failed to fetch bookings",
            Operation::BookingUpdate => "Failed to update booking status",
            Operation::RoomFetch => "Failed to fetch rooms",
            Operation::FormValidation => "Invalid booking form",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::BookingCreation => "booking creation",
            Operation::BookingFetch => "booking fetch",
            Operation::BookingUpdate => "booking update",
            Operation::RoomFetch => "room fetch",
            Operation::FormValidation => "form validation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any request was sent.
    Validation(ValidationError),
    /// The admin action is not offered for the booking's current state.
    Transition,
    /// The request never got a response.
    Network,
    /// Non-2xx response.
    Backend { status: u16 },
    /// 2xx response whose body could not be understood.
    Unknown,
}

/// Failure of a client call. Displays as the message alone, ready to be
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClientError {
    pub operation: Operation,
    pub kind: ErrorKind,
    pub message: String,
}

impl ClientError {
    pub fn validation(err: ValidationError) -> Self {
        Self {
            operation: Operation::FormValidation,
            kind: ErrorKind::Validation(err),
            message: err.to_string(),
        }
    }

    pub fn transition(err: &TransitionError) -> Self {
        Self {
            operation: Operation::BookingUpdate,
            kind: ErrorKind::Transition,
            message: err.to_string(),
        }
    }

    pub fn not_on_board(id: &str) -> Self {
        Self {
            operation: Operation::BookingUpdate,
            kind: ErrorKind::Transition,
            message: format!("booking {id} is not on the board"),
        }
    }

    pub(crate) fn network(operation: Operation, err: &dyn std::error::Error) -> Self {
        warn!(%operation, error = %err, "request failed before a response arrived");
        Self {
            operation,
            kind: ErrorKind::Network,
            message: operation.fallback_message().to_string(),
        }
    }

    /// Uses the server's `message` when the body carries one.
    pub(crate) fn backend(operation: Operation, status: u16, body: Option<&Value>) -> Self {
        let message = body
            .and_then(ErrorBody::message_of)
            .unwrap_or_else(|| operation.fallback_message().to_string());
        warn!(%operation, status, %message, "server refused request");
        Self {
            operation,
            kind: ErrorKind::Backend { status },
            message,
        }
    }

    pub(crate) fn unknown(operation: Operation) -> Self {
        Self {
            operation,
            kind: ErrorKind::Unknown,
            message: operation.fallback_message().to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Backend { status } => Some(status),
            _ => None,
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::validation(err)
    }
}
