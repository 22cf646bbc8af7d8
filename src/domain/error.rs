use color_eyre::eyre::Report;
use serde_json::Value;
use thiserror::Error;
use tracing::Level;

use super::MemberRole;

pub const GENERIC_REJECTION: &str = "Error";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Transport error")]
    Transport(#[source] Report),
    #[error("Request rejected with status {status}")]
    Rejected {
        status: u16,
        payload: Option<Value>,
    },
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl GatewayError {
    /// Server-side rejections are routine; everything else is worth an alarm.
    pub fn log_level(&self) -> Level {
        match self {
            Self::Rejected { .. } | Self::NotFound(_) => Level::DEBUG,
            Self::Transport(_) | Self::UnexpectedError(_) => Level::ERROR,
        }
    }
}

impl PartialEq for GatewayError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Transport(_), Self::Transport(_))
                | (Self::Rejected { .. }, Self::Rejected { .. })
                | (Self::NotFound(_), Self::NotFound(_))
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// The value recorded on a slice or store when a remote call fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RejectionReason(String);

impl RejectionReason {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl AsRef<str> for RejectionReason {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&GatewayError> for RejectionReason {
    fn from(error: &GatewayError) -> Self {
        match error {
            GatewayError::Rejected {
                payload: Some(payload),
                ..
            } => Self(message_from_payload(payload)),
            GatewayError::NotFound(what) => Self(format!("Not found: {what}")),
            _ => Self(GENERIC_REJECTION.to_owned()),
        }
    }
}

fn message_from_payload(payload: &Value) -> String {
    match payload {
        Value::String(message) if !message.is_empty() => message.to_owned(),
        Value::Object(fields) => ["message", "error"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(str::to_owned)
            .unwrap_or_else(|| payload.to_string()),
        Value::Null | Value::String(_) => GENERIC_REJECTION.to_owned(),
        other => other.to_string(),
    }
}

#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("Gateway error")]
    Gateway(#[from] GatewayError),
    #[error("Manager changed but the member list could not be refreshed")]
    Resync(#[source] GatewayError),
}

impl PartialEq for AssignmentError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Gateway(_), Self::Gateway(_))
                | (Self::Resync(_), Self::Resync(_))
        )
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToggleError {
    #[error("Role {0} cannot hold the project manager flag")]
    NotPermitted(MemberRole),
    #[error("A manager change is already in progress")]
    Busy,
    #[error("No manager change is awaiting confirmation")]
    NothingToConfirm,
    #[error("Member is not assigned to this project: {0}")]
    UnknownMember(String),
}

#[derive(Debug, Error)]
#[error("Validation error: {0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: String) -> Self {
        Self(message)
    }

    pub fn as_ref(&self) -> &String {
        &self.0
    }
}
