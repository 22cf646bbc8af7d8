use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        parse_non_empty(id, "Project ID").map(Self)
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(String);

impl CompanyId {
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        parse_non_empty(id, "Company ID").map(Self)
    }
}

impl AsRef<str> for CompanyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_non_empty(id: &str, what: &str) -> Result<String, ValidationError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(format!("{what} cannot be empty")));
    }
    Ok(trimmed.to_owned())
}

/// Which side of the engagement a company sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompanyType {
    #[serde(rename = "고객사")]
    Client,
    #[default]
    #[serde(rename = "개발사")]
    Developer,
}

impl CompanyType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Client => "고객사",
            Self::Developer => "개발사",
        }
    }
}
