use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::store::FieldLookup;

/// Post identifier. The API hands out numeric ids on some deployments and
/// string ids on others, so both are accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for PostId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostStatus {
    #[serde(rename = "진행중")]
    InProgress,
    #[serde(rename = "완료")]
    Done,
    #[serde(rename = "대기중")]
    Waiting,
}

impl PostStatus {
    pub const ALL: [PostStatus; 3] =
        [Self::InProgress, Self::Done, Self::Waiting];

    pub fn label(&self) -> &'static str {
        match self {
            Self::InProgress => "진행중",
            Self::Done => "완료",
            Self::Waiting => "대기중",
        }
    }

    /// Badge colour used by the status column.
    pub fn tone(&self) -> &'static str {
        match self {
            Self::InProgress => "warning",
            Self::Done => "success",
            Self::Waiting => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    #[serde(deserialize_with = "lenient_date")]
    pub created_at: NaiveDate,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub task_name: Option<String>,
    pub status: PostStatus,
    #[serde(deserialize_with = "lenient_date")]
    pub due_date: NaiveDate,
}

impl FieldLookup for Post {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "id" => Some(Cow::Borrowed(self.id.as_ref())),
            "createdAt" => Some(Cow::Owned(self.created_at.to_string())),
            "author" => Some(Cow::Borrowed(&self.author)),
            "taskName" => self.task_name.as_deref().map(Cow::Borrowed),
            "status" => Some(Cow::Borrowed(self.status.label())),
            "dueDate" => Some(Cow::Owned(self.due_date.to_string())),
            _ => None,
        }
    }
}

/// Body for create and update calls. The server assigns `id` and `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub author: String,
    pub task_name: String,
    pub status: PostStatus,
    pub due_date: NaiveDate,
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn lenient_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|e| {
            serde::de::Error::custom(format!("invalid date {raw:?}: {e}"))
        })
}
