use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MemberId;
use crate::store::FieldLookup;

/// A company member who can be assigned to a project.
///
/// The same shape is returned for candidates and for members already
/// assigned; see [`AssignedMember`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMember {
    pub member_id: MemberId,
    pub member_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub member_role: MemberRole,
    #[serde(default)]
    pub is_manager: bool,
}

impl CompanyMember {
    pub fn new(
        member_id: MemberId,
        member_name: impl Into<String>,
        member_role: MemberRole,
    ) -> Self {
        Self {
            member_id,
            member_name: member_name.into(),
            email: None,
            member_role,
            is_manager: false,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_manager(mut self, is_manager: bool) -> Self {
        self.is_manager = is_manager;
        self
    }

    /// First character of the member name, or `?` when the name is empty.
    pub fn initial(&self) -> String {
        self.member_name
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_else(|| "?".to_owned())
    }
}

/// A company member currently linked to a project.
pub type AssignedMember = CompanyMember;

impl FieldLookup for CompanyMember {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "memberId" => Some(Cow::Borrowed(self.member_id.as_ref())),
            "memberName" => Some(Cow::Borrowed(&self.member_name)),
            "email" => self.email.as_deref().map(Cow::Borrowed),
            "memberRole" => Some(Cow::Owned(self.member_role.to_string())),
            _ => None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    DevAdmin,
    ClientAdmin,
    #[default]
    #[serde(other)]
    Other,
}

impl MemberRole {
    /// Only company-admin roles may hold the per-project manager flag.
    pub fn can_manage_roles(&self) -> bool {
        matches!(self, Self::DevAdmin | Self::ClientAdmin)
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::DevAdmin => "DEV_ADMIN",
            Self::ClientAdmin => "CLIENT_ADMIN",
            Self::Other => "OTHER",
        };
        f.write_str(label)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MemberListPayload {
    Bare(Vec<CompanyMember>),
    Wrapped { members: Vec<CompanyMember> },
}

/// Accepts either a bare array of members or `{ "members": [...] }`.
/// Any other shape is logged and treated as an empty list.
pub fn normalize_member_list(payload: Value) -> Vec<CompanyMember> {
    match serde_json::from_value::<MemberListPayload>(payload) {
        Ok(MemberListPayload::Bare(members))
        | Ok(MemberListPayload::Wrapped { members }) => members,
        Err(e) => {
            tracing::warn!(error = %e, "unexpected member list shape");
            Vec::new()
        }
    }
}
