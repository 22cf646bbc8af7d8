use crate::domain::{AssignedMember, ToggleError};

pub const DIALOG_TITLE: &str = "매니저 권한 변경";
pub const DIALOG_CONFIRM: &str = "확인";
pub const DIALOG_CANCEL: &str = "취소";
const DESCRIPTION_REVOKE: &str = "매니저 등록을 해제 합니다.";
const DESCRIPTION_GRANT: &str = "매니저 등록을 합니다.";

/// Confirmation flow in front of a manager-flag change.
///
/// `Idle -> ConfirmPending -> Submitting -> Idle`, with cancel going straight
/// back to `Idle`. A failed submission also ends in `Idle`; retrying starts
/// over from [`ManagerToggle::request`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ManagerToggle {
    #[default]
    Idle,
    ConfirmPending(AssignedMember),
    Submitting(AssignedMember),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub title: &'static str,
    pub description: &'static str,
    pub confirm_text: &'static str,
    pub cancel_text: &'static str,
    /// The flag value the member will end up with if confirmed.
    pub wants_manager_on: bool,
}

impl ManagerToggle {
    pub fn request(
        &mut self,
        member: &AssignedMember,
    ) -> Result<(), ToggleError> {
        if !member.member_role.can_manage_roles() {
            return Err(ToggleError::NotPermitted(member.member_role));
        }
        match self {
            Self::Idle => {
                *self = Self::ConfirmPending(member.clone());
                Ok(())
            }
            _ => Err(ToggleError::Busy),
        }
    }

    pub fn cancel(&mut self) {
        if let Self::ConfirmPending(_) = self {
            *self = Self::Idle;
        }
    }

    /// Moves to `Submitting` and hands back the member to submit for.
    pub fn confirm(&mut self) -> Result<AssignedMember, ToggleError> {
        match std::mem::take(self) {
            Self::ConfirmPending(member) => {
                *self = Self::Submitting(member.clone());
                Ok(member)
            }
            other => {
                *self = other;
                Err(ToggleError::NothingToConfirm)
            }
        }
    }

    pub fn complete(&mut self) {
        if let Self::Submitting(_) = self {
            *self = Self::Idle;
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn dialog(&self) -> Option<ConfirmDialog> {
        let Self::ConfirmPending(member) = self else {
            return None;
        };
        Some(ConfirmDialog {
            title: DIALOG_TITLE,
            description: if member.is_manager {
                DESCRIPTION_REVOKE
            } else {
                DESCRIPTION_GRANT
            },
            confirm_text: DIALOG_CONFIRM,
            cancel_text: DIALOG_CANCEL,
            wants_manager_on: !member.is_manager,
        })
    }
}
