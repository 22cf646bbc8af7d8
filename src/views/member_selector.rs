use std::sync::Arc;

use crate::{
    domain::{
        AssignedMember, AssignmentError, CompanyId, CompanyMember, CompanyType,
        MemberId, MemberRole, ProjectId, RejectionReason, ToggleError,
    },
    store::{
        project, AssignmentKey, AssignmentState, AssignmentStore,
        ConfirmDialog, ManagerToggle, PendingStatus, Resolution,
        ViewParameters,
    },
};

pub const MANAGER_TOGGLE_FAILED: &str = "매니저 등록/해제에 실패했습니다.";
const OPTION_FILTER_KEY: &str = "memberName";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    /// Must be acknowledged before the user carries on.
    Blocking,
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberOption {
    pub member: CompanyMember,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberCard {
    pub id: MemberId,
    pub name: String,
    pub email: Option<String>,
    pub role: MemberRole,
    pub is_manager: bool,
    pub initial: String,
    pub can_toggle_manager: bool,
    pub pending: Option<PendingStatus>,
}

/// Assignment control for one company's members on a project, plus the
/// assigned-member list with remove and manager-toggle affordances.
pub struct MemberSelector {
    key: AssignmentKey,
    company_type: CompanyType,
    store: Arc<AssignmentStore>,
    open: bool,
    candidates_loaded: bool,
    input_value: String,
    toggle: ManagerToggle,
    alerts: Vec<Alert>,
}

impl MemberSelector {
    pub fn new(
        store: Arc<AssignmentStore>,
        project_id: ProjectId,
        company_id: CompanyId,
        company_type: CompanyType,
    ) -> Self {
        Self {
            key: AssignmentKey::new(project_id, company_id),
            company_type,
            store,
            open: false,
            candidates_loaded: false,
            input_value: String::new(),
            toggle: ManagerToggle::default(),
            alerts: Vec::new(),
        }
    }

    pub fn key(&self) -> &AssignmentKey {
        &self.key
    }

    pub fn placeholder(&self) -> String {
        format!("{} 직원 이름 검색", self.company_type.label())
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub async fn state(&self) -> AssignmentState {
        self.store.snapshot(&self.key).await
    }

    /// Loads the members already on the project. Candidates are not fetched
    /// here; see [`MemberSelector::open`].
    pub async fn mount(&mut self) -> Result<Resolution, AssignmentError> {
        self.store.load_assigned(&self.key).await
    }

    /// Opens the option list, fetching candidates on first use.
    pub async fn open(&mut self) -> Result<(), AssignmentError> {
        self.open = true;
        if self.candidates_loaded {
            return Ok(());
        }
        if self.store.load_candidates(&self.key).await? == Resolution::Applied {
            self.candidates_loaded = true;
        }
        Ok(())
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input_value = value.into();
    }

    pub fn clear_input(&mut self) {
        self.input_value.clear();
    }

    /// Candidates whose name contains the typed text.
    pub async fn options(&self) -> Vec<MemberOption> {
        let state = self.state().await;
        let page_size = state.candidates.len().max(1);
        let Ok(params) = ViewParameters::new(1, page_size, &self.input_value)
        else {
            return Vec::new();
        };
        project(&state.candidates, &params, OPTION_FILTER_KEY)
            .page
            .into_iter()
            .map(|member| MemberOption {
                selected: state.is_assigned(&member.member_id),
                member,
            })
            .collect()
    }

    /// Applies a new full selection from the option list and closes it.
    pub async fn change(
        &mut self,
        selection: Vec<CompanyMember>,
    ) -> Vec<(MemberId, Result<(), RejectionReason>)> {
        self.open = false;
        self.store.add_members(&self.key, selection).await
    }

    /// Picks one option: the current assignment plus `member`.
    pub async fn select(
        &mut self,
        member: CompanyMember,
    ) -> Vec<(MemberId, Result<(), RejectionReason>)> {
        let mut selection = self.state().await.assigned;
        selection.push(member);
        self.change(selection).await
    }

    pub async fn remove(
        &mut self,
        member_id: &MemberId,
    ) -> Result<(), RejectionReason> {
        self.store.remove_member(&self.key, member_id).await
    }

    pub async fn cards(&self) -> Vec<MemberCard> {
        let state = self.state().await;
        state
            .assigned
            .iter()
            .map(|member| MemberCard {
                id: member.member_id.clone(),
                name: member.member_name.clone(),
                email: member.email.clone(),
                role: member.member_role,
                is_manager: member.is_manager,
                initial: member.initial(),
                can_toggle_manager: member.member_role.can_manage_roles(),
                pending: state
                    .pending
                    .get(&member.member_id)
                    .map(|op| op.status),
            })
            .collect()
    }

    pub async fn click_manager(
        &mut self,
        member_id: &MemberId,
    ) -> Result<(), ToggleError> {
        let member: AssignedMember = self
            .state()
            .await
            .assigned
            .into_iter()
            .find(|m| &m.member_id == member_id)
            .ok_or_else(|| ToggleError::UnknownMember(member_id.to_string()))?;
        self.toggle.request(&member)
    }

    pub fn dialog(&self) -> Option<ConfirmDialog> {
        self.toggle.dialog()
    }

    pub fn toggle_state(&self) -> &ManagerToggle {
        &self.toggle
    }

    pub fn cancel_manager_change(&mut self) {
        self.toggle.cancel();
    }

    /// Submits the pending manager change. A failed toggle raises a blocking
    /// alert; either way the flow ends back in `Idle`.
    pub async fn confirm_manager_change(&mut self) -> Result<(), ToggleError> {
        let member = self.toggle.confirm()?;
        match self.store.set_manager(&self.key, &member.member_id).await {
            Ok(_) => {}
            Err(AssignmentError::Gateway(_)) => self.alerts.push(Alert {
                level: AlertLevel::Blocking,
                message: MANAGER_TOGGLE_FAILED.to_owned(),
            }),
            Err(AssignmentError::Resync(e)) => self.alerts.push(Alert {
                level: AlertLevel::Notice,
                message: RejectionReason::from(&e).to_string(),
            }),
        }
        self.toggle.complete();
        Ok(())
    }

    pub fn take_alerts(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }
}
