//! Assignment state for one (project, company) pair: who is on the project,
//! who could be added, and what is still in flight.
//!
//! Add and remove are applied optimistically. Each affected member carries a
//! [`PendingOp`] so a failed call stays visible instead of being silently
//! rolled back; the next authoritative snapshot clears settled entries.
//! Loads carry a per-key token and only the latest issued token may write.

use std::collections::{HashMap, HashSet};

use color_eyre::eyre::Report;
use tokio::{sync::RwLock, task::JoinSet};

use crate::{
    app_state::GatewayType,
    domain::{
        AssignedMember, AssignmentError, CompanyId, CompanyMember,
        GatewayError, MemberId, ProjectId, RejectionReason,
    },
    log_error_chain,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssignmentKey {
    pub project_id: ProjectId,
    pub company_id: CompanyId,
}

impl AssignmentKey {
    pub fn new(project_id: ProjectId, company_id: CompanyId) -> Self {
        Self {
            project_id,
            company_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingStatus {
    Pending,
    Committed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOp {
    pub kind: PendingKind,
    pub status: PendingStatus,
}

/// Whether a load result was written or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Discarded,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentState {
    pub assigned: Vec<AssignedMember>,
    pub candidates: Vec<CompanyMember>,
    pub candidates_loading: bool,
    pub pending: HashMap<MemberId, PendingOp>,
    pub last_error: Option<RejectionReason>,
    assigned_token: u64,
    candidates_token: u64,
}

impl AssignmentState {
    pub fn is_assigned(&self, member_id: &MemberId) -> bool {
        self.assigned.iter().any(|m| &m.member_id == member_id)
    }

    pub fn failed_members(&self) -> Vec<(MemberId, PendingKind)> {
        let mut failed: Vec<_> = self
            .pending
            .iter()
            .filter(|(_, op)| op.status == PendingStatus::Failed)
            .map(|(id, op)| (id.clone(), op.kind))
            .collect();
        failed.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));
        failed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentAction {
    AssignedRequested,
    AssignedLoaded {
        token: u64,
        members: Vec<AssignedMember>,
    },
    AssignedFailed {
        token: u64,
        reason: RejectionReason,
    },
    CandidatesRequested,
    CandidatesLoaded {
        token: u64,
        members: Vec<CompanyMember>,
    },
    CandidatesFailed {
        token: u64,
        reason: RejectionReason,
    },
    SelectionChanged {
        selection: Vec<CompanyMember>,
    },
    RemoveRequested {
        member_id: MemberId,
    },
    MutationSettled {
        member_id: MemberId,
        kind: PendingKind,
        result: Result<(), RejectionReason>,
    },
}

/// Members of `selection` not yet in `assigned`, in selection order.
pub fn additions(
    assigned: &[AssignedMember],
    selection: &[CompanyMember],
) -> Vec<MemberId> {
    let mut seen: HashSet<&MemberId> =
        assigned.iter().map(|m| &m.member_id).collect();
    selection
        .iter()
        .filter(|m| seen.insert(&m.member_id))
        .map(|m| m.member_id.clone())
        .collect()
}

fn unique_by_member_id(members: Vec<CompanyMember>) -> Vec<CompanyMember> {
    let mut seen = HashSet::new();
    members
        .into_iter()
        .filter(|m| seen.insert(m.member_id.clone()))
        .collect()
}

pub fn reduce_assignment(
    state: &AssignmentState,
    action: AssignmentAction,
) -> AssignmentState {
    let mut next = state.clone();
    match action {
        AssignmentAction::AssignedRequested => next.assigned_token += 1,
        AssignmentAction::AssignedLoaded { token, members } => {
            if token == next.assigned_token {
                next.assigned = unique_by_member_id(members);
                next.pending
                    .retain(|_, op| op.status == PendingStatus::Pending);
                next.last_error = None;
            }
        }
        AssignmentAction::AssignedFailed { token, reason } => {
            if token == next.assigned_token {
                next.last_error = Some(reason);
            }
        }
        AssignmentAction::CandidatesRequested => {
            next.candidates_token += 1;
            next.candidates_loading = true;
        }
        AssignmentAction::CandidatesLoaded { token, members } => {
            if token == next.candidates_token {
                next.candidates = unique_by_member_id(members);
                next.candidates_loading = false;
            }
        }
        AssignmentAction::CandidatesFailed { token, reason } => {
            if token == next.candidates_token {
                next.candidates_loading = false;
                next.last_error = Some(reason);
            }
        }
        AssignmentAction::SelectionChanged { selection } => {
            for member_id in additions(&next.assigned, &selection) {
                next.pending.insert(
                    member_id,
                    PendingOp {
                        kind: PendingKind::Add,
                        status: PendingStatus::Pending,
                    },
                );
            }
            next.assigned = unique_by_member_id(selection);
        }
        AssignmentAction::RemoveRequested { member_id } => {
            next.assigned.retain(|m| m.member_id != member_id);
            next.pending.insert(
                member_id,
                PendingOp {
                    kind: PendingKind::Remove,
                    status: PendingStatus::Pending,
                },
            );
        }
        AssignmentAction::MutationSettled {
            member_id,
            kind,
            result,
        } => {
            if let Some(op) = next.pending.get_mut(&member_id) {
                if op.kind == kind {
                    op.status = match result {
                        Ok(()) => PendingStatus::Committed,
                        Err(_) => PendingStatus::Failed,
                    };
                }
            }
            if let Err(reason) = result {
                next.last_error = Some(reason);
            }
        }
    }
    next
}

pub struct AssignmentStore {
    gateway: GatewayType,
    states: RwLock<HashMap<AssignmentKey, AssignmentState>>,
}

impl AssignmentStore {
    pub fn new(gateway: GatewayType) -> Self {
        Self {
            gateway,
            states: RwLock::new(HashMap::new()),
        }
    }

    pub async fn snapshot(&self, key: &AssignmentKey) -> AssignmentState {
        self.states
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    async fn dispatch(
        &self,
        key: &AssignmentKey,
        action: AssignmentAction,
    ) -> AssignmentState {
        let mut states = self.states.write().await;
        let entry = states.entry(key.clone()).or_default();
        *entry = reduce_assignment(entry, action);
        entry.clone()
    }

    #[tracing::instrument(
        name = "Loading assigned members",
        skip_all,
        fields(project_id = %key.project_id, company_id = %key.company_id)
    )]
    pub async fn load_assigned(
        &self,
        key: &AssignmentKey,
    ) -> Result<Resolution, AssignmentError> {
        let token = self
            .dispatch(key, AssignmentAction::AssignedRequested)
            .await
            .assigned_token;

        let result = self
            .gateway
            .list_company_members_in_project(&key.project_id, &key.company_id)
            .await;

        match result {
            Ok(members) => {
                let action =
                    AssignmentAction::AssignedLoaded { token, members };
                let state = self.dispatch(key, action).await;
                Ok(resolution(state.assigned_token, token))
            }
            Err(e) => {
                log_error_chain(&e, e.log_level());
                let reason = RejectionReason::from(&e);
                let action = AssignmentAction::AssignedFailed { token, reason };
                let state = self.dispatch(key, action).await;
                match resolution(state.assigned_token, token) {
                    Resolution::Applied => Err(AssignmentError::Gateway(e)),
                    Resolution::Discarded => Ok(Resolution::Discarded),
                }
            }
        }
    }

    #[tracing::instrument(
        name = "Loading candidate members",
        skip_all,
        fields(project_id = %key.project_id, company_id = %key.company_id)
    )]
    pub async fn load_candidates(
        &self,
        key: &AssignmentKey,
    ) -> Result<Resolution, AssignmentError> {
        let token = self
            .dispatch(key, AssignmentAction::CandidatesRequested)
            .await
            .candidates_token;

        let result = self
            .gateway
            .list_project_members(&key.company_id, &key.project_id)
            .await;

        match result {
            Ok(members) => {
                let action =
                    AssignmentAction::CandidatesLoaded { token, members };
                let state = self.dispatch(key, action).await;
                Ok(resolution(state.candidates_token, token))
            }
            Err(e) => {
                log_error_chain(&e, e.log_level());
                let reason = RejectionReason::from(&e);
                let action =
                    AssignmentAction::CandidatesFailed { token, reason };
                let state = self.dispatch(key, action).await;
                match resolution(state.candidates_token, token) {
                    Resolution::Applied => Err(AssignmentError::Gateway(e)),
                    Resolution::Discarded => Ok(Resolution::Discarded),
                }
            }
        }
    }

    /// Replaces the local assignment with `selection` immediately and issues
    /// one add call per member that was not already assigned. Calls run
    /// independently; each settles its own pending entry.
    #[tracing::instrument(
        name = "Adding members to project",
        skip_all,
        fields(project_id = %key.project_id)
    )]
    pub async fn add_members(
        &self,
        key: &AssignmentKey,
        selection: Vec<CompanyMember>,
    ) -> Vec<(MemberId, Result<(), RejectionReason>)> {
        let new_members = {
            let mut states = self.states.write().await;
            let entry = states.entry(key.clone()).or_default();
            let new_members = additions(&entry.assigned, &selection);
            let action = AssignmentAction::SelectionChanged { selection };
            *entry = reduce_assignment(entry, action);
            new_members
        };

        let mut calls = JoinSet::new();
        let mut in_flight = HashMap::new();
        for member_id in new_members {
            let gateway = self.gateway.clone();
            let project_id = key.project_id.clone();
            let target = member_id.clone();
            let handle = calls.spawn(async move {
                gateway.add_member_to_project(&project_id, &target).await
            });
            in_flight.insert(handle.id(), member_id);
        }

        let mut settled = Vec::new();
        while let Some(joined) = calls.join_next_with_id().await {
            let (task_id, result) = match joined {
                Ok((task_id, result)) => (task_id, result),
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "add member task did not complete"
                    );
                    let task_id = e.id();
                    let error = GatewayError::UnexpectedError(Report::new(e));
                    (task_id, Err(error))
                }
            };
            let Some(member_id) = in_flight.remove(&task_id) else {
                continue;
            };
            let result = self
                .settle(key, member_id.clone(), PendingKind::Add, result)
                .await;
            settled.push((member_id, result));
        }
        settled
    }

    /// Drops the member locally right away, then issues the remove call.
    #[tracing::instrument(
        name = "Removing member from project",
        skip_all,
        fields(project_id = %key.project_id, member_id = %member_id)
    )]
    pub async fn remove_member(
        &self,
        key: &AssignmentKey,
        member_id: &MemberId,
    ) -> Result<(), RejectionReason> {
        self.dispatch(
            key,
            AssignmentAction::RemoveRequested {
                member_id: member_id.clone(),
            },
        )
        .await;

        let result = self
            .gateway
            .remove_member_from_project(&key.project_id, member_id)
            .await;
        self.settle(key, member_id.clone(), PendingKind::Remove, result)
            .await
    }

    /// Toggles the manager flag, then re-reads the assigned members. Nothing
    /// is written locally when the toggle itself fails.
    #[tracing::instrument(
        name = "Toggling project manager",
        skip_all,
        fields(project_id = %key.project_id, member_id = %member_id)
    )]
    pub async fn set_manager(
        &self,
        key: &AssignmentKey,
        member_id: &MemberId,
    ) -> Result<Resolution, AssignmentError> {
        if let Err(e) = self
            .gateway
            .update_project_manager(member_id, &key.project_id)
            .await
        {
            log_error_chain(&e, e.log_level());
            return Err(AssignmentError::Gateway(e));
        }

        self.load_assigned(key).await.map_err(|e| match e {
            AssignmentError::Gateway(inner) => AssignmentError::Resync(inner),
            other => other,
        })
    }

    async fn settle(
        &self,
        key: &AssignmentKey,
        member_id: MemberId,
        kind: PendingKind,
        result: Result<(), GatewayError>,
    ) -> Result<(), RejectionReason> {
        let result = result.map_err(|e| {
            log_error_chain(&e, e.log_level());
            RejectionReason::from(&e)
        });
        self.dispatch(
            key,
            AssignmentAction::MutationSettled {
                member_id,
                kind,
                result: result.clone(),
            },
        )
        .await;
        result
    }
}

fn resolution(latest: u64, token: u64) -> Resolution {
    if latest == token {
        Resolution::Applied
    } else {
        Resolution::Discarded
    }
}
