use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use color_eyre::eyre::eyre;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::{
    AssignedMember, CompanyId, CompanyMember, GatewayError, MemberId, Post,
    PostDraft, PostId, ProjectId, RemoteGateway,
};

/// One recorded call, in the order it reached the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    ListPosts,
    GetPost(PostId),
    CreatePost,
    UpdatePost(PostId),
    DeletePost(PostId),
    ListProjectMembers {
        company_id: CompanyId,
        project_id: ProjectId,
    },
    ListCompanyMembersInProject {
        project_id: ProjectId,
        company_id: CompanyId,
    },
    AddMemberToProject {
        project_id: ProjectId,
        member_id: MemberId,
    },
    RemoveMemberFromProject {
        project_id: ProjectId,
        member_id: MemberId,
    },
    UpdateProjectManager {
        member_id: MemberId,
        project_id: ProjectId,
    },
}

impl GatewayCall {
    pub fn operation(&self) -> GatewayOperation {
        match self {
            Self::ListPosts => GatewayOperation::ListPosts,
            Self::GetPost(_) => GatewayOperation::GetPost,
            Self::CreatePost => GatewayOperation::CreatePost,
            Self::UpdatePost(_) => GatewayOperation::UpdatePost,
            Self::DeletePost(_) => GatewayOperation::DeletePost,
            Self::ListProjectMembers { .. } => {
                GatewayOperation::ListProjectMembers
            }
            Self::ListCompanyMembersInProject { .. } => {
                GatewayOperation::ListCompanyMembersInProject
            }
            Self::AddMemberToProject { .. } => {
                GatewayOperation::AddMemberToProject
            }
            Self::RemoveMemberFromProject { .. } => {
                GatewayOperation::RemoveMemberFromProject
            }
            Self::UpdateProjectManager { .. } => {
                GatewayOperation::UpdateProjectManager
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    ListPosts,
    GetPost,
    CreatePost,
    UpdatePost,
    DeletePost,
    ListProjectMembers,
    ListCompanyMembersInProject,
    AddMemberToProject,
    RemoveMemberFromProject,
    UpdateProjectManager,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayFailure {
    Transport,
    /// The call panics instead of returning.
    Panic,
    Rejected { status: u16, payload: serde_json::Value },
}

impl GatewayFailure {
    pub fn rejected(message: &str) -> Self {
        Self::Rejected {
            status: 400,
            payload: json!({ "message": message }),
        }
    }

    fn into_error(self) -> GatewayError {
        match self {
            Self::Transport => {
                GatewayError::Transport(eyre!("simulated transport failure"))
            }
            Self::Panic => panic!("simulated gateway panic"),
            Self::Rejected { status, payload } => GatewayError::Rejected {
                status,
                payload: Some(payload),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ProjectLink {
    member_id: MemberId,
    is_manager: bool,
}

#[derive(Default)]
struct Inner {
    posts: Vec<Post>,
    next_post_id: u64,
    rosters: HashMap<CompanyId, Vec<CompanyMember>>,
    links: HashMap<ProjectId, Vec<ProjectLink>>,
    calls: Vec<GatewayCall>,
    failures: HashMap<GatewayOperation, GatewayFailure>,
    delays: HashMap<GatewayOperation, VecDeque<Duration>>,
}

impl Inner {
    fn members_in_project(
        &self,
        project_id: &ProjectId,
        company_id: &CompanyId,
    ) -> Vec<AssignedMember> {
        let Some(roster) = self.rosters.get(company_id) else {
            return Vec::new();
        };
        self.links
            .get(project_id)
            .into_iter()
            .flatten()
            .filter_map(|link| {
                roster
                    .iter()
                    .find(|m| m.member_id == link.member_id)
                    .map(|m| m.clone().with_manager(link.is_manager))
            })
            .collect()
    }

    fn link_mut(
        &mut self,
        project_id: &ProjectId,
        member_id: &MemberId,
    ) -> Option<&mut ProjectLink> {
        self.links
            .get_mut(project_id)?
            .iter_mut()
            .find(|link| &link.member_id == member_id)
    }
}

/// In-memory [`RemoteGateway`] that records every call and can be told to
/// fail or stall specific operations.
#[derive(Default)]
pub struct HashmapGateway {
    inner: RwLock<Inner>,
}

impl HashmapGateway {
    pub async fn add_post(&self, post: Post) {
        self.inner.write().await.posts.push(post);
    }

    pub async fn add_company_member(
        &self,
        company_id: &CompanyId,
        member: CompanyMember,
    ) {
        self.inner
            .write()
            .await
            .rosters
            .entry(company_id.clone())
            .or_default()
            .push(member);
    }

    pub async fn link_member(
        &self,
        project_id: &ProjectId,
        member_id: &MemberId,
        is_manager: bool,
    ) {
        self.inner
            .write()
            .await
            .links
            .entry(project_id.clone())
            .or_default()
            .push(ProjectLink {
                member_id: member_id.clone(),
                is_manager,
            });
    }

    pub async fn fail(
        &self,
        operation: GatewayOperation,
        failure: GatewayFailure,
    ) {
        self.inner.write().await.failures.insert(operation, failure);
    }

    pub async fn clear_failures(&self) {
        self.inner.write().await.failures.clear();
    }

    /// Holds the next call to `operation` for `delay` after its data is read.
    pub async fn delay_next(
        &self,
        operation: GatewayOperation,
        delay: Duration,
    ) {
        self.inner
            .write()
            .await
            .delays
            .entry(operation)
            .or_default()
            .push_back(delay);
    }

    pub async fn calls(&self) -> Vec<GatewayCall> {
        self.inner.read().await.calls.clone()
    }

    /// Records the call and runs `f` against the data unless the operation
    /// is set to fail. Any queued delay is served after the lock is released.
    async fn handle<T>(
        &self,
        call: GatewayCall,
        f: impl FnOnce(&mut Inner) -> Result<T, GatewayError>,
    ) -> Result<T, GatewayError> {
        let operation = call.operation();
        let (result, delay) = {
            let mut inner = self.inner.write().await;
            inner.calls.push(call);
            let delay = inner
                .delays
                .get_mut(&operation)
                .and_then(VecDeque::pop_front);
            let result = match inner.failures.get(&operation).cloned() {
                Some(failure) => Err(failure.into_error()),
                None => f(&mut *inner),
            };
            (result, delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

#[async_trait::async_trait]
impl RemoteGateway for HashmapGateway {
    async fn list_posts(&self) -> Result<Vec<Post>, GatewayError> {
        self.handle(GatewayCall::ListPosts, |inner| Ok(inner.posts.clone()))
            .await
    }

    async fn get_post(&self, id: &PostId) -> Result<Post, GatewayError> {
        self.handle(GatewayCall::GetPost(id.clone()), |inner| {
            inner
                .posts
                .iter()
                .find(|p| &p.id == id)
                .cloned()
                .ok_or_else(|| GatewayError::NotFound(format!("post {id}")))
        })
        .await
    }

    async fn create_post(
        &self,
        draft: &PostDraft,
    ) -> Result<Post, GatewayError> {
        self.handle(GatewayCall::CreatePost, |inner| {
            inner.next_post_id += 1;
            let post = Post {
                id: PostId::new(inner.next_post_id.to_string()),
                created_at: chrono::Utc::now().date_naive(),
                author: draft.author.clone(),
                task_name: Some(draft.task_name.clone()),
                status: draft.status,
                due_date: draft.due_date,
            };
            inner.posts.push(post.clone());
            Ok(post)
        })
        .await
    }

    async fn update_post(
        &self,
        id: &PostId,
        draft: &PostDraft,
    ) -> Result<Post, GatewayError> {
        self.handle(GatewayCall::UpdatePost(id.clone()), |inner| {
            let post = inner
                .posts
                .iter_mut()
                .find(|p| &p.id == id)
                .ok_or_else(|| GatewayError::NotFound(format!("post {id}")))?;
            post.author = draft.author.clone();
            post.task_name = Some(draft.task_name.clone());
            post.status = draft.status;
            post.due_date = draft.due_date;
            Ok(post.clone())
        })
        .await
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), GatewayError> {
        self.handle(GatewayCall::DeletePost(id.clone()), |inner| {
            let before = inner.posts.len();
            inner.posts.retain(|p| &p.id != id);
            if inner.posts.len() == before {
                return Err(GatewayError::NotFound(format!("post {id}")));
            }
            Ok(())
        })
        .await
    }

    async fn list_project_members(
        &self,
        company_id: &CompanyId,
        project_id: &ProjectId,
    ) -> Result<Vec<CompanyMember>, GatewayError> {
        let call = GatewayCall::ListProjectMembers {
            company_id: company_id.clone(),
            project_id: project_id.clone(),
        };
        self.handle(call, |inner| {
            Ok(inner.rosters.get(company_id).cloned().unwrap_or_default())
        })
        .await
    }

    async fn list_company_members_in_project(
        &self,
        project_id: &ProjectId,
        company_id: &CompanyId,
    ) -> Result<Vec<AssignedMember>, GatewayError> {
        let call = GatewayCall::ListCompanyMembersInProject {
            project_id: project_id.clone(),
            company_id: company_id.clone(),
        };
        self.handle(call, |inner| {
            Ok(inner.members_in_project(project_id, company_id))
        })
        .await
    }

    async fn add_member_to_project(
        &self,
        project_id: &ProjectId,
        member_id: &MemberId,
    ) -> Result<(), GatewayError> {
        let call = GatewayCall::AddMemberToProject {
            project_id: project_id.clone(),
            member_id: member_id.clone(),
        };
        self.handle(call, |inner| {
            if inner.link_mut(project_id, member_id).is_some() {
                return Err(GatewayError::Rejected {
                    status: 409,
                    payload: Some(
                        json!({ "message": "Member already assigned" }),
                    ),
                });
            }
            inner
                .links
                .entry(project_id.clone())
                .or_default()
                .push(ProjectLink {
                    member_id: member_id.clone(),
                    is_manager: false,
                });
            Ok(())
        })
        .await
    }

    async fn remove_member_from_project(
        &self,
        project_id: &ProjectId,
        member_id: &MemberId,
    ) -> Result<(), GatewayError> {
        let call = GatewayCall::RemoveMemberFromProject {
            project_id: project_id.clone(),
            member_id: member_id.clone(),
        };
        self.handle(call, |inner| {
            let links = inner.links.get_mut(project_id).ok_or_else(|| {
                GatewayError::NotFound(format!("project {project_id}"))
            })?;
            let before = links.len();
            links.retain(|link| &link.member_id != member_id);
            if links.len() == before {
                let missing = format!("member {member_id}");
                return Err(GatewayError::NotFound(missing));
            }
            Ok(())
        })
        .await
    }

    async fn update_project_manager(
        &self,
        member_id: &MemberId,
        project_id: &ProjectId,
    ) -> Result<(), GatewayError> {
        let call = GatewayCall::UpdateProjectManager {
            member_id: member_id.clone(),
            project_id: project_id.clone(),
        };
        self.handle(call, |inner| {
            let link =
                inner.link_mut(project_id, member_id).ok_or_else(|| {
                    GatewayError::NotFound(format!("member {member_id}"))
                })?;
            link.is_manager = !link.is_manager;
            Ok(())
        })
        .await
    }
}
