use super::{
    AssignedMember, CompanyId, CompanyMember, GatewayError, MemberId, Post,
    PostDraft, PostId, ProjectId,
};

/// Remote operations the client relies on. Implementations own the
/// transport; callers only see domain types and [`GatewayError`].
#[async_trait::async_trait]
pub trait RemoteGateway {
    async fn list_posts(&self) -> Result<Vec<Post>, GatewayError>;
    async fn get_post(&self, id: &PostId) -> Result<Post, GatewayError>;
    async fn create_post(
        &self,
        draft: &PostDraft,
    ) -> Result<Post, GatewayError>;
    async fn update_post(
        &self,
        id: &PostId,
        draft: &PostDraft,
    ) -> Result<Post, GatewayError>;
    async fn delete_post(&self, id: &PostId) -> Result<(), GatewayError>;

    /// Members of `company_id` that may be added to `project_id`.
    async fn list_project_members(
        &self,
        company_id: &CompanyId,
        project_id: &ProjectId,
    ) -> Result<Vec<CompanyMember>, GatewayError>;

    /// Members of `company_id` already assigned to `project_id`.
    async fn list_company_members_in_project(
        &self,
        project_id: &ProjectId,
        company_id: &CompanyId,
    ) -> Result<Vec<AssignedMember>, GatewayError>;

    async fn add_member_to_project(
        &self,
        project_id: &ProjectId,
        member_id: &MemberId,
    ) -> Result<(), GatewayError>;
    async fn remove_member_from_project(
        &self,
        project_id: &ProjectId,
        member_id: &MemberId,
    ) -> Result<(), GatewayError>;

    /// Flips the manager flag server-side. This is a toggle, not a set.
    async fn update_project_manager(
        &self,
        member_id: &MemberId,
        project_id: &ProjectId,
    ) -> Result<(), GatewayError>;
}
