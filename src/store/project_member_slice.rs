use crate::{
    app_state::GatewayType,
    domain::{CompanyId, CompanyMember, GatewayError, MemberId, ProjectId},
};

use super::{Entity, EntitySlice, Resource};

impl Entity for CompanyMember {
    type Id = MemberId;

    fn id(&self) -> &MemberId {
        &self.member_id
    }
}

/// Members of one company assigned to one project.
pub struct ProjectMemberResource {
    gateway: GatewayType,
    project_id: ProjectId,
    company_id: CompanyId,
}

impl ProjectMemberResource {
    pub fn new(
        gateway: GatewayType,
        project_id: ProjectId,
        company_id: CompanyId,
    ) -> Self {
        Self {
            gateway,
            project_id,
            company_id,
        }
    }
}

#[async_trait::async_trait]
impl Resource for ProjectMemberResource {
    type Entity = CompanyMember;
    type Draft = CompanyMember;

    async fn list(&self) -> Result<Vec<CompanyMember>, GatewayError> {
        self.gateway
            .list_company_members_in_project(&self.project_id, &self.company_id)
            .await
    }

    async fn get(&self, id: &MemberId) -> Result<CompanyMember, GatewayError> {
        self.list()
            .await?
            .into_iter()
            .find(|member| &member.member_id == id)
            .ok_or_else(|| GatewayError::NotFound(format!("member {id}")))
    }

    async fn create(
        &self,
        draft: &CompanyMember,
    ) -> Result<CompanyMember, GatewayError> {
        self.gateway
            .add_member_to_project(&self.project_id, &draft.member_id)
            .await?;
        Ok(draft.clone())
    }

    /// Only the manager flag is mutable; it is toggled when it differs from
    /// the server's value and the member is re-read afterwards.
    async fn update(
        &self,
        id: &MemberId,
        draft: &CompanyMember,
    ) -> Result<CompanyMember, GatewayError> {
        let current = self.get(id).await?;
        if current.is_manager == draft.is_manager {
            return Ok(current);
        }
        self.gateway
            .update_project_manager(id, &self.project_id)
            .await?;
        self.get(id).await
    }

    async fn remove(&self, id: &MemberId) -> Result<(), GatewayError> {
        self.gateway
            .remove_member_from_project(&self.project_id, id)
            .await
    }
}

pub type ProjectMemberSlice = EntitySlice<ProjectMemberResource>;

impl ProjectMemberSlice {
    pub fn for_project(
        gateway: GatewayType,
        project_id: ProjectId,
        company_id: CompanyId,
    ) -> Self {
        Self::new(ProjectMemberResource::new(gateway, project_id, company_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MemberRole;
    use crate::services::{GatewayCall, HashmapGateway};
    use std::sync::Arc;

    fn member(id: &str, role: MemberRole) -> CompanyMember {
        let member_id = MemberId::parse(id).unwrap();
        CompanyMember::new(member_id, format!("Member {id}"), role)
    }

    async fn setup() -> (Arc<HashmapGateway>, ProjectMemberSlice) {
        let gateway = Arc::new(HashmapGateway::default());
        let company_id = CompanyId::parse("c1").unwrap();
        gateway
            .add_company_member(&company_id, member("m1", MemberRole::DevAdmin))
            .await;
        gateway
            .add_company_member(&company_id, member("m2", MemberRole::Other))
            .await;
        let slice = ProjectMemberSlice::for_project(
            gateway.clone(),
            ProjectId::parse("p1").unwrap(),
            company_id,
        );
        (gateway, slice)
    }

    #[tokio::test]
    async fn test_create_list_remove() {
        let (_gateway, slice) = setup().await;

        slice.create(&member("m1", MemberRole::DevAdmin)).await.unwrap();
        slice.create(&member("m2", MemberRole::Other)).await.unwrap();
        let listed = slice.list().await.unwrap();
        assert_eq!(listed.len(), 2);

        slice.remove(&MemberId::parse("m1").unwrap()).await.unwrap();
        let state = slice.snapshot().await;
        assert_eq!(state.data, vec![member("m2", MemberRole::Other)]);
    }

    #[tokio::test]
    async fn test_update_toggles_manager_only_when_changed() {
        let (gateway, slice) = setup().await;
        let m1 = member("m1", MemberRole::DevAdmin);
        slice.create(&m1).await.unwrap();
        slice.list().await.unwrap();

        let unchanged = slice.update(&m1.member_id, &m1).await.unwrap();
        assert!(!unchanged.is_manager);

        let promoted = slice
            .update(&m1.member_id, &m1.clone().with_manager(true))
            .await
            .unwrap();
        assert!(promoted.is_manager);
        assert_eq!(slice.snapshot().await.data, vec![promoted]);

        let toggles = gateway
            .calls()
            .await
            .into_iter()
            .filter(|call| {
                matches!(call, GatewayCall::UpdateProjectManager { .. })
            })
            .count();
        assert_eq!(toggles, 1);
    }

    #[tokio::test]
    async fn test_get_unassigned_member_is_rejected() {
        let (_gateway, slice) = setup().await;
        let reason = slice
            .get_by_id(&MemberId::parse("m2").unwrap())
            .await
            .unwrap_err();
        assert_eq!(reason.as_ref(), "Not found: member m2");
    }
}
