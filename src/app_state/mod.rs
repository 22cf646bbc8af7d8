use std::sync::Arc;

use crate::{
    domain::{CompanyId, CompanyType, ProjectId, RemoteGateway, ValidationError},
    store::{AssignmentStore, PostSlice, ProjectMemberSlice},
    views::{MemberSelector, PostListPage},
};

pub type GatewayType = Arc<dyn RemoteGateway + Send + Sync>;
pub type PostSliceType = Arc<PostSlice>;
pub type AssignmentStoreType = Arc<AssignmentStore>;

/// The one state container for a running client. Built once at startup
/// and cloned into whatever needs it.
#[derive(Clone)]
pub struct AppState {
    pub gateway: GatewayType,
    pub post_slice: PostSliceType,
    pub assignment_store: AssignmentStoreType,
}

impl AppState {
    pub fn new(gateway: GatewayType) -> Self {
        Self {
            post_slice: Arc::new(PostSlice::for_gateway(gateway.clone())),
            assignment_store: Arc::new(AssignmentStore::new(gateway.clone())),
            gateway,
        }
    }

    pub fn project_member_slice(
        &self,
        project_id: ProjectId,
        company_id: CompanyId,
    ) -> ProjectMemberSlice {
        ProjectMemberSlice::for_project(
            self.gateway.clone(),
            project_id,
            company_id,
        )
    }

    pub fn post_list_page(
        &self,
        page_size: usize,
    ) -> Result<PostListPage, ValidationError> {
        PostListPage::new(self.post_slice.clone(), page_size)
    }

    pub fn member_selector(
        &self,
        project_id: ProjectId,
        company_id: CompanyId,
        company_type: CompanyType,
    ) -> MemberSelector {
        MemberSelector::new(
            self.assignment_store.clone(),
            project_id,
            company_id,
            company_type,
        )
    }
}
