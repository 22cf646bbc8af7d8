use crate::{
    app_state::GatewayType,
    domain::{GatewayError, Post, PostDraft, PostId},
};

use super::{Entity, EntitySlice, Resource};

impl Entity for Post {
    type Id = PostId;

    fn id(&self) -> &PostId {
        &self.id
    }
}

pub struct PostResource {
    gateway: GatewayType,
}

impl PostResource {
    pub fn new(gateway: GatewayType) -> Self {
        Self { gateway }
    }
}

#[async_trait::async_trait]
impl Resource for PostResource {
    type Entity = Post;
    type Draft = PostDraft;

    async fn list(&self) -> Result<Vec<Post>, GatewayError> {
        self.gateway.list_posts().await
    }

    async fn get(&self, id: &PostId) -> Result<Post, GatewayError> {
        self.gateway.get_post(id).await
    }

    async fn create(&self, draft: &PostDraft) -> Result<Post, GatewayError> {
        self.gateway.create_post(draft).await
    }

    async fn update(
        &self,
        id: &PostId,
        draft: &PostDraft,
    ) -> Result<Post, GatewayError> {
        self.gateway.update_post(id, draft).await
    }

    async fn remove(&self, id: &PostId) -> Result<(), GatewayError> {
        self.gateway.delete_post(id).await
    }
}

pub type PostSlice = EntitySlice<PostResource>;

impl PostSlice {
    pub fn for_gateway(gateway: GatewayType) -> Self {
        Self::new(PostResource::new(gateway))
    }
}
