//! Generic CRUD state container shared by the post and project-member
//! slices. State changes go through [`reduce_slice`]; [`EntitySlice`] runs the
//! remote call and dispatches the outcome.

use std::fmt;

use tokio::sync::RwLock;

use crate::domain::{GatewayError, RejectionReason};
use crate::log_error_chain;

pub trait Entity: Clone + Send + Sync {
    type Id: Clone + PartialEq + fmt::Debug + Send + Sync;

    fn id(&self) -> &Self::Id;
}

/// Remote operations backing a slice.
#[async_trait::async_trait]
pub trait Resource: Send + Sync {
    type Entity: Entity;
    type Draft: Send + Sync;

    async fn list(&self) -> Result<Vec<Self::Entity>, GatewayError>;
    async fn get(
        &self,
        id: &<Self::Entity as Entity>::Id,
    ) -> Result<Self::Entity, GatewayError>;
    async fn create(
        &self,
        draft: &Self::Draft,
    ) -> Result<Self::Entity, GatewayError>;
    async fn update(
        &self,
        id: &<Self::Entity as Entity>::Id,
        draft: &Self::Draft,
    ) -> Result<Self::Entity, GatewayError>;
    async fn remove(
        &self,
        id: &<Self::Entity as Entity>::Id,
    ) -> Result<(), GatewayError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<T> {
    pub data: Vec<T>,
    pub current: Option<T>,
    pub error: Option<RejectionReason>,
}

impl<T> Default for EntityState<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            current: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SliceAction<T: Entity> {
    ListFulfilled(Vec<T>),
    GetFulfilled(T),
    CreateFulfilled(T),
    UpdateFulfilled(T),
    RemoveFulfilled(T::Id),
    Rejected(RejectionReason),
    ClearCurrent,
}

pub fn reduce_slice<T: Entity>(
    state: &EntityState<T>,
    action: SliceAction<T>,
) -> EntityState<T> {
    let mut next = state.clone();
    match action {
        SliceAction::ListFulfilled(items) => {
            next.data = items;
            next.error = None;
        }
        SliceAction::GetFulfilled(item) => {
            next.current = Some(item);
            next.error = None;
        }
        SliceAction::CreateFulfilled(item) => {
            next.data.push(item);
            next.error = None;
        }
        SliceAction::UpdateFulfilled(item) => {
            let existing = next.data.iter_mut().find(|e| e.id() == item.id());
            if let Some(existing) = existing {
                *existing = item;
            }
            next.error = None;
        }
        SliceAction::RemoveFulfilled(id) => {
            next.data.retain(|e| e.id() != &id);
            next.error = None;
        }
        SliceAction::Rejected(reason) => next.error = Some(reason),
        SliceAction::ClearCurrent => next.current = None,
    }
    next
}

pub struct EntitySlice<R: Resource> {
    resource: R,
    state: RwLock<EntityState<R::Entity>>,
}

impl<R: Resource> EntitySlice<R> {
    pub fn new(resource: R) -> Self {
        Self {
            resource,
            state: RwLock::new(EntityState::default()),
        }
    }

    pub async fn snapshot(&self) -> EntityState<R::Entity> {
        self.state.read().await.clone()
    }

    async fn dispatch(&self, action: SliceAction<R::Entity>) {
        let mut state = self.state.write().await;
        *state = reduce_slice(&state, action);
    }

    async fn reject(&self, error: GatewayError) -> RejectionReason {
        log_error_chain(&error, error.log_level());
        let reason = RejectionReason::from(&error);
        self.dispatch(SliceAction::Rejected(reason.clone())).await;
        reason
    }

    #[tracing::instrument(name = "Listing entities", skip_all)]
    pub async fn list(&self) -> Result<Vec<R::Entity>, RejectionReason> {
        match self.resource.list().await {
            Ok(items) => {
                self.dispatch(SliceAction::ListFulfilled(items.clone())).await;
                Ok(items)
            }
            Err(e) => Err(self.reject(e).await),
        }
    }

    #[tracing::instrument(name = "Getting entity by id", skip_all)]
    pub async fn get_by_id(
        &self,
        id: &<R::Entity as Entity>::Id,
    ) -> Result<R::Entity, RejectionReason> {
        match self.resource.get(id).await {
            Ok(item) => {
                self.dispatch(SliceAction::GetFulfilled(item.clone())).await;
                Ok(item)
            }
            Err(e) => Err(self.reject(e).await),
        }
    }

    #[tracing::instrument(name = "Creating entity", skip_all)]
    pub async fn create(
        &self,
        draft: &R::Draft,
    ) -> Result<R::Entity, RejectionReason> {
        match self.resource.create(draft).await {
            Ok(item) => {
                self.dispatch(SliceAction::CreateFulfilled(item.clone())).await;
                Ok(item)
            }
            Err(e) => Err(self.reject(e).await),
        }
    }

    #[tracing::instrument(name = "Updating entity", skip_all)]
    pub async fn update(
        &self,
        id: &<R::Entity as Entity>::Id,
        draft: &R::Draft,
    ) -> Result<R::Entity, RejectionReason> {
        match self.resource.update(id, draft).await {
            Ok(item) => {
                self.dispatch(SliceAction::UpdateFulfilled(item.clone())).await;
                Ok(item)
            }
            Err(e) => Err(self.reject(e).await),
        }
    }

    #[tracing::instrument(name = "Removing entity", skip_all)]
    pub async fn remove(
        &self,
        id: &<R::Entity as Entity>::Id,
    ) -> Result<(), RejectionReason> {
        match self.resource.remove(id).await {
            Ok(()) => {
                self.dispatch(SliceAction::RemoveFulfilled(id.clone())).await;
                Ok(())
            }
            Err(e) => Err(self.reject(e).await),
        }
    }

    /// Drops the "current" reference without touching the network.
    pub async fn clear_current(&self) {
        self.dispatch(SliceAction::ClearCurrent).await;
    }
}
