//! # API Client
//!
//! Channel-backed implementation of [`ProjectApi`].

use crate::api::error::ApiError;
use crate::api::message::ApiRequest;
use crate::api::service::ProjectApi;
use crate::model::{Project, ProjectCreate, ProjectId, ProjectUpdate};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Sends [`ApiRequest`]s and awaits their replies.
///
/// Cheap to clone. A closed channel or a dropped reply both surface as
/// [`ApiError::unavailable`], the same as an unreachable backend.
#[derive(Clone)]
pub struct ApiClient {
    sender: mpsc::Sender<ApiRequest>,
}

impl ApiClient {
    pub fn new(sender: mpsc::Sender<ApiRequest>) -> Self {
        Self { sender }
    }

    async fn call<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, ApiError>>) -> ApiRequest,
    ) -> Result<T, ApiError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ApiError::unavailable())?;
        response.await.map_err(|_| ApiError::unavailable())?
    }

    /// Removes a project. Not used by the admin view itself.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProjectId) -> Result<(), ApiError> {
        debug!("Sending request");
        self.call(|respond_to| ApiRequest::Delete { id, respond_to })
            .await
    }
}

#[async_trait]
impl ProjectApi for ApiClient {
    #[instrument(skip(self))]
    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Project>, ApiError> {
        debug!("Sending request");
        self.call(|respond_to| ApiRequest::List {
            skip,
            limit,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    async fn create(&self, params: ProjectCreate) -> Result<Project, ApiError> {
        debug!("Sending request");
        self.call(|respond_to| ApiRequest::Create { params, respond_to })
            .await
    }

    #[instrument(skip(self))]
    async fn update(&self, id: ProjectId, update: ProjectUpdate) -> Result<Project, ApiError> {
        debug!("Sending request");
        self.call(|respond_to| ApiRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }
}
