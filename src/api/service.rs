//! The three calls the admin view needs from the backend.

use crate::api::error::ApiError;
use crate::model::{Project, ProjectCreate, ProjectId, ProjectUpdate};
use async_trait::async_trait;

/// Remote CRUD API for projects, as consumed by the cache and the forms.
///
/// `list` has no ordering guarantee beyond the server default and reports no
/// total count, which is why pagination has to guess whether a next page
/// exists.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Project>, ApiError>;

    async fn create(&self, params: ProjectCreate) -> Result<Project, ApiError>;

    async fn update(&self, id: ProjectId, update: ProjectUpdate) -> Result<Project, ApiError>;
}
