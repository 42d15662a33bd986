//! # API Messages
//!
//! Requests sent from an [`ApiClient`](crate::api::ApiClient) to whatever
//! answers them: the in-memory [`ProjectServer`](crate::server::ProjectServer)
//! or a test mock. Each variant maps to one endpoint of the project API.

use crate::api::error::ApiError;
use crate::model::{Project, ProjectCreate, ProjectId, ProjectUpdate};
use tokio::sync::oneshot;

/// Type alias for the one-shot reply channel of an API request.
pub type Reply<T> = oneshot::Sender<Result<T, ApiError>>;

#[derive(Debug)]
pub enum ApiRequest {
    /// `GET /projects?skip=&limit=`. No total count comes back.
    List {
        skip: u32,
        limit: u32,
        respond_to: Reply<Vec<Project>>,
    },
    Create {
        params: ProjectCreate,
        respond_to: Reply<Project>,
    },
    Update {
        id: ProjectId,
        update: ProjectUpdate,
        respond_to: Reply<Project>,
    },
    Delete {
        id: ProjectId,
        respond_to: Reply<()>,
    },
}
