//! # In-Memory Project Backend
//!
//! A stand-in for the remote project API, used by the demo binary and the
//! integration tests. It answers [`ApiRequest`]s the way the real backend
//! does: offset/limit listing without a total, 422 for an empty name, 404 for
//! an unknown id.
//!
//! Like every actor in this crate, the server owns its state outright and
//! handles one request at a time, so its store needs no lock.

use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::model::{Project, ProjectCreate, ProjectId, ProjectUpdate};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Backend actor for projects.
///
/// Projects are kept in insertion order, which is the order `list` pages
/// through them.
pub struct ProjectServer {
    receiver: mpsc::Receiver<ApiRequest>,
    store: Vec<Project>,
    next_id: u32,
}

impl ProjectServer {
    /// Creates a new `ProjectServer` and an [`ApiClient`] connected to it.
    pub fn new(buffer_size: usize) -> (Self, ApiClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let server = Self {
            receiver,
            store: Vec::new(),
            next_id: 1,
        };
        (server, ApiClient::new(sender))
    }

    /// Runs the server's event loop, processing requests until every client
    /// is dropped.
    pub async fn run(mut self) {
        info!("Server started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ApiRequest::List {
                    skip,
                    limit,
                    respond_to,
                } => {
                    let rows = self.list(skip, limit);
                    debug!(skip, limit, rows = rows.len(), "List");
                    let _ = respond_to.send(Ok(rows));
                }
                ApiRequest::Create { params, respond_to } => {
                    debug!(?params, "Create");
                    let result = self.create(params);
                    match &result {
                        Ok(project) => info!(id = %project.id, size = self.store.len(), "Created"),
                        Err(e) => warn!(error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ApiRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(%id, ?update, "Update");
                    let result = self.update(id, update);
                    match &result {
                        Ok(_) => info!(%id, "Updated"),
                        Err(e) => warn!(%id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ApiRequest::Delete { id, respond_to } => {
                    debug!(%id, "Delete");
                    let result = self.delete(id);
                    match &result {
                        Ok(()) => info!(%id, size = self.store.len(), "Deleted"),
                        Err(e) => warn!(%id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(size = self.store.len(), "Shutdown");
    }

    fn list(&self, skip: u32, limit: u32) -> Vec<Project> {
        self.store
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect()
    }

    fn create(&mut self, params: ProjectCreate) -> Result<Project, ApiError> {
        if params.name.trim().is_empty() {
            return Err(ApiError::unprocessable("Name is required."));
        }
        let project = Project {
            id: ProjectId::from(self.next_id),
            name: params.name,
            description: params.description.filter(|d| !d.is_empty()),
        };
        self.next_id += 1;
        self.store.push(project.clone());
        Ok(project)
    }

    fn update(&mut self, id: ProjectId, update: ProjectUpdate) -> Result<Project, ApiError> {
        let project = self
            .store
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::not_found("Project"))?;
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(ApiError::unprocessable("Name is required."));
            }
            project.name = name;
        }
        if let Some(description) = update.description {
            project.description = (!description.is_empty()).then_some(description);
        }
        Ok(project.clone())
    }

    fn delete(&mut self, id: ProjectId) -> Result<(), ApiError> {
        let index = self
            .store
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ApiError::not_found("Project"))?;
        self.store.remove(index);
        Ok(())
    }
}
