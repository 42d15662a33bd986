use crate::api::ProjectApi;
use crate::cache::CacheActor;
use crate::form::{CreateProject, EditProject, FormDialog};
use crate::list::{ListController, PageNavigator};
use crate::model::Project;
use crate::notify::{Notifier, TracingNotifier};
use crate::pages::{PageCache, ProjectPages, PROJECTS};
use crate::runtime::AdminConfig;
use crate::server::ProjectServer;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("{actor} task failed: {reason}")]
    TaskFailed { actor: &'static str, reason: String },
}

/// Owns the page cache (and, for [`AdminSystem::new`], the in-memory backend)
/// and hands out the list and the dialogs wired to them.
///
/// # Example
///
/// ```ignore
/// let system = AdminSystem::new(AdminConfig::default());
///
/// let mut list = system.list_controller();
/// list.load().await?;
///
/// let mut dialog = system.create_form();
/// dialog.open();
/// dialog.set_field(Field::Name, "Alpha");
/// dialog.submit().await?;
///
/// drop((list, dialog));
/// system.shutdown().await?;
/// ```
pub struct AdminSystem {
    config: AdminConfig,
    api: Arc<dyn ProjectApi>,
    cache: PageCache,
    notifier: Arc<dyn Notifier>,
    navigator: PageNavigator,
    /// Shut down in order: the cache first, since its fetches call the backend.
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl AdminSystem {
    /// Starts an in-memory backend and a page cache over it. Notifications
    /// go to the log.
    pub fn new(config: AdminConfig) -> Self {
        let config = config.normalized();
        let (server, api) = ProjectServer::new(config.api_buffer);
        let server_handle = tokio::spawn(server.run());

        let mut system = Self::with_api(config, Arc::new(api), Arc::new(TracingNotifier));
        system.handles.push(("server", server_handle));
        system
    }

    /// Starts a page cache over an existing backend. The caller keeps
    /// ownership of whatever serves `api`.
    pub fn with_api(config: AdminConfig, api: Arc<dyn ProjectApi>, notifier: Arc<dyn Notifier>) -> Self {
        let config = config.normalized();
        let (cache_actor, cache) = CacheActor::<ProjectPages>::new(config.cache_buffer);
        let source = ProjectPages::new(Arc::clone(&api), config.page_size);
        let cache_handle = tokio::spawn(cache_actor.run(source));
        info!(page_size = config.page_size, "Admin system started");

        Self {
            config,
            api,
            cache,
            notifier,
            navigator: PageNavigator::default(),
            handles: vec![("cache", cache_handle)],
        }
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn api(&self) -> &Arc<dyn ProjectApi> {
        &self.api
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// The shared page state, e.g. for applying a `?page=` search string.
    pub fn navigator(&self) -> &PageNavigator {
        &self.navigator
    }

    pub fn list_controller(&self) -> ListController {
        ListController::new(
            self.cache.clone(),
            self.navigator.clone(),
            PROJECTS,
            self.config.page_size,
        )
    }

    pub fn create_form(&self) -> FormDialog<CreateProject> {
        FormDialog::new(
            CreateProject,
            Arc::clone(&self.api),
            self.cache.clone(),
            Arc::clone(&self.notifier),
        )
    }

    pub fn edit_form(&self, project: Project) -> FormDialog<EditProject> {
        FormDialog::new(
            EditProject::new(project),
            Arc::clone(&self.api),
            self.cache.clone(),
            Arc::clone(&self.notifier),
        )
    }

    /// Stops the cache and then the backend.
    ///
    /// Each actor exits once every handle to it is gone, so drop all list
    /// controllers and dialogs before calling this.
    pub async fn shutdown(self) -> Result<(), ShutdownError> {
        info!("Shutting down admin system...");

        drop(self.cache);
        drop(self.api);
        drop(self.notifier);

        for (actor, handle) in self.handles {
            if let Err(e) = handle.await {
                error!(actor, error = ?e, "Task failed");
                return Err(ShutdownError::TaskFailed {
                    actor,
                    reason: e.to_string(),
                });
            }
        }

        info!("Admin system shutdown complete.");
        Ok(())
    }
}
