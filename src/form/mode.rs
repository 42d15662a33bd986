//! # Form Modes
//!
//! The add and edit dialogs differ only in where their defaults come from,
//! whether an unchanged form may be submitted, which API call saves it and
//! what happens to the baseline afterwards. [`FormMode`] captures exactly
//! those differences so [`FormDialog`](super::FormDialog) is written once.

use super::error::FormError;
use super::fields::{Field, ProjectFields};
use crate::api::ProjectApi;
use crate::model::{Project, ProjectCreate, ProjectUpdate};
use async_trait::async_trait;

/// Trait every dialog mode implements.
///
/// # Provided Methods (Hooks)
/// - [`FormMode::required`]: only `name` by default
/// - [`FormMode::requires_changes`]: `false` by default
/// - [`FormMode::on_success`]: does nothing by default
#[async_trait]
pub trait FormMode: Send + Sync + 'static {
    /// Dialog heading.
    fn title(&self) -> &'static str;

    /// Values the dialog opens with and resets to.
    fn defaults(&self) -> ProjectFields;

    /// Body of the success notification.
    fn success_message(&self) -> &'static str;

    /// Builds the payload from `values` and sends it.
    async fn save(&self, api: &dyn ProjectApi, values: &ProjectFields) -> Result<Project, FormError>;

    fn required(&self) -> &'static [Field] {
        &[Field::Name]
    }

    /// Whether submit stays disabled until a value differs from the defaults.
    fn requires_changes(&self) -> bool {
        false
    }

    /// Called with the saved project before the dialog resets.
    fn on_success(&mut self, _saved: &Project) {}
}

fn optional(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

/// "Add Project": empty defaults, cleared after every save.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateProject;

#[async_trait]
impl FormMode for CreateProject {
    fn title(&self) -> &'static str {
        "Add Project"
    }

    fn defaults(&self) -> ProjectFields {
        ProjectFields::default()
    }

    fn success_message(&self) -> &'static str {
        "Project created successfully."
    }

    async fn save(&self, api: &dyn ProjectApi, values: &ProjectFields) -> Result<Project, FormError> {
        let values = values.normalized();
        let params = ProjectCreate {
            name: values.name,
            description: optional(&values.description),
        };
        Ok(api.create(params).await?)
    }
}

/// "Edit Project": defaults come from the loaded project, and only changed
/// fields are sent.
#[derive(Debug, Clone)]
pub struct EditProject {
    project: Project,
}

impl EditProject {
    pub fn new(project: Project) -> Self {
        Self { project }
    }

    /// The project as last loaded or saved.
    pub fn project(&self) -> &Project {
        &self.project
    }

    fn changes(&self, values: &ProjectFields) -> ProjectUpdate {
        let values = values.normalized();
        let baseline = ProjectFields::from_project(&self.project);
        ProjectUpdate {
            name: (values.name != baseline.name).then(|| values.name.clone()),
            description: (values.description != baseline.description)
                .then(|| values.description.clone()),
        }
    }
}

#[async_trait]
impl FormMode for EditProject {
    fn title(&self) -> &'static str {
        "Edit Project"
    }

    fn defaults(&self) -> ProjectFields {
        ProjectFields::from_project(&self.project)
    }

    fn success_message(&self) -> &'static str {
        "Project updated successfully."
    }

    async fn save(&self, api: &dyn ProjectApi, values: &ProjectFields) -> Result<Project, FormError> {
        let update = self.changes(values);
        if update.is_empty() {
            return Err(FormError::NothingToSave);
        }
        Ok(api.update(self.project.id, update).await?)
    }

    fn requires_changes(&self) -> bool {
        true
    }

    fn on_success(&mut self, saved: &Project) {
        self.project = saved.clone();
    }
}
