//! Represents a project managed by the admin view.
//!
//! The backend assigns the [`ProjectId`]; the client only ever sends it back
//! to address an update, never as a field to change.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub u32);

impl From<u32> for ProjectId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "project_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
}

impl Project {
    /// Creates a new Project instance.
    ///
    /// # Arguments
    /// * `id` - Identifier assigned by the backend
    /// * `name` - Display name, required
    /// * `description` - Free text; empty strings are stored as `None`
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>, description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            id: id.into(),
            name: name.into(),
            description: (!description.is_empty()).then_some(description),
        }
    }
}

/// Payload for creating a new project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCreate {
    pub name: String,
    pub description: Option<String>,
}

/// Payload for updating an existing project.
///
/// Unset fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProjectUpdate {
    /// True when the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}
