//! Editable project fields as the dialog holds them.

use crate::model::Project;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Description,
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Name => f.write_str("Name"),
            Field::Description => f.write_str("Description"),
        }
    }
}

/// Raw text of every input. A missing description is an empty string here;
/// the mode decides how that maps onto the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFields {
    pub name: String,
    pub description: String,
}

impl ProjectFields {
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone().unwrap_or_default(),
        }
    }

    /// The values as they would be saved: the name without surrounding
    /// whitespace.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Description => &self.description,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Description => self.description = value,
        }
    }
}
