use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Project metadata stored alongside parameters and models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Solver project name.
    pub name: String,
    /// Design name inside the project.
    pub design: String,
    pub id: Uuid,
    /// When the project was first created.
    pub created: DateTime<Utc>,
    /// When the project was last modified.
    pub modified: DateTime<Utc>,
}

impl ProjectMetadata {
    /// Create metadata with a fresh id and the current timestamp.
    pub fn new(name: impl Into<String>, design: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            design: design.into(),
            id: Uuid::new_v4(),
            created: now,
            modified: now,
        }
    }

    /// Stamp the modification time.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}
