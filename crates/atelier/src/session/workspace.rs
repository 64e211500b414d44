//! Post-authentication project landing.
//!
//! When a user authenticates, the session must land somewhere: a project
//! seeded from their anonymous work, their most recent persisted project,
//! or a newly created empty one. [`resolve_landing`] encodes that decision
//! against a [`ProjectStore`] — the persistence collaborator, which this
//! crate only ever talks to through the trait.
//!
//! Store failures propagate to the caller unresolved; the engine does not
//! retry or swallow them.

use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::anon::{AnonWorkTracker, TranscriptEntry};
use crate::vfs::FileMap;

/// Errors surfaced by the persistence collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store failed.
    #[error("store error: {0}")]
    Backend(String),
}

/// A persisted project as known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Store-assigned identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Request to create a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    /// Display name.
    pub name: String,
    /// Transcript to seed the project with.
    pub messages: Vec<TranscriptEntry>,
    /// File tree to seed the project with.
    pub files: FileMap,
}

/// The persistence collaborator.
///
/// Implementations must be thread-safe for use across async tasks.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Persist a new project and return its record.
    async fn create_project(&self, request: NewProject) -> Result<ProjectRecord, StoreError>;

    /// List existing projects, most recently created first.
    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, StoreError>;
}

/// Decide where a freshly authenticated user lands.
///
/// Consumes the tracker's snapshot at most once. A snapshot with any
/// messages seeds a new project named after the wall-clock time of day;
/// otherwise the most recent persisted project wins; with neither, an empty
/// sequentially-numbered project is created.
pub async fn resolve_landing(
    store: &dyn ProjectStore,
    tracker: &AnonWorkTracker,
) -> Result<ProjectRecord, StoreError> {
    if let Some(snapshot) = tracker.consume().filter(|s| !s.messages.is_empty()) {
        let name = format!("Design from {}", time_of_day_label());
        info!(%name, files = snapshot.files.len(), "seeding project from anonymous work");
        return store
            .create_project(NewProject {
                name,
                messages: snapshot.messages,
                files: snapshot.files,
            })
            .await;
    }

    let projects = store.list_projects().await?;
    let number = projects.len() + 1;
    if let Some(most_recent) = projects.into_iter().next() {
        return Ok(most_recent);
    }

    store
        .create_project(NewProject {
            name: format!("New Design #{number}"),
            messages: Vec::new(),
            files: FileMap::new(),
        })
        .await
}

/// Wall-clock time of day as `H:MM:SS` (UTC), for anonymous-work project
/// names.
fn time_of_day_label() -> String {
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let time_of_day = secs % 86400;
    let hours = time_of_day / 3600;
    let minutes = (time_of_day % 3600) / 60;
    let seconds = time_of_day % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

/// In-memory [`ProjectStore`] for tests and demos.
#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    projects: Mutex<Vec<(ProjectRecord, NewProject)>>,
}

impl InMemoryProjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The creation request recorded for a project id, if any.
    pub fn request_for(&self, id: &str) -> Option<NewProject> {
        self.lock()
            .iter()
            .find(|(record, _)| record.id == id)
            .map(|(_, request)| request.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(ProjectRecord, NewProject)>> {
        self.projects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn create_project(&self, request: NewProject) -> Result<ProjectRecord, StoreError> {
        let mut projects = self.lock();
        let record = ProjectRecord {
            id: format!("project-{:03}", projects.len() + 1),
            name: request.name.clone(),
        };
        projects.insert(0, (record.clone(), request));
        Ok(record)
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        Ok(self.lock().iter().map(|(record, _)| record.clone()).collect())
    }
}
