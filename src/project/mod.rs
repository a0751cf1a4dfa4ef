/// Project management module
///
/// The `projects` table, its repository, and the service that keeps rows and
/// hosted images in step.

pub mod database;
pub mod service;
pub mod storage;
pub mod types;

pub use service::ProjectService;
pub use storage::{ProjectRepository, ProjectStorage};
pub use types::{ImageUpload, NewProject, Project, ProjectCard, ProjectId, ProjectSummary, ProjectUpdate};
