/// Portfolio backend: public project listing and admin CRUD
///
/// Each project's image lives on an external media host while the row lives
/// in a relational store. The service layer keeps the two in step without a
/// shared transaction.

// Configuration loaded once at startup
pub mod config;

// Error taxonomy and HTTP status mapping
pub mod error;

// Media Store Adapter - external image host behind a trait
pub mod media;

// Project data model, repository, and orchestration service
pub mod project;

// HTTP API layer - routes, multipart decoding, response shapes
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use config::Config;
pub use error::ProjectError;
pub use project::{Project, ProjectService};
pub use server::{build_router, create_app, start_server};
