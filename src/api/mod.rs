/// HTTP API Layer
///
/// REST endpoints for the portfolio projects:
/// - Public project listing
/// - Admin create/update/delete with multipart image uploads

// Multipart decoding into validated service inputs
pub mod form;

// Project listing and admin CRUD endpoints
pub mod projects;

// Re-export router builder and shared state
pub use projects::{create_project_routes, AppState};
