pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use models::project::{NewProject, Project, ProjectDto};
pub use repository::ProjectRepository;
