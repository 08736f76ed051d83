//! Repository modules for database operations.

pub mod jobs;

pub use jobs::{JobRepo, RepoError};
