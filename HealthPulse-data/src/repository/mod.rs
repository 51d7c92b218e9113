// Repository module structure
pub mod errors;
mod in_memory;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use in_memory::InMemoryStorage;
