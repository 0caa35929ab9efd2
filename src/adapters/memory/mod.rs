//! In-memory adapters.

pub mod override_repository;

pub use override_repository::InMemoryOverrideRepository;
