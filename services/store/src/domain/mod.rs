pub mod prompt;
pub mod repository;
pub mod search;
pub mod types;
