//! Domain types shared across the Mercado Felino crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; `infra/` maps them to storage.

pub mod chat;
pub mod user;
