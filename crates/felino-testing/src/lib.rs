//! Test utilities for Mercado Felino services.
//!
//! Import from test code only, never from production code.

pub mod auth;
