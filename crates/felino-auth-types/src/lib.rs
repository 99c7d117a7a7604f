//! Auth primitives shared by the store service and its tests.
//!
//! Provides bearer-header parsing plus JWT issuance and validation.

pub mod bearer;
pub mod token;
