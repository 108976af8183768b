//! Backend test support utilities
//!
//! Shared by the backend integration test binaries: logging initialisation
//! and assertions on the Problem Details error contract.

pub mod logging;
pub mod problem_details;
