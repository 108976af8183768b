//! Live sessions and their idle expiry.

pub mod store;
pub mod sweeper;

pub use store::{SessionHandle, SessionStore, SessionView};
pub use sweeper::{spawn_idle_sweeper, stop_idle_sweeper};
