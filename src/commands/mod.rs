//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI args
//! and drives an [`AttachFiles`](crate::events::AttachFiles) instance.

pub mod config;
pub mod event;
pub mod replay;

// Re-export execute functions for convenience
pub use self::config::execute as config;
pub use event::execute as event;
pub use replay::execute as replay;
