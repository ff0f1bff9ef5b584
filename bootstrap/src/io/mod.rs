//! I/O helpers for bootstrap actions.

pub mod config;
pub mod confirm;
pub mod git;
pub mod handoff;
pub mod link;
pub mod paths;
pub mod process;
pub mod requirements;
pub mod status_store;
pub mod template;
