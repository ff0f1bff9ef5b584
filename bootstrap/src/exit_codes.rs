//! Stable exit codes for the bootstrap CLI.
//!
//! A failing provisioning command exits with that command's own status
//! instead of one of these.

/// Every requested action completed, or the site was already bootstrapped.
pub const OK: i32 = 0;
/// Unknown action name, invalid config, or any other failure without a child status.
pub const FAILURE: i32 = 1;
