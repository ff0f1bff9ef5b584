//! Resumable bootstrap for a site assembled from git submodules.
//!
//! The bootstrap prepares a checkout for development or deployment: it
//! initializes submodules, installs their Python requirements, links their
//! apps into one import directory and generates the site's environment
//! script and settings file. Every step records a status file so the whole
//! sequence can be re-run cheaply after a failure.
//!
//! - **[`core`]**: Pure logic (action identities, status labels, the
//!   skip/confirm/execute decision). No I/O.
//! - **[`io`]**: Side effects (status files, subprocesses, git, pip,
//!   templates, symlinks, prompts, config, the final handoff).
//!
//! [`sequencer`] drives the [`actions`] catalog using both.

pub mod actions;
pub mod context;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod sequencer;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
