//! Pure bootstrap logic: action identities, status labels and the per-action
//! decision table. No filesystem or process access lives here.

pub mod action;
pub mod plan;
pub mod status;
