//! Request resolution and the per-action decision table.

use crate::core::action::ActionId;
use crate::core::status::Necessity;
use crate::error::BootstrapError;

/// What the sequencer does with one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Already handled; carry the label for logging.
    Skip(String),
    /// Ask the operator first.
    Confirm,
    /// Run without asking.
    Execute,
}

/// Select the actions to run from `available` (in its order).
///
/// No names selects everything. Otherwise exactly the named actions are
/// selected, still in `available` order; repeated names collapse.
pub fn resolve_requested(
    available: &[ActionId],
    names: &[String],
) -> Result<Vec<ActionId>, BootstrapError> {
    if names.is_empty() {
        return Ok(available.to_vec());
    }
    let mut requested = Vec::with_capacity(names.len());
    for name in names {
        match ActionId::from_name(name).filter(|id| available.contains(id)) {
            Some(id) => requested.push(id),
            None => {
                return Err(BootstrapError::UnknownAction {
                    name: name.clone(),
                    available: available.iter().map(|id| id.name()).collect(),
                });
            }
        }
    }
    Ok(available
        .iter()
        .copied()
        .filter(|id| requested.contains(id))
        .collect())
}

/// Decide how to treat an action given its necessity and the run mode.
///
/// Retry never skips and always asks, so a finished action is re-offered
/// rather than silently re-run.
pub fn decide(necessity: &Necessity, retry: bool, requires_confirmation: bool) -> Decision {
    if let Necessity::Satisfied(label) = necessity
        && !retry
    {
        return Decision::Skip(label.clone());
    }
    if retry || requires_confirmation {
        Decision::Confirm
    } else {
        Decision::Execute
    }
}
