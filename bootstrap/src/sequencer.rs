//! Orchestration for a bootstrap run.
//!
//! Walks the action catalog in declaration order, deciding per action whether
//! to skip, ask, or run it, and persists a status label after each decision so
//! an interrupted or failed run can simply be invoked again.

use std::io;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::actions::Action;
use crate::context::RunContext;
use crate::core::action::ActionId;
use crate::core::plan::{Decision, decide, resolve_requested};
use crate::core::status::{Necessity, Status};
use crate::io::confirm::{Confirmer, announce_auto_yes};
use crate::io::handoff::Handoff;
use crate::io::status_store::{read_status, write_status};

/// What happened to one action during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The routine ran and succeeded.
    Executed,
    /// Already handled; carries the status label.
    Skipped(String),
    /// The operator answered no.
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub id: ActionId,
    pub outcome: ActionOutcome,
}

/// Result of [`run_bootstrap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The completion marker existed and retry was not requested.
    AlreadyBootstrapped,
    /// Every selected action was considered; reports are in execution order.
    Completed(Vec<ActionReport>),
}

/// Run the `requested` actions (all of `catalog` when empty).
///
/// Unknown names fail before anything else happens. A failing action aborts
/// the run with its error; its status and the completion marker stay
/// unwritten.
pub fn run_bootstrap<C: Confirmer, H: Handoff>(
    ctx: &RunContext,
    requested: &[String],
    catalog: &[Action],
    confirmer: &C,
    handoff: &H,
) -> Result<RunOutcome> {
    let available: Vec<ActionId> = catalog.iter().map(|a| a.id).collect();
    let selected = resolve_requested(&available, requested)?;

    if !ctx.options.retry && ctx.paths.overall_status_path.exists() {
        debug!(
            marker = %ctx.paths.overall_status_path.display(),
            "already bootstrapped"
        );
        return Ok(RunOutcome::AlreadyBootstrapped);
    }

    println!("Bootstrapping...");
    info!("Working in {}", ctx.paths.root.display());

    let mut reports = Vec::with_capacity(selected.len());
    for action in catalog.iter().filter(|a| selected.contains(&a.id)) {
        let outcome = run_action(ctx, action, confirmer)?;
        reports.push(ActionReport {
            id: action.id,
            outcome,
        });
    }

    write_status(&ctx.paths.overall_status_path, &Status::Done)?;
    println!("\nFinished bootstrapping\n");

    handoff.handoff(ctx)?;
    Ok(RunOutcome::Completed(reports))
}

fn run_action<C: Confirmer>(
    ctx: &RunContext,
    action: &Action,
    confirmer: &C,
) -> Result<ActionOutcome> {
    let name = action.name();
    let necessity = necessity(ctx, action)?;

    if let Necessity::Satisfied(label) = &necessity {
        if ctx.options.retry {
            info!("Would skip {name}, status is {label}, but running in retry mode");
        } else {
            info!("Skipping step {name}, status is {label}");
        }
    }

    match decide(&necessity, ctx.options.retry, action.requires_confirmation) {
        Decision::Skip(label) => return Ok(ActionOutcome::Skipped(label)),
        Decision::Confirm => {
            if !confirm(ctx, action, confirmer)? {
                if action.needed.is_none() {
                    write_status(&ctx.paths.status_path(action.id), &Status::Unwanted)?;
                }
                debug!(action = name, "declined");
                return Ok(ActionOutcome::Declined);
            }
        }
        Decision::Execute => {}
    }

    debug!(action = name, "executing");
    (action.execute)(ctx).with_context(|| format!("action {name}"))?;

    if action.needed.is_none() {
        write_status(&ctx.paths.status_path(action.id), &Status::Done)?;
    }
    Ok(ActionOutcome::Executed)
}

fn necessity(ctx: &RunContext, action: &Action) -> Result<Necessity> {
    match action.needed {
        Some(check) => {
            check(ctx).with_context(|| format!("check whether {} is needed", action.name()))
        }
        None => {
            let status = read_status(&ctx.paths.status_path(action.id))?;
            Ok(Necessity::from_status(status.as_ref()))
        }
    }
}

fn confirm<C: Confirmer>(ctx: &RunContext, action: &Action, confirmer: &C) -> Result<bool> {
    if ctx.options.yes {
        announce_auto_yes(&mut io::stdout(), action.description)?;
        return Ok(true);
    }
    confirmer.confirm(action.description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        NoopHandoff, ScriptedConfirmer, TestSite, failing_action, recording_action,
    };

    #[test]
    fn fresh_site_runs_every_action_in_order() {
        let site = TestSite::new().expect("site");
        let catalog = vec![
            recording_action(ActionId::GitInitSubmodules),
            recording_action(ActionId::LinkSubmodules),
        ];
        let confirmer = ScriptedConfirmer::new(vec![true]);

        let outcome = run_bootstrap(&site.context(), &[], &catalog, &confirmer, &NoopHandoff)
            .expect("run");

        assert_eq!(
            outcome,
            RunOutcome::Completed(vec![
                ActionReport {
                    id: ActionId::GitInitSubmodules,
                    outcome: ActionOutcome::Executed
                },
                ActionReport {
                    id: ActionId::LinkSubmodules,
                    outcome: ActionOutcome::Executed
                },
            ])
        );
        assert_eq!(site.calls(), vec!["gitInitSubmodules", "linkSubmodules"]);
        assert_eq!(site.status(ActionId::GitInitSubmodules), Some(Status::Done));
        assert!(site.is_bootstrapped());
        confirmer.assert_drained().expect("drained");
        assert_eq!(confirmer.prompts(), vec!["Init and update submodules"]);
    }

    #[test]
    fn failure_stops_run_without_marking() {
        let site = TestSite::new().expect("site");
        let catalog = vec![
            failing_action(ActionId::LinkSubmodules),
            recording_action(ActionId::GenSettings),
        ];
        let confirmer = ScriptedConfirmer::new(Vec::new());

        let err = run_bootstrap(&site.context(), &[], &catalog, &confirmer, &NoopHandoff)
            .unwrap_err();

        assert!(format!("{err:#}").contains("action linkSubmodules"));
        assert!(site.calls().is_empty());
        assert_eq!(site.status(ActionId::LinkSubmodules), None);
        assert!(!site.is_bootstrapped());
    }

    #[test]
    fn declined_custom_check_action_writes_no_status() {
        let site = TestSite::new().expect("site");
        let mut action =
            recording_action(ActionId::GenSettings).with_needed(|_| Ok(Necessity::Needed));
        action.requires_confirmation = true;
        let confirmer = ScriptedConfirmer::new(vec![false]);

        let outcome = run_bootstrap(&site.context(), &[], &[action], &confirmer, &NoopHandoff)
            .expect("run");

        assert_eq!(
            outcome,
            RunOutcome::Completed(vec![ActionReport {
                id: ActionId::GenSettings,
                outcome: ActionOutcome::Declined
            }])
        );
        assert_eq!(site.status(ActionId::GenSettings), None);
    }

    #[test]
    fn custom_check_overrides_status_file() {
        let site = TestSite::new().expect("site");
        site.write_status(ActionId::GenSourceme, &Status::Done);
        let action =
            recording_action(ActionId::GenSourceme).with_needed(|_| Ok(Necessity::Needed));
        let confirmer = ScriptedConfirmer::new(Vec::new());

        run_bootstrap(&site.context(), &[], &[action], &confirmer, &NoopHandoff).expect("run");

        assert_eq!(site.calls(), vec!["genSourceme"]);
    }
}
