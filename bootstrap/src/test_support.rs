//! Test-only helpers: scratch sites, scripted confirmations and action
//! routines that record their invocation instead of provisioning anything.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Result, anyhow};
use tempfile::TempDir;

use crate::actions::{Action, ExecuteFn};
use crate::context::{RunContext, RunOptions};
use crate::core::action::ActionId;
use crate::core::status::Status;
use crate::error::BootstrapError;
use crate::io::confirm::Confirmer;
use crate::io::handoff::Handoff;
use crate::io::status_store::{read_status, write_status};

/// File in the site root that recording actions append their names to.
pub const CALLS_LOG: &str = "calls.log";

/// A throwaway site directory.
pub struct TestSite {
    temp: TempDir,
}

impl TestSite {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir()?;
        fs::create_dir_all(temp.path().join("management"))?;
        Ok(Self { temp })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn options(&self) -> RunOptions {
        RunOptions::new(self.path())
    }

    /// Context with default options (no `--yes`, no `--retry`).
    pub fn context(&self) -> RunContext {
        self.context_with(self.options())
    }

    pub fn context_with(&self, options: RunOptions) -> RunContext {
        RunContext::load(options).expect("load run context")
    }

    /// Names of recording actions that ran, in order, across all runs.
    pub fn calls(&self) -> Vec<String> {
        match fs::read_to_string(self.path().join(CALLS_LOG)) {
            Ok(text) => text.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn status(&self, id: ActionId) -> Option<Status> {
        read_status(&self.context().paths.status_path(id)).expect("read status")
    }

    pub fn write_status(&self, id: ActionId, status: &Status) {
        write_status(&self.context().paths.status_path(id), status).expect("write status");
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.context().paths.overall_status_path.exists()
    }
}

fn record_call(ctx: &RunContext, id: ActionId) -> Result<()> {
    let mut log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(ctx.paths.root.join(CALLS_LOG))?;
    writeln!(log, "{}", id.name())?;
    Ok(())
}

macro_rules! recorders {
    ($($fn_name:ident => $id:ident),* $(,)?) => {
        $(
            fn $fn_name(ctx: &RunContext) -> Result<()> {
                record_call(ctx, ActionId::$id)
            }
        )*

        fn recorder_for(id: ActionId) -> ExecuteFn {
            match id {
                $(ActionId::$id => $fn_name,)*
            }
        }
    };
}

recorders! {
    record_git_init_submodules => GitInitSubmodules,
    record_git_submodules_master_branch => GitSubmodulesMasterBranch,
    record_link_submodules => LinkSubmodules,
    record_install_submodule_requirements => InstallSubModuleRequirements,
    record_install_site_requirements => InstallSiteRequirements,
    record_gen_sourceme => GenSourceme,
    record_gen_settings => GenSettings,
}

/// Action `id` whose routine only appends its name to [`CALLS_LOG`].
pub fn recording_action(id: ActionId) -> Action {
    Action::new(id, recorder_for(id))
}

/// [`recording_action`] for every id, in declaration order.
pub fn recording_catalog() -> Vec<Action> {
    ActionId::ALL.into_iter().map(recording_action).collect()
}

fn fail_like_subprocess(_ctx: &RunContext) -> Result<()> {
    Err(BootstrapError::SubprocessFailure {
        command: "false".to_string(),
        code: 2,
    }
    .into())
}

/// Action `id` whose routine fails like a command exiting with status 2.
pub fn failing_action(id: ActionId) -> Action {
    Action::new(id, fail_like_subprocess)
}

/// Confirmer that replays queued answers and records every question.
pub struct ScriptedConfirmer {
    answers: RefCell<VecDeque<bool>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn new(answers: Vec<bool>) -> Self {
        Self {
            answers: RefCell::new(answers.into()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    pub fn assert_drained(&self) -> Result<()> {
        let left = self.answers.borrow().len();
        if left > 0 {
            return Err(anyhow!("{left} scripted answers were never used"));
        }
        Ok(())
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&self, question: &str) -> Result<bool> {
        self.prompts.borrow_mut().push(question.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("unexpected confirmation: {question}"))
    }
}

/// Handoff that does nothing.
pub struct NoopHandoff;

impl Handoff for NoopHandoff {
    fn handoff(&self, _ctx: &RunContext) -> Result<()> {
        Ok(())
    }
}

/// Handoff that counts invocations.
#[derive(Default)]
pub struct RecordingHandoff {
    calls: Cell<usize>,
}

impl RecordingHandoff {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Handoff for RecordingHandoff {
    fn handoff(&self, _ctx: &RunContext) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }
}
