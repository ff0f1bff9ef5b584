//! `bootstrap`: prepare a site checkout so the web framework's own
//! management commands can run.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};
use tracing::debug;

use site_bootstrap::actions::catalog;
use site_bootstrap::context::{RunContext, RunOptions};
use site_bootstrap::error::BootstrapError;
use site_bootstrap::exit_codes;
use site_bootstrap::io::confirm::TerminalConfirmer;
use site_bootstrap::io::handoff::SourcemeHandoff;
use site_bootstrap::io::paths::default_site_dir;
use site_bootstrap::logging;
use site_bootstrap::sequencer::{RunOutcome, run_bootstrap};

#[derive(Parser, Debug)]
#[command(
    name = "bootstrap",
    version,
    about = "Prepare a site assembled from git submodules",
    override_usage = "bootstrap [OPTIONS] [action1 action2 ...]"
)]
struct Cli {
    /// Automatically answer yes to all confirmation questions.
    #[arg(short, long)]
    yes: bool,

    /// Site directory to work in [default: site containing this executable, else cwd].
    #[arg(short = 's', long = "siteDir", visible_alias = "site-dir", value_name = "PATH")]
    site_dir: Option<PathBuf>,

    /// Increase verbosity, can specify multiple times.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity, can specify multiple times.
    #[arg(short, long, action = ArgAction::Count)]
    quiet: u8,

    /// Ask whether to re-run steps already marked as done or declined.
    #[arg(short, long)]
    retry: bool,

    /// Specific actions to run (default: all).
    actions: Vec<String>,
}

impl Cli {
    fn verbosity(&self) -> i32 {
        1 + i32::from(self.verbose) - i32::from(self.quiet)
    }

    fn options(&self) -> RunOptions {
        RunOptions {
            yes: self.yes,
            site_dir: self.site_dir.clone().unwrap_or_else(default_site_dir),
            verbosity: self.verbosity(),
            retry: self.retry,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbosity());
    let code = match run(&cli) {
        Ok(()) => exit_codes::OK,
        Err(err) => report(&err),
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = RunContext::load(cli.options())?;
    let outcome = run_bootstrap(
        &ctx,
        &cli.actions,
        &catalog(),
        &TerminalConfirmer,
        &SourcemeHandoff,
    )?;
    if outcome == RunOutcome::AlreadyBootstrapped {
        debug!("nothing to do");
    }
    Ok(())
}

/// Print `err` for the operator and pick the exit code.
fn report(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<BootstrapError>() {
        Some(BootstrapError::UnknownAction { name, available }) => {
            eprintln!("ERROR: there is no action {name}");
            eprintln!("Available actions are: {}", available.join(" "));
            exit_codes::FAILURE
        }
        Some(domain) => {
            eprintln!("{err:#}");
            domain.exit_code()
        }
        None => {
            eprintln!("{err:#}");
            exit_codes::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let cli = Cli::parse_from(["bootstrap"]);
        assert!(!cli.yes);
        assert!(!cli.retry);
        assert!(cli.actions.is_empty());
        assert_eq!(cli.verbosity(), 1);
    }

    #[test]
    fn parse_flags_and_actions() {
        let cli = Cli::parse_from([
            "bootstrap",
            "-y",
            "-r",
            "-vv",
            "-q",
            "--siteDir",
            "/srv/site",
            "genSettings",
            "gitInitSubmodules",
        ]);
        let options = cli.options();
        assert!(options.yes);
        assert!(options.retry);
        assert_eq!(options.verbosity, 2);
        assert_eq!(options.site_dir, PathBuf::from("/srv/site"));
        assert_eq!(cli.actions, vec!["genSettings", "gitInitSubmodules"]);
    }

    #[test]
    fn parse_short_site_dir_and_alias() {
        let short = Cli::parse_from(["bootstrap", "-s", "site"]);
        assert_eq!(short.site_dir, Some(PathBuf::from("site")));
        let alias = Cli::parse_from(["bootstrap", "--site-dir", "site"]);
        assert_eq!(alias.site_dir, Some(PathBuf::from("site")));
    }

    #[test]
    fn quiet_flags_lower_verbosity() {
        let cli = Cli::parse_from(["bootstrap", "-qqq"]);
        assert_eq!(cli.verbosity(), -2);
    }

    #[test]
    fn unknown_action_exits_with_usage_code() {
        let err = anyhow::Error::from(BootstrapError::UnknownAction {
            name: "bogus".to_string(),
            available: vec!["gitInitSubmodules"],
        });
        assert_eq!(report(&err), exit_codes::FAILURE);
    }

    #[test]
    fn subprocess_failure_exits_with_child_code() {
        let err = anyhow::Error::from(BootstrapError::SubprocessFailure {
            command: "pip install -r requirements.txt".to_string(),
            code: 9,
        })
        .context("action installSiteRequirements");
        assert_eq!(report(&err), 9);
    }
}
