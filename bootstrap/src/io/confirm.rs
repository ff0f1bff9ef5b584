//! Operator confirmation prompts.
//!
//! The [`Confirmer`] trait lets the sequencer ask yes/no questions without
//! touching the terminal directly; tests substitute scripted answers.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};

const PROMPT_SUFFIX: &str = "? [Y/n] ";

/// Source of yes/no answers.
pub trait Confirmer {
    /// Ask `question` (an action description) and return the answer.
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Asks on stdout and reads answers from stdin.
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, question: &str) -> Result<bool> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        ask(&mut input, &mut output, question)
    }
}

/// Prompt until the answer is empty (yes), `y` or `n`, case-insensitive.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool> {
    loop {
        write!(output, "{question}{PROMPT_SUFFIX}").context("write prompt")?;
        output.flush().context("flush prompt")?;

        let mut line = String::new();
        let n = input.read_line(&mut line).context("read answer")?;
        if n == 0 {
            bail!("no answer to \"{question}\" (input closed)");
        }
        match line.trim().to_lowercase().as_str() {
            "" | "y" => return Ok(true),
            "n" => return Ok(false),
            _ => continue,
        }
    }
}

/// Echo the prompt with an automatic `y`, as `--yes` does.
pub fn announce_auto_yes<W: Write>(output: &mut W, question: &str) -> Result<()> {
    writeln!(output, "{question}{PROMPT_SUFFIX}y").context("write prompt")
}
