//! Terminal output and prompts.
//!
//! Output helpers style their prefix through `console`, which honors
//! `NO_COLOR` and non-tty streams on its own. The confirmation prompt uses
//! `dialoguer` on a tty and falls back to a plain stdin line read otherwise,
//! accepting `y`/`yes` case-insensitively.

use std::io::{BufRead, Write};

use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::error::Result;

pub fn info(message: &str) {
    println!("{} {message}", style(">>").cyan().bold());
}

pub fn success(message: &str) {
    println!("{} {message}", style("[OK]").green().bold());
}

pub fn warn(message: &str) {
    eprintln!("{} {message}", style("[WARN]").yellow().bold());
}

pub fn error(message: &str) {
    eprintln!("{} {message}", style("[ERROR]").red().bold());
}

/// Ask a yes/no question, defaulting to "no".
pub fn confirm(question: &str) -> Result<bool> {
    if console::user_attended() {
        let answer = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(anyhow::Error::from)?;
        return Ok(answer);
    }

    // Non-interactive stream (tests, pipes): read one line from stdin.
    print!("{question} (y/N): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(parse_affirmative(&line))
}

/// Closed set of accepted affirmative answers.
pub fn parse_affirmative(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
