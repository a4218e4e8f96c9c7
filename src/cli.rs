//! Minimal CLI: registration form → (read | outline)
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use formlet::outline::{render, TextRenderer};
use formlet::registration::{init_user, user_form, User};
use formlet::script;
use formlet::Session;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// evaluate the demo registration form, optionally after replaying an edit script
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the evaluated validation as JSON
    Read(ReadOut),
    /// print the form outline
    Outline(OutlineOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON file with the user to prefill the form with (demo user if omitted)
    #[arg(long)]
    init: Option<PathBuf>,

    /// JSON edit script replayed before reading
    #[arg(long)]
    script: Option<PathBuf>,

    /// stop at the first rejected script step instead of skipping it
    #[arg(long, default_value_t = false)]
    halt_on_error: bool,
}

#[derive(clap::Parser, Debug)]
struct ReadOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// exit with an error unless the form reads as a success
    #[arg(long)]
    strict: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct OutlineOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// print the outline tree as JSON instead of text
    #[arg(long)]
    json: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// exit with an error unless the form reads as a success
    #[arg(long)]
    strict: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_session(&self) -> Result<Session<User>> {
        let user = match self.init.as_ref() {
            Some(path) => script::from_file_with_path::<User>(path)
                .with_context(|| format!("failed to load initial user ({})", path.display()))?,
            None => init_user(),
        };
        let mut session = Session::new(user_form(&user));
        let Some(path) = self.script.as_ref() else {
            return Ok(session);
        };
        let steps = script::load(path).with_context(|| format!("failed to load script ({})", path.display()))?;
        if self.halt_on_error {
            script::run_strict(&mut session, &steps)?;
        } else {
            let replay = script::run(&mut session, &steps);
            for (index, error) in &replay.rejected {
                eprintln!("{} step {index}: {error}", "skipped".yellow().bold());
            }
        }
        Ok(session)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Read(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let session = target.input_settings.load_session()?;
                let src = serde_json::to_string_pretty(session.value())?;
                write_output(target.out.as_deref(), &src)?;
                check_strict(target.strict, &session)
            }
            Command::Outline(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let session = target.input_settings.load_session()?;
                let outline = session.outline();
                let src = if target.json {
                    serde_json::to_string_pretty(&outline)?
                } else {
                    let renderer = TextRenderer::new(target.out.is_none());
                    render(&outline, &renderer).join("\n")
                };
                write_output(target.out.as_deref(), &src)?;
                check_strict(target.strict, &session)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&Path>, src: &str) -> Result<()> {
    let Some(out) = out else {
        println!("{src}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, src).with_context(|| format!("failed to write {}", out.display()))
}

fn check_strict(strict: bool, session: &Session<User>) -> Result<()> {
    if strict && !session.value().is_success() {
        bail!(
            "form is not valid ({:?}): {}",
            session.value().status(),
            session.value().errors().join(", ")
        );
    }
    Ok(())
}
