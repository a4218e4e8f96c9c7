//! Replays the scenarios under `scenarios/` against the registration form.
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use formlet::registration::{init_user, user_form, User};
use formlet::script::{self, Step};
use formlet::{Session, Status};

static SCENARIO_FILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w\- ]+\.json$").expect("file pattern compiles"));

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Scenario {
    name: String,
    #[serde(default)]
    init: Option<User>,
    #[serde(default)]
    script: Vec<Step>,
    expect: Expect,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Expect {
    status: Status,
    #[serde(default)]
    errors: Option<Vec<String>>,
    /// Each pattern must match at least one error.
    #[serde(default)]
    errors_match: Vec<String>,
}

fn scenario_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| SCENARIO_FILE.is_match(name));
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Mismatches between what happened and what the scenario expects.
fn check(scenario: &Scenario) -> Result<Vec<String>> {
    let user = scenario.init.clone().unwrap_or_else(init_user);
    let mut session = Session::new(user_form(&user));
    script::run_strict(&mut session, &scenario.script)?;

    let value = session.value();
    let errors = value.errors();
    let mut problems = Vec::new();
    if value.status() != scenario.expect.status {
        problems.push(format!("status: expected {:?}, got {:?}", scenario.expect.status, value.status()));
    }
    if let Some(expected) = &scenario.expect.errors {
        if expected.as_slice() != errors {
            problems.push(format!("errors: expected {expected:?}, got {errors:?}"));
        }
    }
    for pattern in &scenario.expect.errors_match {
        let re = Regex::new(pattern).with_context(|| format!("bad pattern `{pattern}`"))?;
        if !errors.iter().any(|e| re.is_match(e)) {
            problems.push(format!("no error matches `{pattern}` in {errors:?}"));
        }
    }
    Ok(problems)
}

fn main() -> Result<()> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios"));

    let mut failed = 0;
    let files = scenario_files(&dir)?;
    for file in &files {
        let src = std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
        let scenario: Scenario =
            script::from_str_with_path(&src).with_context(|| format!("failed to parse {}", file.display()))?;
        match check(&scenario) {
            Ok(problems) if problems.is_empty() => {
                eprintln!("{} {}", "✅ pass".green(), scenario.name);
            }
            Ok(problems) => {
                failed += 1;
                eprintln!("{} {}", "❌ fail".red(), scenario.name);
                for problem in problems {
                    eprintln!("    {problem}");
                }
            }
            Err(error) => {
                failed += 1;
                eprintln!("{} {}: {error:#}", "❌ error".red(), scenario.name);
            }
        }
    }

    eprintln!("—— {} scenario(s), {failed} failed ——", files.len());
    if failed > 0 {
        bail!("{failed} scenario(s) failed");
    }
    Ok(())
}
