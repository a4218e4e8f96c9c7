//! JSON edit scripts replayed against a [`Session`].
//!
//! ```json
//! [
//!   { "op": "set", "field": "email.wants newsletter", "value": false },
//!   { "op": "push", "list": "texts" },
//!   { "op": "remove", "list": "texts", "index": 0 }
//! ]
//! ```
use std::path::Path;

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::form::EditError;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase", deny_unknown_fields)]
pub enum Step {
    Set { field: String, value: Value },
    Push { list: String },
    Remove { list: String, index: usize },
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("at JSON path {path} → {message}")]
    Decode { path: String, message: String },
    #[error("step {index} ({step}) failed: {source}")]
    Step {
        index: usize,
        step: String,
        #[source]
        source: EditError,
    },
}

/// Outcome of replaying a script leniently.
#[derive(Debug, Default)]
pub struct Replay {
    pub applied: usize,
    pub rejected: Vec<(usize, EditError)>,
}

// ————————————————————————————————————————————————————————————————————————————
// DECODING
// ————————————————————————————————————————————————————————————————————————————

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, ScriptError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| ScriptError::Decode {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

pub fn from_file_with_path<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ScriptError> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.display().to_string(),
        source,
    })?;
    from_str_with_path(&src)
}

pub fn parse(src: &str) -> Result<Vec<Step>, ScriptError> {
    from_str_with_path(src)
}

pub fn load(path: impl AsRef<Path>) -> Result<Vec<Step>, ScriptError> {
    from_file_with_path(path)
}

// ————————————————————————————————————————————————————————————————————————————
// REPLAY
// ————————————————————————————————————————————————————————————————————————————

impl Step {
    pub fn apply<A: Clone + 'static>(&self, session: &mut Session<A>) -> Result<(), EditError> {
        match self {
            Step::Set { field, value } => session.set_json(field, value),
            Step::Push { list } => session.push(list),
            Step::Remove { list, index } => session.remove(list, *index),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Step::Set { field, .. } => format!("set {field}"),
            Step::Push { list } => format!("push {list}"),
            Step::Remove { list, index } => format!("remove {list}[{index}]"),
        }
    }
}

/// Apply every step; rejected steps are logged and skipped.
pub fn run<A: Clone + 'static>(session: &mut Session<A>, steps: &[Step]) -> Replay {
    let mut replay = Replay::default();
    for (index, step) in steps.iter().enumerate() {
        match step.apply(session) {
            Ok(()) => replay.applied += 1,
            Err(error) => {
                warn!("skipping step {index} ({}): {error}", step.describe());
                replay.rejected.push((index, error));
            }
        }
    }
    replay
}

/// Apply steps in order, stopping at the first rejected one.
pub fn run_strict<A: Clone + 'static>(session: &mut Session<A>, steps: &[Step]) -> Result<(), ScriptError> {
    for (index, step) in steps.iter().enumerate() {
        step.apply(session).map_err(|source| ScriptError::Step {
            index,
            step: step.describe(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formlet;
    use crate::validation::Validation;
    use serde_json::json;

    fn session() -> Session<Vec<String>> {
        Session::new(formlet::list(formlet::netext().form_default("item"), vec![]).group("texts"))
    }

    #[test]
    fn parses_tagged_steps() {
        let steps = parse(r#"[{"op":"push","list":"texts"},{"op":"set","field":"texts.0.item","value":"a"}]"#).unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Push { list: "texts".into() },
                Step::Set {
                    field: "texts.0.item".into(),
                    value: json!("a")
                },
            ]
        );
    }

    #[test]
    fn decode_errors_name_the_json_path() {
        let err = parse(r#"[{"op":"push","list":"texts"},{"op":"remove","list":"texts","index":"one"}]"#).unwrap_err();
        match err {
            ScriptError::Decode { path, .. } => assert!(path.starts_with("[1]"), "{path}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn lenient_replay_skips_rejected_steps() {
        let steps = vec![
            Step::Push { list: "texts".into() },
            Step::Set {
                field: "texts.3.item".into(),
                value: json!("nope"),
            },
            Step::Set {
                field: "texts.0.item".into(),
                value: json!("a"),
            },
        ];
        let mut session = session();
        let replay = run(&mut session, &steps);
        assert_eq!(replay.applied, 2);
        assert_eq!(replay.rejected.len(), 1);
        assert_eq!(replay.rejected[0].0, 1);
        assert_eq!(session.value(), &Validation::Success(vec!["a".to_string()]));
    }

    #[test]
    fn strict_replay_stops_at_first_rejection() {
        let steps = vec![
            Step::Remove {
                list: "texts".into(),
                index: 0,
            },
            Step::Push { list: "texts".into() },
        ];
        let mut session = session();
        let err = run_strict(&mut session, &steps).unwrap_err();
        assert!(matches!(err, ScriptError::Step { index: 0, .. }));
        assert_eq!(session.value(), &Validation::Success(vec![]));
    }
}
