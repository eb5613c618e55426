//! Presentational contracts around the controller, plus the plain-text
//! rendering the command-line front end uses.

use std::fmt::Write as _;

use serde_json::Value;
use shared::protocol::{Character, NewCharacter};
use thiserror::Error;

/// Receives the current list. Deleting goes back through the controller by
/// position.
pub trait ListView {
    fn render(&self, characters: &[Character]);
}

/// Source of submitted creation records. The form owns its input state.
pub trait FormView {
    fn take_submission(&mut self) -> Option<NewCharacter>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextListView;

impl TextListView {
    pub fn render_to_string(&self, characters: &[Character]) -> String {
        if characters.is_empty() {
            return "(no characters)\n".to_string();
        }

        let mut out = String::new();
        for (index, character) in characters.iter().enumerate() {
            let _ = write!(out, "{index}. [{}]", character.id);
            if let Some(name) = character.name() {
                let _ = write!(out, " {name}");
            }
            for (key, value) in character.fields.iter().filter(|(key, _)| *key != "name") {
                let _ = write!(out, "  {key}={}", display_value(value));
            }
            out.push('\n');
        }
        out
    }
}

impl ListView for TextListView {
    fn render(&self, characters: &[Character]) {
        print!("{}", self.render_to_string(characters));
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldParseError {
    #[error("expected key=value, got '{0}'")]
    MissingSeparator(String),
    #[error("empty field name in '{0}'")]
    EmptyKey(String),
}

/// Builds a creation record from `key=value` pairs. Values that are valid JSON
/// keep their JSON type; anything else is taken as a string.
pub fn parse_field_assignments<S: AsRef<str>>(
    pairs: &[S],
) -> Result<NewCharacter, FieldParseError> {
    let mut record = NewCharacter::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| FieldParseError::MissingSeparator(pair.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(FieldParseError::EmptyKey(pair.to_string()));
        }
        let value = serde_json::from_str::<Value>(raw)
            .unwrap_or_else(|_| Value::String(raw.to_string()));
        record.insert(key, value);
    }
    Ok(record)
}

/// Form backed by command-line assignments; yields its record once.
#[derive(Debug, Clone)]
pub struct FieldAssignmentsForm {
    pending: Option<NewCharacter>,
}

impl FieldAssignmentsForm {
    pub fn parse<S: AsRef<str>>(pairs: &[S]) -> Result<Self, FieldParseError> {
        let record = parse_field_assignments(pairs)?;
        Ok(Self {
            pending: (!record.is_empty()).then_some(record),
        })
    }
}

impl FormView for FieldAssignmentsForm {
    fn take_submission(&mut self) -> Option<NewCharacter> {
        self.pending.take()
    }
}
