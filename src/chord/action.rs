use log::{debug, warn};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::condition::Condition;
use super::pattern::KeyPattern;
use super::Chord;
use crate::error::{ChordError, Result};
use crate::manager::{ExecutionContext, Outcome};

pub type Callback = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// Text sent through the injector when a literal command fires.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Text(text) => f.write_str(text),
            Literal::Integer(n) => write!(f, "{n}"),
            // shortest representation that round-trips, never an exponent
            Literal::Float(n) => write!(f, "{n}"),
            Literal::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
        }
    }
}

#[derive(Clone)]
pub enum Command {
    Literal(Literal),
    Callback(Callback),
    Nested(Chord),
}

impl Command {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Command::Callback(Arc::new(f))
    }

    /// Builds a literal command from an untyped value.
    pub fn from_value(key: &str, value: &Value) -> Result<Self> {
        let literal = match value {
            Value::String(s) => Literal::Text(s.clone()),
            Value::Bool(b) => Literal::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Literal::Integer(i),
                None => n
                    .as_f64()
                    .map(Literal::Float)
                    .ok_or_else(|| ChordError::invalid_command(key, format!("unrepresentable number {n}")))?,
            },
            Value::Null => return Err(ChordError::invalid_command(key, "null is not a command")),
            Value::Array(_) => return Err(ChordError::invalid_command(key, "arrays are not commands")),
            Value::Object(_) => return Err(ChordError::invalid_command(key, "objects are not commands")),
        };
        Ok(Command::Literal(literal))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Command::Literal(_) => "send",
            Command::Callback(_) => "callback",
            Command::Nested(_) => "chord",
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Command::Nested(_))
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Command::Literal(a), Command::Literal(b)) => a == b,
            (Command::Callback(a), Command::Callback(b)) => Arc::ptr_eq(a, b),
            (Command::Nested(a), Command::Nested(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Literal(literal) => f.debug_tuple("Literal").field(literal).finish(),
            Command::Callback(_) => f.write_str("Callback(..)"),
            Command::Nested(chord) => f.debug_tuple("Nested").field(chord).finish(),
        }
    }
}

impl From<&str> for Command {
    fn from(value: &str) -> Self {
        Command::Literal(Literal::Text(value.to_string()))
    }
}

impl From<String> for Command {
    fn from(value: String) -> Self {
        Command::Literal(Literal::Text(value))
    }
}

impl From<i64> for Command {
    fn from(value: i64) -> Self {
        Command::Literal(Literal::Integer(value))
    }
}

impl From<i32> for Command {
    fn from(value: i32) -> Self {
        Command::Literal(Literal::Integer(value.into()))
    }
}

impl From<f64> for Command {
    fn from(value: f64) -> Self {
        Command::Literal(Literal::Float(value))
    }
}

impl From<bool> for Command {
    fn from(value: bool) -> Self {
        Command::Literal(Literal::Bool(value))
    }
}

impl From<Literal> for Command {
    fn from(value: Literal) -> Self {
        Command::Literal(value)
    }
}

impl From<Chord> for Command {
    fn from(value: Chord) -> Self {
        Command::Nested(value)
    }
}

/// A key pattern bound to a command, guarded by a condition.
#[derive(Clone)]
pub struct Action {
    pattern: KeyPattern,
    command: Command,
    condition: Condition,
    description: String,
}

impl Action {
    pub fn new(key: impl Into<String>, command: impl Into<Command>) -> Self {
        Action {
            pattern: KeyPattern::new(key),
            command: command.into(),
            condition: Condition::default(),
            description: String::new(),
        }
    }

    pub fn with_condition(mut self, condition: impl Into<Condition>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builds an action from untyped values, validating every field up front.
    pub fn from_values(key: impl Into<String>, command: &Value, condition: &Value, description: &Value) -> Result<Self> {
        let key = key.into();
        let command = Command::from_value(&key, command)?;
        let condition = Condition::from_value(&key, condition)?;
        let description = description_from_value(&key, description)?;
        Ok(Action::new(key, command)
            .with_condition(condition)
            .with_description(description))
    }

    pub fn key(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn pattern(&self) -> &KeyPattern {
        &self.pattern
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn nested_chord(&self) -> Option<&Chord> {
        match &self.command {
            Command::Nested(chord) => Some(chord),
            _ => None,
        }
    }

    pub fn matches(&self, input: &str) -> bool {
        self.pattern.matches(input)
    }

    pub fn update(&mut self, update: ActionUpdate) {
        if let Some(command) = update.command {
            self.command = command;
        }
        if let Some(condition) = update.condition {
            self.condition = condition;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
    }

    /// Runs the command if the condition holds. `ctx.path()` already ends with
    /// the input that selected this action.
    pub fn execute(&self, ctx: &ExecutionContext<'_>) -> Result<Outcome> {
        let path = ctx.path();
        if !self.condition.is_true() {
            debug!("{path}: condition of '{}' is false", self.key());
            return Ok(Outcome::ConditionFalse {
                key: self.key().to_string(),
                path: path.clone(),
            });
        }

        match &self.command {
            Command::Literal(literal) => {
                let text = literal.to_string();
                debug!("{path}: sending {text:?}");
                ctx.manager().send_text(&text);
            }
            Command::Callback(callback) => {
                debug!("{path}: invoking callback of '{}'", self.key());
                if let Err(source) = callback() {
                    warn!("{path}: callback of '{}' failed: {source:#}", self.key());
                    return Err(ChordError::ActionExecutionFailed {
                        key: self.key().to_string(),
                        source,
                    });
                }
            }
            Command::Nested(chord) => {
                debug!("{path}: entering nested chord ({} keys)", chord.len());
                return ctx.manager().execute(chord, chord.timeout(), path.clone());
            }
        }

        Ok(Outcome::Dispatched {
            key: self.key().to_string(),
            path: path.clone(),
        })
    }

    /// Multi-line listing for diagnostics and help. Not a storage format.
    pub fn render(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let mut out = match &self.command {
            Command::Literal(literal) => format!("{pad}{}: send {:?}\n", self.key(), literal.to_string()),
            Command::Callback(_) => format!("{pad}{}: callback\n", self.key()),
            Command::Nested(chord) => format!("{pad}{}: chord ({} keys)\n", self.key(), chord.len()),
        };
        if !self.description.is_empty() {
            out.push_str(&format!("{pad}  description: {}\n", self.description));
        }
        if !self.condition.is_default() {
            out.push_str(&format!("{pad}  condition: {}\n", self.condition));
        }
        if let Command::Nested(chord) = &self.command {
            out.push_str(&chord.render(indent + 4));
        }
        out
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.command == other.command
            && self.condition == other.condition
            && self.description == other.description
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("key", &self.key())
            .field("command", &self.command)
            .field("condition", &self.condition)
            .field("description", &self.description)
            .finish()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(0))
    }
}

/// Fields to overwrite on an existing action. Unset fields are left alone.
#[derive(Clone, Default)]
pub struct ActionUpdate {
    command: Option<Command>,
    condition: Option<Condition>,
    description: Option<String>,
}

impl ActionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(mut self, command: impl Into<Command>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn condition(mut self, condition: impl Into<Condition>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

pub fn description_from_value(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        other => Err(ChordError::invalid_description(
            key,
            format!("expected a string, got {other}"),
        )),
    }
}
