mod action;
mod condition;
mod pattern;
mod shared;


pub use action::{description_from_value, Action, ActionUpdate, Callback, Command, Literal};
pub use condition::{Condition, Predicate};
pub use pattern::{is_pattern_key, matches, strip_sides, KeyPattern};
pub use shared::{OwnedResolution, SharedChord};

use log::debug;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Duration;

use crate::config::Settings;
use crate::error::{ChordError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Resolution precedence class of a registered key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Verbatim key bound to a literal or callback.
    Exact,
    /// Verbatim key bound to a nested chord.
    Nested,
    /// Key containing `*`, `?` or `-`.
    Pattern,
}

impl Tier {
    pub fn of(action: &Action) -> Tier {
        if action.pattern().is_pattern() {
            Tier::Pattern
        } else if action.command().is_nested() {
            Tier::Nested
        } else {
            Tier::Exact
        }
    }
}

/// Result of matching one input against a chord.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    Selected(&'a Action),
    NestedInto(&'a Chord, &'a Action),
    NotFound,
}

/// One level of a chord tree: insertion-ordered actions with a key index.
#[derive(Debug, Clone)]
pub struct Chord {
    actions: Vec<Action>,
    index: HashMap<String, usize>,
    timeout: Duration,
    remind_keys: bool,
}

impl Default for Chord {
    fn default() -> Self {
        Self::new()
    }
}

impl Chord {
    pub fn new() -> Self {
        Chord {
            actions: Vec::new(),
            index: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
            remind_keys: true,
        }
    }

    pub fn with_settings(settings: &Settings) -> Result<Self> {
        Ok(Chord {
            timeout: settings.default_timeout()?,
            remind_keys: settings.remind_keys,
            ..Self::new()
        })
    }

    /// Construction-time entry point: fails on the first duplicate key.
    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Result<Self> {
        let mut chord = Self::new();
        chord.add_actions(actions)?;
        Ok(chord)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        if timeout.is_zero() {
            return Err(ChordError::InvalidTimeout(timeout.as_secs_f64()));
        }
        self.timeout = timeout;
        Ok(())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.set_timeout(timeout)?;
        Ok(self)
    }

    pub fn remind_keys(&self) -> bool {
        self.remind_keys
    }

    pub fn set_remind_keys(&mut self, remind_keys: bool) {
        self.remind_keys = remind_keys;
    }

    pub fn with_remind_keys(mut self, remind_keys: bool) -> Self {
        self.remind_keys = remind_keys;
        self
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(Action::key)
    }

    pub fn get(&self, key: &str) -> Option<&Action> {
        self.index.get(key).map(|&i| &self.actions[i])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn tier_of(&self, key: &str) -> Option<Tier> {
        self.get(key).map(Tier::of)
    }

    /// Matches one captured input. Exact keys beat nested-chord keys, which
    /// beat wildcard and range patterns; patterns are tried in insertion order.
    /// Each tier is tried with the raw input first, then with side markers removed.
    /// A key equal to the input verbatim always beats pattern matching, even
    /// when the key itself contains `*`, `?` or `-`.
    pub fn resolve(&self, input: &str) -> Resolution<'_> {
        let unsided = strip_sides(input);
        let candidates = [input, unsided.as_str()];

        for tier in [Tier::Exact, Tier::Nested, Tier::Pattern] {
            for candidate in candidates {
                if let Some(action) = self.get(candidate).filter(|action| Tier::of(action) == tier) {
                    debug!("'{input}' resolved to '{}' ({tier:?})", action.key());
                    return self.select(action);
                }
            }
        }

        let found = self
            .actions
            .iter()
            .filter(|action| Tier::of(action) == Tier::Pattern)
            .find(|action| candidates.iter().any(|candidate| action.matches(candidate)));
        match found {
            Some(action) => {
                debug!("'{input}' resolved to pattern '{}'", action.key());
                self.select(action)
            }
            None => {
                debug!("'{input}' matched nothing");
                Resolution::NotFound
            }
        }
    }

    fn select<'a>(&'a self, action: &'a Action) -> Resolution<'a> {
        match action.nested_chord() {
            Some(chord) => Resolution::NestedInto(chord, action),
            None => Resolution::Selected(action),
        }
    }

    /// Strict insert. A key that is already registered is a `DuplicateKey`.
    pub fn add_action(&mut self, action: Action) -> Result<()> {
        if self.contains_key(action.key()) {
            return Err(ChordError::DuplicateKey(action.key().to_string()));
        }
        self.push(action);
        Ok(())
    }

    /// Strict batch insert. Nothing is inserted unless every key is new.
    pub fn add_actions(&mut self, actions: impl IntoIterator<Item = Action>) -> Result<()> {
        let actions: Vec<Action> = actions.into_iter().collect();
        let mut seen = HashSet::new();
        for action in &actions {
            if self.contains_key(action.key()) || !seen.insert(action.key()) {
                return Err(ChordError::DuplicateKey(action.key().to_string()));
            }
        }
        for action in actions {
            self.push(action);
        }
        Ok(())
    }

    /// Upsert. An existing key keeps its position; the old action is returned.
    pub fn set_action(&mut self, action: Action) -> Option<Action> {
        match self.index.get(action.key()) {
            Some(&i) => Some(std::mem::replace(&mut self.actions[i], action)),
            None => {
                self.push(action);
                None
            }
        }
    }

    pub fn set(&mut self, key: impl Into<String>, command: impl Into<Command>) -> Option<Action> {
        self.set_action(Action::new(key, command))
    }

    pub fn update(&mut self, key: &str, update: ActionUpdate) -> Result<()> {
        let &i = self
            .index
            .get(key)
            .ok_or_else(|| ChordError::KeyNotFound(key.to_string()))?;
        self.actions[i].update(update);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Result<Action> {
        let i = self
            .index
            .remove(key)
            .ok_or_else(|| ChordError::KeyNotFound(key.to_string()))?;
        let removed = self.actions.remove(i);
        for (offset, action) in self.actions[i..].iter().enumerate() {
            self.index.insert(action.key().to_string(), i + offset);
        }
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.index.clear();
    }

    /// Unions the actions of `others` into this chord with strict add
    /// semantics. On a duplicate nothing is merged.
    pub fn merge<'a>(&mut self, others: impl IntoIterator<Item = &'a Chord>) -> Result<()> {
        let incoming: Vec<Action> = others.into_iter().flat_map(|chord| chord.actions.iter().cloned()).collect();
        self.add_actions(incoming)
    }

    pub fn sorted_by_key(&self) -> Chord {
        let mut actions = self.actions.clone();
        actions.sort_by(|a, b| a.key().cmp(b.key()));
        self.rebuilt(actions)
    }

    /// Mapping transform. Two produced actions sharing a key break the
    /// mapping contract.
    pub fn map_actions<F>(&self, mut f: F) -> Result<Chord>
    where
        F: FnMut(&Action) -> Action,
    {
        let mut mapped = self.rebuilt(Vec::new());
        for action in &self.actions {
            let produced = f(action);
            if mapped.contains_key(produced.key()) {
                return Err(ChordError::TransformContractViolation(format!(
                    "'{}' was mapped to '{}', which is already taken",
                    action.key(),
                    produced.key()
                )));
            }
            mapped.push(produced);
        }
        Ok(mapped)
    }

    /// Filtering transform. Keeps the actions for which `f` returns true.
    pub fn filter_actions<F>(&self, mut f: F) -> Chord
    where
        F: FnMut(&Action) -> bool,
    {
        let kept = self.actions.iter().filter(|&action| f(action)).cloned().collect();
        self.rebuilt(kept)
    }

    /// Actions matching `key` whose condition currently holds, in insertion order.
    pub fn find_true(&self, key: &str) -> Vec<&Action> {
        let unsided = strip_sides(key);
        self.actions
            .iter()
            .filter(|action| action.matches(key) || action.matches(&unsided))
            .filter(|action| action.condition().is_true())
            .collect()
    }

    pub fn first_true(&self, key: &str) -> Option<&Action> {
        self.find_true(key).into_iter().next()
    }

    pub fn last_true(&self, key: &str) -> Option<&Action> {
        self.find_true(key).into_iter().last()
    }

    /// One `key  description` line per action, for help popups.
    pub fn help_lines(&self) -> Vec<String> {
        self.actions
            .iter()
            .map(|action| {
                let label = if action.description().is_empty() {
                    match action.command() {
                        Command::Literal(literal) => literal.to_string(),
                        command => command.kind().to_string(),
                    }
                } else {
                    action.description().to_string()
                };
                format!("{}\t{}", action.key(), label)
            })
            .collect()
    }

    pub fn render(&self, indent: usize) -> String {
        self.actions.iter().map(|action| action.render(indent)).collect()
    }

    fn push(&mut self, action: Action) {
        self.index.insert(action.key().to_string(), self.actions.len());
        self.actions.push(action);
    }

    /// Same settings, new action list.
    fn rebuilt(&self, actions: Vec<Action>) -> Chord {
        let mut chord = Chord {
            actions: Vec::with_capacity(actions.len()),
            index: HashMap::with_capacity(actions.len()),
            timeout: self.timeout,
            remind_keys: self.remind_keys,
        };
        for action in actions {
            chord.push(action);
        }
        chord
    }
}

impl PartialEq for Chord {
    fn eq(&self, other: &Self) -> bool {
        self.actions == other.actions && self.timeout == other.timeout && self.remind_keys == other.remind_keys
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(0))
    }
}

impl<'a> IntoIterator for &'a Chord {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
