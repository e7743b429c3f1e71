//! Catalog of the answer engines a report can be run against.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PlanError;

/// Identifier of an engine in the registry (e.g. `chatgpt`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineId(String);

impl EngineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EngineId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A simulated external AI search/answer provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engine {
    pub id: &'static str,
    pub name: &'static str,
}

impl Engine {
    pub fn engine_id(&self) -> EngineId {
        EngineId::new(self.id)
    }
}

const ENGINES: &[Engine] = &[
    Engine {
        id: "chatgpt",
        name: "ChatGPT",
    },
    Engine {
        id: "gemini",
        name: "Google Gemini",
    },
    Engine {
        id: "perplexity",
        name: "Perplexity",
    },
    Engine {
        id: "claude",
        name: "Claude",
    },
    Engine {
        id: "copilot",
        name: "Microsoft Copilot",
    },
];

/// Static engine catalog
pub struct EngineRegistry;

impl EngineRegistry {
    pub fn all() -> &'static [Engine] {
        ENGINES
    }

    /// Case-insensitive lookup by id
    pub fn get(id: &str) -> Option<&'static Engine> {
        let id = id.trim();
        ENGINES.iter().find(|e| e.id.eq_ignore_ascii_case(id))
    }

    /// Display name for an engine id, falling back to the raw id
    pub fn display_name(id: &EngineId) -> &str {
        match Self::get(id.as_str()) {
            Some(engine) => engine.name,
            None => id.as_str(),
        }
    }
}

/// Ordered, de-duplicated set of engines chosen for a run.
///
/// May be empty; the planner rejects empty selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineSelection {
    engines: Vec<&'static Engine>,
}

impl EngineSelection {
    /// Resolve engine ids against the registry, keeping first-seen order
    pub fn from_ids<I, S>(ids: I) -> Result<Self, PlanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut engines: Vec<&'static Engine> = Vec::new();
        for id in ids {
            let id = id.as_ref();
            if id.trim().is_empty() {
                continue;
            }
            let engine = EngineRegistry::get(id)
                .ok_or_else(|| PlanError::InvalidBrief(format!("unknown engine '{}'", id)))?;
            if !engines.iter().any(|e| e.id == engine.id) {
                engines.push(engine);
            }
        }
        Ok(Self { engines })
    }

    /// Parse a comma-separated engine list such as `chatgpt,gemini`
    pub fn parse(list: &str) -> Result<Self, PlanError> {
        Self::from_ids(list.split(','))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Engine> + '_ {
        self.engines.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
