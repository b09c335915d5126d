use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Observed state of a model, as seen by the last attempt against it.
/// The board is informational only: the fallback loop always walks the
/// full model list regardless of what is recorded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelHealth {
    Checking,
    Online,
    Offline,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub model: String,
    pub health: ModelHealth,
    pub updated_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct HealthBoard {
    states: RwLock<HashMap<String, (ModelHealth, DateTime<Utc>)>>,
}

impl HealthBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self, model: &str, health: ModelHealth) {
        if let Ok(mut states) = self.states.write() {
            states.insert(model.to_string(), (health, Utc::now()));
        }
    }

    pub fn status_of(&self, model: &str) -> Option<ModelHealth> {
        self.states
            .read()
            .ok()
            .and_then(|s| s.get(model).map(|(h, _)| *h))
    }

    pub fn snapshot(&self) -> Vec<HealthSnapshot> {
        let mut entries: Vec<HealthSnapshot> = self
            .states
            .read()
            .map(|s| {
                s.iter()
                    .map(|(model, (health, updated_at))| HealthSnapshot {
                        model: model.clone(),
                        health: *health,
                        updated_at: *updated_at,
                    })
                    .collect()
            })
            .unwrap_or_default();
        entries.sort_by(|a, b| a.model.cmp(&b.model));
        entries
    }
}
