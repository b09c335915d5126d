use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Point-in-time counters for one credential label.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CredentialUsage {
    pub label: String,
    pub requests: u64,
    pub successes: u64,
    pub errors: u64,
    pub last_used: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Counters {
    requests: AtomicU64,
    successes: AtomicU64,
    errors: AtomicU64,
}

/// Lock-free counters per credential label, keyed at registration time
/// so the dashboard shows every configured credential even before its
/// first request. `requests` is bumped once per attempt, then exactly
/// one of `successes` or `errors`, so the sums always reconcile.
pub struct MetricsRegistry {
    counters: HashMap<String, Counters>,
    last_used: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl MetricsRegistry {
    pub fn new(labels: impl IntoIterator<Item = String>) -> Self {
        let counters = labels
            .into_iter()
            .map(|label| (label, Counters::default()))
            .collect();
        Self {
            counters,
            last_used: RwLock::new(HashMap::new()),
        }
    }

    pub fn record_request(&self, label: &str) {
        if let Some(c) = self.counters.get(label) {
            c.requests.fetch_add(1, Ordering::Relaxed);
        }
        if let Ok(mut map) = self.last_used.write() {
            map.insert(label.to_string(), Utc::now());
        }
    }

    pub fn record_success(&self, label: &str) {
        if let Some(c) = self.counters.get(label) {
            c.successes.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_error(&self, label: &str) {
        if let Some(c) = self.counters.get(label) {
            c.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn requests_for(&self, label: &str) -> u64 {
        self.counters
            .get(label)
            .map(|c| c.requests.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Snapshot of every registered label, sorted by label for stable
    /// dashboard output.
    pub fn snapshot(&self) -> Vec<CredentialUsage> {
        let last_used = self
            .last_used
            .read()
            .map(|m| m.clone())
            .unwrap_or_default();
        let mut usage: Vec<CredentialUsage> = self
            .counters
            .iter()
            .map(|(label, c)| CredentialUsage {
                label: label.clone(),
                requests: c.requests.load(Ordering::Relaxed),
                successes: c.successes.load(Ordering::Relaxed),
                errors: c.errors.load(Ordering::Relaxed),
                last_used: last_used.get(label).copied(),
            })
            .collect();
        usage.sort_by(|a, b| a.label.cmp(&b.label));
        usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> MetricsRegistry {
        MetricsRegistry::new(["Laura".to_string(), "México".to_string()])
    }

    #[test]
    fn test_registered_labels_appear_before_first_request() {
        let snapshot = registry().snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.iter().all(|u| u.requests == 0));
        assert!(snapshot.iter().all(|u| u.last_used.is_none()));
    }

    #[test]
    fn test_counters_reconcile() {
        let registry = registry();
        registry.record_request("Laura");
        registry.record_error("Laura");
        registry.record_request("Laura");
        registry.record_success("Laura");

        let laura = registry
            .snapshot()
            .into_iter()
            .find(|u| u.label == "Laura")
            .unwrap();
        assert_eq!(laura.requests, 2);
        assert_eq!(laura.successes + laura.errors, laura.requests);
        assert!(laura.last_used.is_some());
    }

    #[test]
    fn test_unknown_label_is_ignored() {
        let registry = registry();
        registry.record_request("Yarelis");
        registry.record_success("Yarelis");
        assert_eq!(registry.requests_for("Yarelis"), 0);
        assert_eq!(registry.snapshot().len(), 2);
    }
}
