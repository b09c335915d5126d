use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Per-user gate between consecutive generations. A teacher who just
/// fired a generation must wait out the window before the next one;
/// refinements and exports are not gated.
pub struct Debounce {
    window: Duration,
    last_seen: Mutex<HashMap<String, Instant>>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Check the gate for a user and arm it when open. Returns the
    /// remaining wait when the gate is still closed.
    pub fn check_and_arm(&self, user: &str) -> Result<(), Duration> {
        let mut last_seen = match self.last_seen.lock() {
            Ok(guard) => guard,
            // A poisoned gate must not block generations.
            Err(poisoned) => poisoned.into_inner(),
        };

        let now = Instant::now();
        if let Some(last) = last_seen.get(user) {
            let elapsed = now.duration_since(*last);
            if elapsed < self.window {
                return Err(self.window - elapsed);
            }
        }

        // Entries past the window no longer gate anyone; drop them so
        // the map stays bounded by the set of recently active users.
        let window = self.window;
        last_seen.retain(|_, last| now.duration_since(*last) < window);

        last_seen.insert(user.to_string(), now);
        Ok(())
    }

    #[cfg(test)]
    fn tracked_users(&self) -> usize {
        match self.last_seen.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
