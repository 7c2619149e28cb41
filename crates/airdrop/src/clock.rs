//! Wall clock abstraction so cooldown arithmetic can be driven by tests

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

/// Abstracts the system time source
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FakeTimeSource {
    t: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeTimeSource {
    pub fn new(t: DateTime<Utc>) -> Self {
        Self {
            t: Arc::new(Mutex::new(t)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self.t.lock().unwrap_or_else(|e| e.into_inner());
        *current += by;
    }
}

impl TimeSource for FakeTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.t.lock().unwrap_or_else(|e| e.into_inner())
    }
}
