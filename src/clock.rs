// Injectable time source
// Every temporal comparison in the engine reads "now" through this trait so
// boundary tests (cancellation window, seasonal promotions) can run against a
// fixed instant instead of the wall clock.

use chrono::{Local, NaiveDate, NaiveDateTime};
use parking_lot::RwLock;

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

// Production clock: local hotel time, single implicit market.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

// Test clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    instant: RwLock<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(instant: NaiveDateTime) -> Self {
        Self {
            instant: RwLock::new(instant),
        }
    }

    pub fn set(&self, instant: NaiveDateTime) {
        *self.instant.write() = instant;
    }

    pub fn advance(&self, delta: chrono::Duration) {
        let mut guard = self.instant.write();
        *guard += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.instant.read()
    }
}
