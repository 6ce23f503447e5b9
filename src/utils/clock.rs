use chrono::{DateTime, Utc};

/// Represents an entity responsible for providing dates across the application.
/// Record ids are minted from it, so tests can substitute a deterministic clock.
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Utc>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
