use chrono::{DateTime, Duration, Utc};

/// Wall clock that never repeats or goes backwards within one store.
///
/// Each reading is the current time, or one microsecond past the previous
/// reading when the system clock has not moved (or stepped back).
#[derive(Debug, Clone, Default)]
pub struct MonotonicClock {
    last: Option<DateTime<Utc>>,
}

impl MonotonicClock {
    pub fn new() -> Self { Self::default() }

    pub fn now(&mut self) -> DateTime<Utc> {
        self.observe(Utc::now())
    }

    fn observe(&mut self, wall: DateTime<Utc>) -> DateTime<Utc> {
        let next = match self.last {
            Some(last) if wall <= last => last + Duration::microseconds(1),
            _ => wall,
        };
        self.last = Some(next);
        next
    }
}
