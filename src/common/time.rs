use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

pub fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Milliseconds from `start` to `end`, clamped at zero.
pub fn elapsed_ms(start: Instant, end: Instant) -> f64 {
    duration_ms(end.saturating_duration_since(start))
}

#[cfg(test)]
mod tests {
    use super::{duration_ms, elapsed_ms};
    use std::time::{Duration, Instant};

    #[test]
    fn elapsed_ms_handles_reversed_instants() {
        let start = Instant::now();
        let end = start + Duration::from_millis(5);
        assert_eq!(elapsed_ms(end, start), 0.0);
    }

    #[test]
    fn elapsed_ms_returns_difference() {
        let start = Instant::now();
        let end = start + Duration::from_micros(12_500);
        assert!((elapsed_ms(start, end) - 12.5).abs() < 1e-9);
    }

    #[test]
    fn duration_ms_converts_fractional_millis() {
        assert_eq!(duration_ms(Duration::from_micros(1500)), 1.5);
    }
}
