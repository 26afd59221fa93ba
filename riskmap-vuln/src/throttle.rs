use std::time::{Duration, Instant};

/// Minimum-interval gate for outbound API queries.
///
/// Remembers when the previous query went out and sleeps off the remainder
/// of the interval before releasing the next one. A client holds a single
/// gate across all of its query paths, so the spacing holds no matter which
/// operation the caller mixes.
#[derive(Debug)]
pub struct RateGate {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl RateGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// Wait until at least `min_interval` has passed since the previous
    /// call, then mark this call. The first call never waits.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_call = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_call_does_not_wait() {
        let mut gate = RateGate::new(Duration::from_secs(10));
        let start = Instant::now();
        gate.wait().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn second_call_waits_out_the_interval() {
        let mut gate = RateGate::new(Duration::from_millis(80));
        gate.wait().await;
        let start = Instant::now();
        gate.wait().await;
        // Allow some scheduler slack below the nominal interval.
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn elapsed_interval_passes_through() {
        let mut gate = RateGate::new(Duration::from_millis(20));
        gate.wait().await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        let start = Instant::now();
        gate.wait().await;
        assert!(start.elapsed() < Duration::from_millis(15));
    }
}
