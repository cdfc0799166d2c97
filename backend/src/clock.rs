use std::time::{ Duration, Instant };

/// Restartable stopwatch measuring time since the last `restart`.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    since: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self { since: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.since.elapsed()
    }

    /// Returns the time elapsed since the previous restart and starts counting again.
    pub fn restart(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now - self.since;
        self.since = now;
        elapsed
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod test_clock {
    use super::*;

    #[test]
    fn test_restart() {
        let mut clock = Clock::start();
        std::thread::sleep(Duration::from_millis(20));

        let first = clock.restart();
        assert!(first >= Duration::from_millis(20));
        assert!(clock.elapsed() < first);
    }

    #[test]
    fn test_restart_is_not_cumulative() {
        let mut clock = Clock::start();
        std::thread::sleep(Duration::from_millis(30));
        clock.restart();

        let second = clock.restart();
        assert!(second < Duration::from_millis(30));
    }
}
