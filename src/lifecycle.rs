use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const POLL_STEP: Duration = Duration::from_millis(50);

/// Process-wide cancellation flag. Starts cleared, is set at most once and never reset.
#[derive(Debug, Default)]
pub struct Lifecycle {
    cancelled: AtomicBool,
}

impl Lifecycle {

    pub fn init() -> Arc<Lifecycle> {
        Arc::new(Lifecycle::default())
    }

    pub fn install_interrupt_handler(self: &Arc<Self>) -> Result<(), ctrlc::Error> {
        let lifecycle = Arc::clone(self);
        ctrlc::set_handler(move || {
            let repeated = lifecycle.is_cancelled();
            lifecycle.cancel();
            if !repeated {
                println!("\nPing interrupted, exiting...");
            }
        })
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    // true when cut short by cancellation
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_cancelled() {
                debug!("sleep cut short by cancellation");
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            thread::sleep(remaining.min(POLL_STEP));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_cleared() {
        assert!(!Lifecycle::init().is_cancelled());
    }

    #[test]
    fn test_cancel_is_sticky() {
        let lifecycle = Lifecycle::init();
        lifecycle.cancel();
        lifecycle.cancel();
        assert!(lifecycle.is_cancelled());
    }

    #[test]
    fn test_sleep_runs_to_completion() {
        let lifecycle = Lifecycle::init();
        let started = Instant::now();
        assert!(!lifecycle.sleep(Duration::from_millis(80)));
        assert!(started.elapsed() >= Duration::from_millis(80));
    }

    #[test]
    fn test_sleep_wakes_on_cancel() {
        let lifecycle = Lifecycle::init();
        let remote = Arc::clone(&lifecycle);
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            remote.cancel();
        });

        let started = Instant::now();
        assert!(lifecycle.sleep(Duration::from_secs(10)));
        assert!(started.elapsed() < Duration::from_secs(2), "sleep should end soon after cancel");
        canceller.join().unwrap();
    }
}
