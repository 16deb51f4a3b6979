//! Environment abstraction for deterministic testing.
//!
//! Decouples session logic from system resources (time, randomness).
//! Message timestamps and correlation ids come from here, so tests can
//! replay the exact same send sequence byte for byte.

use std::time::Duration;

/// Abstract environment providing wall-clock time and randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `now_millis()` never goes backwards within one execution context
/// - `random_bytes()` uses a seedable generator so simulation runs are
///   reproducible
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current wall-clock time in milliseconds since the Unix epoch.
    ///
    /// Message `sent_at` stamps use this directly; the display-order
    /// invariant (non-decreasing within a conversation) depends on it
    /// being monotonic per environment instance.
    fn now_millis(&self) -> u64;

    /// Sleeps for the specified duration.
    ///
    /// The only async method in the trait. Driver code uses it for
    /// polling cadence; session logic never calls it.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a fresh correlation id for an outbound message.
    ///
    /// 128 bits of randomness rendered as lowercase hex. Collisions
    /// within a single conversation are what matters, so this is
    /// comfortably wide.
    fn correlation_id(&self) -> String {
        let mut bytes = [0u8; 16];
        self.random_bytes(&mut bytes);
        let mut out = String::with_capacity(32);
        for byte in bytes {
            let _ = std::fmt::Write::write_fmt(&mut out, format_args!("{byte:02x}"));
        }
        out
    }
}

/// Test environments with fixed time and counted randomness.
pub mod test_utils {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
        },
        time::Duration,
    };

    use super::Environment;

    /// Deterministic environment for unit tests.
    ///
    /// Time starts at a fixed epoch and advances only via
    /// [`MockEnv::advance`]. Random bytes are a counter stream, so
    /// correlation ids are predictable (`00000000...01`, `...02`, ...).
    #[derive(Clone, Default)]
    pub struct MockEnv {
        clock_millis: Arc<AtomicU64>,
        counter: Arc<AtomicU64>,
    }

    impl MockEnv {
        /// Create a mock environment at time zero.
        pub fn new() -> Self {
            Self::default()
        }

        /// Advance the mock clock.
        pub fn advance(&self, delta: Duration) {
            self.clock_millis.fetch_add(delta.as_millis() as u64, Ordering::SeqCst);
        }
    }

    impl Environment for MockEnv {
        fn now_millis(&self) -> u64 {
            self.clock_millis.load(Ordering::SeqCst)
        }

        fn sleep(&self, _duration: Duration) -> impl std::future::Future<Output = ()> + Send {
            async {}
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            let src = n.to_be_bytes();
            let len = buffer.len();
            for (i, byte) in buffer.iter_mut().enumerate() {
                *byte = if i + src.len() >= len { src[i + src.len() - len] } else { 0 };
            }
        }
    }

}
