//! Request throttling.
//!
//! Every remote call, list or delete, is followed by one [`Throttle::pause`]
//! before the next call is issued. With a single sequential caller this
//! bounds the request rate to one call per delay.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future alias for a throttle pause.
pub type PauseFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Pause inserted after each remote call.
pub trait Throttle: Send + Sync {
    fn pause(&self) -> PauseFuture<'_>;
}

/// Sleep a fixed delay on the tokio clock.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Throttle for FixedDelay {
    fn pause(&self) -> PauseFuture<'_> {
        let delay = self.delay;
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        })
    }
}
