use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info};

pub const PAYMENT_WINDOW: Duration = Duration::from_secs(300);

const TICK: Duration = Duration::from_secs(1);

/// Once-per-second countdown running on its own task.
///
/// The remaining seconds are published on a watch channel. When the count
/// reaches zero the timeout handler runs, and it is an `FnOnce` so it cannot
/// fire twice. Dropping the countdown aborts the task.
#[derive(Debug)]
pub struct Countdown {
    remaining: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl Countdown {
    pub fn start<F>(window: Duration, on_timeout: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let total = window.as_secs();
        let (sender, remaining) = watch::channel(total);

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + TICK, TICK);
            let mut left = total;
            while left > 0 {
                ticker.tick().await;
                left -= 1;
                sender.send_replace(left);
                debug!(left, "Countdown tick");
            }
            info!("Countdown expired");
            on_timeout();
        });

        Self { remaining, task }
    }

    pub fn remaining(&self) -> u64 {
        *self.remaining.borrow()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining() == 0
    }

    pub fn stream(&self) -> WatchStream<u64> {
        WatchStream::new(self.remaining.clone())
    }

    /// Resolves once the countdown hits zero. Never resolves after `cancel`.
    pub async fn expired(&self) {
        let mut remaining = self.remaining.clone();
        if remaining.wait_for(|left| *left == 0).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn format_remaining(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
