use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

/// Wait between the success view appearing and the navigation
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(2500);

/// Whatever performs navigation for the hosting view
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, route: &str);
}

pub struct RedirectScheduler<N> {
    navigator: Arc<N>,
    delay: Duration,
}

impl<N> Clone for RedirectScheduler<N> {
    fn clone(&self) -> Self {
        Self {
            navigator: Arc::clone(&self.navigator),
            delay: self.delay,
        }
    }
}

impl<N: Navigator> RedirectScheduler<N> {
    pub fn new(navigator: Arc<N>, delay: Duration) -> Self {
        Self { navigator, delay }
    }

    /// Starts the one-shot timer. Must be called inside a tokio runtime.
    pub fn schedule(&self, route: &'static str) -> PendingRedirect {
        let navigator = Arc::clone(&self.navigator);
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!("Redirecting to {route}");
            navigator.navigate(route);
        });
        PendingRedirect { route, task }
    }
}

/// A scheduled navigation. Cancelled when dropped.
#[derive(Debug)]
pub struct PendingRedirect {
    route: &'static str,
    task: JoinHandle<()>,
}

impl PendingRedirect {
    pub fn route(&self) -> &'static str {
        self.route
    }

    pub fn has_fired(&self) -> bool {
        self.task.is_finished()
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for PendingRedirect {
    fn drop(&mut self) {
        self.task.abort();
    }
}
