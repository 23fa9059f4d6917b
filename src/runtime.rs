//! Runtime abstraction layer for async operations
//!
//! The picker never awaits anything on the UI thread. Provider calls and tile
//! downloads are handed to an [`AsyncSpawner`], and their results travel back
//! over channels that the UI drains once per frame. Tests inject their own
//! spawner to decide exactly when (and in which order) replies land.

use futures::future::BoxFuture;
use std::time::Duration;

/// Boxed future accepted by [`AsyncSpawner::spawn_boxed`]
pub type BoxedTask = BoxFuture<'static, ()>;

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(&self, future: BoxedTask) -> Box<dyn AsyncHandle>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task
    fn cancel(&self);
}

/// Waits without blocking the executor thread
pub async fn delay(duration: Duration) {
    #[cfg(feature = "tokio-runtime")]
    {
        ::tokio::time::sleep(duration).await;
    }

    #[cfg(not(feature = "tokio-runtime"))]
    {
        log::debug!("no timer available, skipping {:?} delay", duration);
    }
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner.
        ///
        /// Uses the runtime handle captured at construction when there is one,
        /// so it also works from threads outside the runtime (e.g. the eframe
        /// event loop).
        #[derive(Default)]
        pub struct TokioSpawner {
            handle: Option<::tokio::runtime::Handle>,
        }

        impl TokioSpawner {
            pub fn new() -> Self {
                Self {
                    handle: ::tokio::runtime::Handle::try_current().ok(),
                }
            }
        }

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(&self, future: BoxedTask) -> Box<dyn AsyncHandle> {
                let handle = match &self.handle {
                    Some(runtime) => runtime.spawn(future),
                    None => ::tokio::spawn(future),
                };
                Box::new(TokioHandle(handle))
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }

            fn cancel(&self) {
                self.0.abort();
            }
        }
    }
}
