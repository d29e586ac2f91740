//! Ownership of a page's background tasks
//!
//! Everything a page starts (requests, timers, stream readers) is spawned
//! through its [`PageScope`]. Closing or dropping the scope aborts whatever is
//! still running, so nothing outlives the page that started it.

use crate::core::error::{DashboardError, Result};
use std::future::Future;
use tokio::task::{AbortHandle, JoinHandle};

pub struct PageScope {
    name: String,
    tasks: Vec<AbortHandle>,
    closed: bool,
}

impl PageScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
            closed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Spawn a task owned by this scope
    ///
    /// Must be called from within a tokio runtime. Fails with
    /// [`DashboardError::Cancelled`] once the scope is closed.
    pub fn spawn<F>(&mut self, future: F) -> Result<JoinHandle<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        if self.closed {
            return Err(DashboardError::Cancelled);
        }

        self.tasks.retain(|task| !task.is_finished());
        let handle = tokio::spawn(future);
        self.tasks.push(handle.abort_handle());
        Ok(handle)
    }

    /// Tasks spawned here that have not finished yet
    pub fn active_tasks(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    /// Abort every task and refuse new ones
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let running = self.active_tasks();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        tracing::debug!(scope = %self.name, aborted = running, "Closed page scope");
    }
}

impl Drop for PageScope {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_close_aborts_running_tasks() {
        let mut scope = PageScope::new("cameras");
        let handle = scope
            .spawn(async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            })
            .unwrap();
        assert_eq!(scope.active_tasks(), 1);

        scope.close();
        let err = handle.await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(scope.is_closed());
    }

    #[tokio::test]
    async fn test_spawn_after_close_is_refused() {
        let mut scope = PageScope::new("alerts");
        scope.close();

        let result = scope.spawn(async {});
        assert!(matches!(result, Err(DashboardError::Cancelled)));
    }

    #[tokio::test]
    async fn test_drop_aborts() {
        let handle = {
            let mut scope = PageScope::new("overview");
            scope
                .spawn(async {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                })
                .unwrap()
        };
        assert!(handle.await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_finished_tasks_keep_their_output() {
        let mut scope = PageScope::new("chat");
        let handle = scope.spawn(async { 7 }).unwrap();
        assert_eq!(handle.await.unwrap(), 7);
        assert_eq!(scope.active_tasks(), 0);
    }
}
