//! Background task spawning
//!
//! The viewer spawns the feed pipeline through [`spawn`] so the UI thread
//! never blocks on the network.

use crate::prelude::Future;
use tokio::task::JoinHandle;

/// Spawns a task on the ambient tokio runtime; must be called inside one
pub fn spawn<F>(future: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    log::debug!("spawning background task");
    tokio::spawn(future)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::time::{sleep, Duration};

    #[tokio::test]
    async fn test_spawned_task_runs() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let handle = spawn(async move {
            sleep(Duration::from_millis(10)).await;
            flag.store(true, Ordering::SeqCst);
        });

        assert!(!handle.is_finished());
        handle.await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }
}
