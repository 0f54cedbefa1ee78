//! In-flight request deduplication
//!
//! Concurrent requests for the same key share one provider call. The first
//! caller starts the work in a detached task and every caller, first
//! included, waits on a watch channel for the settled result. A caller that
//! goes away merely drops its receiver; the work itself keeps running so
//! the remaining waiters still get their result.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::debug;

use quizviz_providers::{ErrorClass, GenerationResult};

type Ticket = watch::Receiver<Option<GenerationResult>>;

/// Table of in-flight generations keyed by request identity.
#[derive(Default)]
pub struct InFlightTable {
    tickets: Arc<Mutex<HashMap<String, Ticket>>>,
}

impl InFlightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join an in-flight generation for `key`, or start one with `work`.
    ///
    /// The ticket is removed from the table before the result is published,
    /// both under the same task, so a caller arriving after removal starts
    /// a fresh generation instead of observing a stale ticket.
    pub async fn join_or_start<F>(&self, key: &str, work: F) -> GenerationResult
    where
        F: Future<Output = GenerationResult> + Send + 'static,
    {
        let mut receiver = {
            let mut tickets = self.tickets.lock().await;
            if let Some(existing) = tickets.get(key) {
                debug!(key, "joining in-flight generation");
                existing.clone()
            } else {
                let (sender, receiver) = watch::channel(None);
                tickets.insert(key.to_string(), receiver.clone());

                let tickets_handle = Arc::clone(&self.tickets);
                let key = key.to_string();
                tokio::spawn(async move {
                    // Run the work in its own task so a panic inside it still
                    // settles the ticket instead of leaving the key occupied
                    let result = match tokio::spawn(work).await {
                        Ok(result) => result,
                        Err(err) => GenerationResult::Failure {
                            error_class: ErrorClass::Unknown,
                            message: format!("generation task failed: {err}"),
                            provider: None,
                        },
                    };
                    tickets_handle.lock().await.remove(&key);
                    // Send after removal so no new waiter can attach to a
                    // ticket that already settled
                    let _ = sender.send(Some(result));
                });
                receiver
            }
        };

        loop {
            if receiver.changed().await.is_err() {
                // Starter task dropped the sender without settling
                return GenerationResult::Failure {
                    error_class: ErrorClass::Unknown,
                    message: "in-flight generation was dropped".to_string(),
                    provider: None,
                };
            }
            if let Some(result) = receiver.borrow().clone() {
                return result;
            }
        }
    }

    /// Number of generations currently in flight.
    pub async fn len(&self) -> usize {
        self.tickets.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tickets.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use quizviz_providers::ImageContent;

    use super::*;

    fn success(tag: &str) -> GenerationResult {
        GenerationResult::Success {
            content: ImageContent::Url(format!("https://img.example/{tag}")),
            provider: "test".into(),
            took_ms: 1,
        }
    }

    #[tokio::test]
    async fn test_single_caller_gets_result() {
        let table = Arc::new(InFlightTable::new());
        let result = table.join_or_start("k", async { success("a") }).await;
        assert!(result.is_success());
        assert!(table.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_execution() {
        let table = Arc::new(InFlightTable::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let table = Arc::clone(&table);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                table
                    .join_or_start("same-key", async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        success("shared")
                    })
                    .await
            }));
        }

        for handle in handles {
            let result = handle.await.unwrap();
            assert!(result.is_success());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_run_independently() {
        let table = Arc::new(InFlightTable::new());
        let calls = Arc::new(AtomicUsize::new(0));

        for key in ["a", "b"] {
            let calls = Arc::clone(&calls);
            table
                .join_or_start(key, async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    success(key)
                })
                .await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_ticket_removed_after_settlement() {
        let table = Arc::new(InFlightTable::new());
        table.join_or_start("k", async { success("a") }).await;
        assert_eq!(table.len().await, 0);
        // A later request starts fresh
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = Arc::clone(&calls);
        table
            .join_or_start("k", async move {
                calls2.fetch_add(1, Ordering::SeqCst);
                success("b")
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_work_settles_and_frees_the_key() {
        let table = Arc::new(InFlightTable::new());

        let result = table
            .join_or_start("k", async { panic!("provider blew up") })
            .await;
        match result {
            GenerationResult::Failure { error_class, .. } => {
                assert_eq!(error_class, ErrorClass::Unknown);
            }
            other => panic!("expected failure, got {other:?}"),
        }

        // The key is free again and a fresh generation runs
        assert!(table.is_empty().await);
        let result = table.join_or_start("k", async { success("retry") }).await;
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_aborted_caller_does_not_cancel_work() {
        let table = Arc::new(InFlightTable::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_work = Arc::clone(&calls);
        let first = {
            let table = Arc::clone(&table);
            tokio::spawn(async move {
                table
                    .join_or_start("k", async move {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        calls_work.fetch_add(1, Ordering::SeqCst);
                        success("survives")
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        first.abort();

        // The detached work still settles for a second caller that joined
        let second = {
            let table = Arc::clone(&table);
            tokio::spawn(async move { table.join_or_start("k", async { success("other") }).await })
        };
        let result = second.await.unwrap();
        assert!(result.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
