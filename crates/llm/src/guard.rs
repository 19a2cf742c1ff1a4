//! Mutual exclusion around a shared model instance.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::client::{Generation, GenerationRequest, Generator};
use medrag_core::AppResult;

/// Generator wrapper that lets only one call reach the inner model at a time.
///
/// Concurrent callers queue on an async mutex in FIFO order. The lock is
/// released when the call completes or when the caller's future is dropped,
/// so a timed-out caller never blocks the next one.
pub struct SerializedGenerator {
    inner: Arc<dyn Generator>,
    lock: Mutex<()>,
}

impl SerializedGenerator {
    pub fn new(inner: Arc<dyn Generator>) -> Self {
        Self {
            inner,
            lock: Mutex::new(()),
        }
    }
}

#[async_trait::async_trait]
impl Generator for SerializedGenerator {
    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    async fn complete(&self, request: &GenerationRequest) -> AppResult<Generation> {
        let _guard = self.lock.lock().await;
        self.inner.complete(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::GenerationUsage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Records how many calls overlap.
    #[derive(Default)]
    struct OverlapProbe {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Generator for OverlapProbe {
        fn provider_name(&self) -> &str {
            "probe"
        }

        fn model_name(&self) -> &str {
            "probe-v1"
        }

        async fn complete(&self, request: &GenerationRequest) -> AppResult<Generation> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);

            Ok(Generation {
                content: request.prompt.clone(),
                model: "probe-v1".to_string(),
                usage: GenerationUsage::default(),
                truncated: false,
            })
        }
    }

    #[tokio::test]
    async fn test_calls_never_overlap() {
        let probe = Arc::new(OverlapProbe::default());
        let generator = SerializedGenerator::new(probe.clone());

        let calls = (0..4).map(|i| {
            let generator = &generator;
            async move { generator.generate(&format!("prompt {}", i), 8).await }
        });
        let results = futures::future::join_all(calls).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 4);
        assert_eq!(probe.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unguarded_probe_does_overlap() {
        let probe = Arc::new(OverlapProbe::default());

        let calls = (0..4).map(|_| {
            let probe = &probe;
            async move { probe.generate("prompt", 8).await }
        });
        futures::future::join_all(calls).await;

        assert!(probe.max_in_flight.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn test_dropped_caller_releases_lock() {
        let probe = Arc::new(OverlapProbe::default());
        let generator = SerializedGenerator::new(probe.clone());

        let timed_out =
            tokio::time::timeout(Duration::from_millis(5), generator.generate("slow", 8)).await;
        assert!(timed_out.is_err());

        let answer = generator.generate("next", 8).await.unwrap();
        assert_eq!(answer, "next");
    }

    #[test]
    fn test_delegates_names() {
        let generator = SerializedGenerator::new(Arc::new(OverlapProbe::default()));
        assert_eq!(generator.provider_name(), "probe");
        assert_eq!(generator.model_name(), "probe-v1");
    }
}
