//! Backend A: one in-flight call per process.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use tokio::sync::Semaphore;

use super::{Backend, BackendKind, RawResponse, Transport};
use crate::error_handling::{BackendError, TransportErrorKind};
use crate::request::RequestDescriptor;

/// Strategy whose transport is not safe for concurrent use.
///
/// The single-permit semaphore is held for the network phase only. The deadline
/// starts once the permit is acquired, and the permit is released when the deadline
/// fires, so a stuck call cannot keep the lock.
pub struct SerializedBackend {
    transport: Arc<dyn Transport>,
    lock: Semaphore,
}

impl SerializedBackend {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            lock: Semaphore::new(1),
        }
    }

    /// Whether a call currently holds the lock.
    pub fn is_busy(&self) -> bool {
        self.lock.available_permits() == 0
    }
}

#[async_trait]
impl Backend for SerializedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Serialized
    }

    fn supports_cookie_jar(&self) -> bool {
        self.transport.supports_cookie_jar()
    }

    async fn execute(&self, request: &RequestDescriptor) -> Result<RawResponse, BackendError> {
        let _permit = self.lock.acquire().await.map_err(|e| BackendError::Transport {
            kind: TransportErrorKind::Other,
            message: e.to_string(),
        })?;
        debug!("Serialized backend acquired lock for {}", request.url);

        let blob = tokio::time::timeout(request.timeout, self.transport.send(request))
            .await
            .map_err(|_| BackendError::Timeout(request.timeout))??;

        Ok(RawResponse {
            kind: BackendKind::Serialized,
            blob,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::request::{CookieProvenance, HeaderSet, Method, ResponseShape};

    /// Records the peak number of overlapping sends.
    #[derive(Default)]
    struct CountingTransport {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        delay_ms: u64,
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn send(&self, _request: &RequestDescriptor) -> Result<String, BackendError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok("HTTP/1.1 200 OK\r\n\r\nok".to_string())
        }
    }

    fn descriptor(timeout: Duration) -> RequestDescriptor {
        RequestDescriptor {
            method: Method::Get,
            url: "http://example.test/".to_string(),
            body: String::new(),
            headers: HeaderSet::new(),
            cookies: None,
            cookie_provenance: CookieProvenance::None,
            cookie_jar: None,
            proxy: String::new(),
            timeout,
            user_agent: "test".to_string(),
            content_type: "application/json".to_string(),
            response_shape: ResponseShape::HeaderAndBody,
        }
    }

    #[tokio::test]
    async fn test_calls_never_overlap() {
        let transport = Arc::new(CountingTransport {
            delay_ms: 20,
            ..Default::default()
        });
        let backend = Arc::new(SerializedBackend::new(transport.clone()));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let backend = Arc::clone(&backend);
            handles.push(tokio::spawn(async move {
                backend.execute(&descriptor(Duration::from_secs(5))).await
            }));
        }
        for handle in handles {
            let raw = handle.await.unwrap().unwrap();
            assert_eq!(raw.kind, BackendKind::Serialized);
            assert_eq!(raw.parse().body, "ok");
        }

        assert_eq!(transport.peak.load(Ordering::SeqCst), 1);
        assert!(!backend.is_busy());
    }

    #[tokio::test]
    async fn test_deadline_releases_lock() {
        let transport = Arc::new(CountingTransport {
            delay_ms: 5_000,
            ..Default::default()
        });
        let backend = SerializedBackend::new(transport);

        let result = backend.execute(&descriptor(Duration::from_millis(50))).await;
        assert!(matches!(result, Err(BackendError::Timeout(_))));
        assert!(!backend.is_busy());
    }
}
