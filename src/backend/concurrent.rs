//! Backend B: independent calls, no shared lock.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Backend, BackendKind, RawResponse, Transport};
use crate::error_handling::BackendError;
use crate::request::RequestDescriptor;

pub struct ConcurrentBackend {
    transport: Arc<dyn Transport>,
}

impl ConcurrentBackend {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Backend for ConcurrentBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Concurrent
    }

    fn supports_cookie_jar(&self) -> bool {
        self.transport.supports_cookie_jar()
    }

    async fn execute(&self, request: &RequestDescriptor) -> Result<RawResponse, BackendError> {
        let blob = tokio::time::timeout(request.timeout, self.transport.send(request))
            .await
            .map_err(|_| BackendError::Timeout(request.timeout))??;

        Ok(RawResponse {
            kind: BackendKind::Concurrent,
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

    #[derive(Default)]
    struct CountingTransport {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn send(&self, _request: &RequestDescriptor) -> Result<String, BackendError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok("201!!!created".to_string())
        }
    }

    fn descriptor(timeout: Duration) -> RequestDescriptor {
        RequestDescriptor {
            method: Method::Post,
            url: "http://example.test/".to_string(),
            body: "{}".to_string(),
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
    async fn test_calls_overlap() {
        let transport = Arc::new(CountingTransport::default());
        let backend = ConcurrentBackend::new(transport.clone());

        let request = descriptor(Duration::from_secs(5));
        let results = futures::future::join_all((0..4).map(|_| backend.execute(&request))).await;
        for result in results {
            assert_eq!(result.unwrap().parse().status, 201);
        }
        assert!(transport.peak.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn test_deadline_is_enforced() {
        let backend = ConcurrentBackend::new(Arc::new(CountingTransport::default()));
        let result = backend.execute(&descriptor(Duration::from_millis(10))).await;
        match result {
            Err(BackendError::Timeout(d)) => assert_eq!(d, Duration::from_millis(10)),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
