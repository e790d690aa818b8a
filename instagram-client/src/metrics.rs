use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

/// Aggregate view of the scraping API traffic.
#[derive(Debug, Clone, Default)]
pub struct ApiMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub rate_limited_requests: u64,
    pub average_response_time: Duration,
    pub last_request_time: Option<SystemTime>,
}

#[derive(Debug, Clone)]
pub struct RequestMetrics {
    pub endpoint: String,
    pub status_code: Option<u16>,
    pub response_time: Duration,
    pub success: bool,
    pub rate_limited: bool,
}

#[derive(Debug, Default)]
pub struct MetricsCollector {
    metrics: RwLock<ApiMetrics>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_request(&self, request: RequestMetrics) {
        let mut metrics = self.metrics.write().await;

        // Running average over all requests seen so far.
        let previous_total = metrics.total_requests;
        let total_time = metrics.average_response_time * previous_total as u32
            + request.response_time;
        metrics.total_requests += 1;
        metrics.average_response_time = total_time / metrics.total_requests as u32;
        metrics.last_request_time = Some(SystemTime::now());

        if request.success {
            metrics.successful_requests += 1;
        } else {
            metrics.failed_requests += 1;
        }
        if request.rate_limited {
            metrics.rate_limited_requests += 1;
        }
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.read().await.clone()
    }

    pub async fn reset_metrics(&self) {
        *self.metrics.write().await = ApiMetrics::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(success: bool, rate_limited: bool, millis: u64) -> RequestMetrics {
        RequestMetrics {
            endpoint: "/acts/test/runs".to_string(),
            status_code: Some(if success { 200 } else { 500 }),
            response_time: Duration::from_millis(millis),
            success,
            rate_limited,
        }
    }

    #[tokio::test]
    async fn records_success_and_failure_counts() {
        let collector = MetricsCollector::new();
        collector.record_request(request(true, false, 100)).await;
        collector.record_request(request(false, false, 300)).await;
        collector.record_request(request(false, true, 200)).await;

        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_requests, 3);
        assert_eq!(metrics.successful_requests, 1);
        assert_eq!(metrics.failed_requests, 2);
        assert_eq!(metrics.rate_limited_requests, 1);
        assert_eq!(metrics.average_response_time, Duration::from_millis(200));
        assert!(metrics.last_request_time.is_some());
    }

    #[tokio::test]
    async fn reset_clears_counters() {
        let collector = MetricsCollector::new();
        collector.record_request(request(true, false, 50)).await;
        collector.reset_metrics().await;

        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_requests, 0);
        assert!(metrics.last_request_time.is_none());
    }
}
