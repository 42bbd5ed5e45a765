use crate::yaya::YayaClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use utoipa::ToSchema;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub dependencies: HashMap<String, DependencyStatus>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DependencyStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DependencyStatus {
    pub fn healthy(latency: Duration) -> Self {
        Self {
            status: "healthy".to_string(),
            latency_ms: Some(latency.as_millis() as u64),
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            latency_ms: None,
            error: Some(error.into()),
        }
    }
}

#[async_trait]
pub trait DependencyChecker: Send + Sync {
    async fn check(&self) -> DependencyStatus;
    fn name(&self) -> &'static str;
}

/// Issues a signed page-1 listing call against the wallet API.
pub struct UpstreamChecker {
    client: YayaClient,
}

impl UpstreamChecker {
    pub fn new(client: YayaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DependencyChecker for UpstreamChecker {
    async fn check(&self) -> DependencyStatus {
        let start = Instant::now();
        match self.client.find_by_user(1).await {
            Ok(_) => DependencyStatus::healthy(start.elapsed()),
            Err(e) => DependencyStatus::unhealthy(e.to_string()),
        }
    }

    fn name(&self) -> &'static str {
        "upstream"
    }
}

pub struct HealthChecker {
    checkers: Vec<Box<dyn DependencyChecker>>,
    start_time: Instant,
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthChecker {
    pub fn new() -> Self {
        Self {
            checkers: Vec::new(),
            start_time: Instant::now(),
        }
    }

    pub fn add_checker(mut self, checker: Box<dyn DependencyChecker>) -> Self {
        self.checkers.push(checker);
        self
    }

    pub async fn check_all(&self) -> HealthResponse {
        let futures = self.checkers.iter().map(|checker| async move {
            let status = timeout(CHECK_TIMEOUT, checker.check())
                .await
                .unwrap_or_else(|_| DependencyStatus::unhealthy("timeout"));
            (checker.name().to_string(), status)
        });

        let results = futures::future::join_all(futures).await;
        let total_count = results.len();
        let healthy_count = results
            .iter()
            .filter(|(_, status)| status.status == "healthy")
            .count();

        let overall_status = if healthy_count == total_count {
            "healthy"
        } else if healthy_count > 0 {
            "degraded"
        } else {
            "unhealthy"
        };

        HealthResponse {
            status: overall_status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            dependencies: results.into_iter().collect(),
        }
    }
}
