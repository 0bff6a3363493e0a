//! Remote health probe

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::mcp::{ToolCallOutput, ToolTransport};

/// Reserved tool answering `{"status": "ok"}` when the server is up
pub const HEALTH_CHECK_TOOL: &str = "health_check";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Serialises as `{"status":"healthy"}` or `{"status":"unhealthy"}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
}

impl HealthReport {
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            status: HealthStatus::Unhealthy,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Call the health tool; every failure is reported as unhealthy
pub async fn probe(transport: &dyn ToolTransport) -> HealthReport {
    let call_id = format!("health-check-{}", uuid::Uuid::new_v4());
    tracing::debug!("[HealthCheck] Probing with call id {}", call_id);

    let result = transport
        .call_tool(&call_id, HEALTH_CHECK_TOOL, Map::new())
        .await;
    interpret(result)
}

fn interpret(result: Result<ToolCallOutput>) -> HealthReport {
    let output = match result {
        Ok(output) => output,
        Err(e) => {
            tracing::error!("[HealthCheck] Health check failed: {:#}", e);
            return HealthReport::unhealthy();
        }
    };

    let Some(text) = output.first_text() else {
        tracing::error!("[HealthCheck] Health check returned no text content");
        return HealthReport::unhealthy();
    };

    match serde_json::from_str::<Value>(text) {
        Ok(body) if body.get("status").and_then(Value::as_str) == Some("ok") => {
            HealthReport::healthy()
        }
        Ok(body) => {
            tracing::warn!("[HealthCheck] Server reported: {}", body);
            HealthReport::unhealthy()
        }
        Err(e) => {
            tracing::error!("[HealthCheck] Malformed health check response: {}", e);
            HealthReport::unhealthy()
        }
    }
}
