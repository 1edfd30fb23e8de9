//! ToolExecutor implementation backed by ToolRegistry.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use brain_core::{ToolExecutor, ToolRequest, ToolResult, ToolSpec};
use tokio::time::timeout;
use tracing::warn;

use crate::registry::ToolRegistry;

/// Exposes a [`ToolRegistry`] to a reasoning engine.
///
/// The engine sees only the `ToolExecutor` contract; an optional per-call
/// timeout turns a hung tool into an error result.
#[derive(Clone)]
pub struct RegistryToolExecutor {
    registry: Arc<ToolRegistry>,
    timeout: Option<Duration>,
}

impl RegistryToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: None,
        }
    }

    /// Bound each tool call by `limit`.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

#[async_trait]
impl ToolExecutor for RegistryToolExecutor {
    async fn execute(&self, request: ToolRequest) -> ToolResult {
        let Some(limit) = self.timeout else {
            return self.registry.invoke(request).await;
        };

        let id = request.id.clone();
        let name = request.name.clone();
        match timeout(limit, self.registry.invoke(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Tool '{}' timed out after {:?}", name, limit);
                ToolResult::error(id, format!("Tool '{}' timed out", name))
            }
        }
    }

    fn tool_specs(&self) -> Vec<ToolSpec> {
        self.registry.specs()
    }
}
