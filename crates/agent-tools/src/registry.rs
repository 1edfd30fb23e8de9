//! Tool registry for managing and executing tools.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use brain_core::{ToolRequest, ToolResult, ToolSpec};
use futures::FutureExt;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::binding::bind;
use crate::error::ToolError;
use crate::tool::Tool;

const MAX_TOOL_NAME_LEN: usize = 64;

struct Registered {
    spec: ToolSpec,
    tool: Arc<dyn Tool>,
}

/// Registry for managing tools.
///
/// Built once at startup and read-only afterwards, so it can be shared
/// across concurrent calls behind an `Arc` without locking. Tools keep
/// their registration order.
pub struct ToolRegistry {
    tools: IndexMap<String, Registered>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
        }
    }

    /// Register a tool under the name from its spec.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<(), ToolError> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a tool under a different name.
    pub fn register_as<T: Tool + 'static>(
        &mut self,
        tool: T,
        name: impl Into<String>,
    ) -> Result<(), ToolError> {
        let tool: Arc<dyn Tool> = Arc::new(tool);
        let spec = tool.spec().renamed(name);
        self.insert(spec, tool)
    }

    /// Register a shared tool.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let spec = tool.spec();
        self.insert(spec, tool)
    }

    fn insert(&mut self, spec: ToolSpec, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        validate_name(&spec.name)?;
        if self.tools.contains_key(&spec.name) {
            return Err(ToolError::DuplicateTool(spec.name));
        }
        info!("Registering tool: {}", spec.name);
        self.tools.insert(spec.name.clone(), Registered { spec, tool });
        Ok(())
    }

    /// Get a list of registered tool names.
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Check if a tool is registered.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Specs of all registered tools, in registration order.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|r| r.spec.clone()).collect()
    }

    /// Get the ToolSpec of one tool.
    pub fn spec(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name).map(|r| &r.spec)
    }

    /// JSON schema of every tool (`name`, `description`, `parameters`).
    pub fn to_json_schema(&self) -> Vec<Value> {
        self.tools
            .values()
            .map(|r| {
                serde_json::json!({
                    "name": r.spec.name,
                    "description": r.spec.description,
                    "parameters": r.spec.input_schema(),
                })
            })
            .collect()
    }

    /// Execute a tool by name with raw parameters.
    ///
    /// Errors and panics from the tool are returned as [`ToolError`].
    pub async fn execute(
        &self,
        name: &str,
        params: HashMap<String, Value>,
    ) -> Result<Value, ToolError> {
        let registered = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let args = bind(&registered.spec, params)?;
        debug!("Executing tool '{}' with {} params", name, args.params.len());

        let outcome = AssertUnwindSafe(registered.tool.execute(args))
            .catch_unwind()
            .await;

        match outcome {
            Ok(result) => result,
            Err(panic) => Err(ToolError::ExecutionFailed(format!(
                "tool panicked: {}",
                panic_message(panic.as_ref())
            ))),
        }
    }

    /// Execute a tool with a JSON arguments string.
    pub async fn execute_json(&self, name: &str, args_json: &str) -> Result<Value, ToolError> {
        let params: HashMap<String, Value> = if args_json.trim().is_empty() {
            HashMap::new()
        } else {
            serde_json::from_str(args_json)?
        };
        self.execute(name, params).await
    }

    /// Answer a tool call. Never fails: every error becomes an error result.
    pub async fn invoke(&self, request: ToolRequest) -> ToolResult {
        let ToolRequest {
            id,
            name,
            arguments,
        } = request;

        match self.execute(&name, arguments).await {
            Ok(value) => {
                debug!("Tool '{}' completed (call {})", name, id);
                ToolResult::success(id, value)
            }
            Err(e) => {
                warn!("Tool '{}' failed (call {}): {}", name, id, e);
                ToolResult::error(id, e.to_string())
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_name(name: &str) -> Result<(), ToolError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.len() > MAX_TOOL_NAME_LEN {
        Some("name is longer than 64 characters")
    } else if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some("only ASCII letters, digits and underscores are allowed")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ToolError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
