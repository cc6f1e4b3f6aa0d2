//! Page session attached to one tab.

use std::sync::Arc;

use serde_json::{json, Value};

use super::client::Connection;
use super::error::CdpError;
use super::protocol::EvaluateResult;

/// A flattened CDP session on one page target.
pub struct PageSession {
    connection: Arc<Connection>,
    session_id: String,
    target_id: String,
}

impl PageSession {
    pub(crate) fn new(connection: Arc<Connection>, session_id: String, target_id: String) -> Self {
        Self {
            connection,
            session_id,
            target_id,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Send a CDP command scoped to this session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.connection
            .call(method, params, Some(&self.session_id))
            .await
    }

    pub(crate) async fn enable_runtime(&self) -> Result<(), CdpError> {
        self.call("Runtime.enable", None).await?;
        Ok(())
    }

    /// Evaluate a JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let raw = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        let result: EvaluateResult = serde_json::from_value(raw)?;
        if let Some(exception) = result.exception_details {
            return Err(CdpError::ScriptThrew(exception.message().to_string()));
        }
        Ok(result.result.value.unwrap_or(Value::Null))
    }
}
