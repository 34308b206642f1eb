//! Line-delimited JSON protocol
//!
//! One request object per line:
//! `{"id": 1, "operation": "get_job", "arguments": {"job_id": "..."}}`
//!
//! One response object per line, echoing the request id:
//! `{"id": 1, "is_error": false, "text": "..."}`
//!
//! The reserved operation `list_operations` returns the catalogue of
//! operations with their input schemas.

use cronlytic_domain::CronlyticError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::commands::OperationResponse;
use crate::context::AppContext;

pub const LIST_OPERATIONS: &str = "list_operations";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProtocolRequest {
    #[serde(default)]
    pub id: Value,
    pub operation: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolResponse {
    pub id: Value,
    pub is_error: bool,
    pub text: String,
}

impl ProtocolResponse {
    fn new(id: Value, response: OperationResponse) -> Self {
        Self { id, is_error: response.is_error, text: response.text }
    }
}

/// Decode one request line, run it, and build the response.
pub async fn handle_line(ctx: &AppContext, line: &str) -> ProtocolResponse {
    let request: ProtocolRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => {
            debug!(error = %err, "malformed request line");
            // Echo the id when the line is JSON but otherwise malformed.
            let id = serde_json::from_str::<Value>(line)
                .ok()
                .and_then(|value| value.get("id").cloned())
                .unwrap_or(Value::Null);
            let err = CronlyticError::invalid_field(
                "request",
                "Expected a JSON object with an 'operation' string",
            );
            return ProtocolResponse::new(id, OperationResponse::failure(&err));
        }
    };

    if request.operation == LIST_OPERATIONS {
        let response = match serde_json::to_string_pretty(&ctx.registry.catalogue()) {
            Ok(text) => OperationResponse::success(text),
            Err(err) => OperationResponse::failure(&CronlyticError::UnexpectedApi {
                status: None,
                message: format!("Could not render operation catalogue: {err}"),
            }),
        };
        return ProtocolResponse::new(request.id, response);
    }

    let cancel = ctx.shutdown.child_token();
    let response = ctx.registry.dispatch(&request.operation, request.arguments, &cancel).await;
    ProtocolResponse::new(request.id, response)
}
