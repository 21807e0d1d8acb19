//! Request-correlated logging helpers.
//!
//! Every event carries the request id of the call it belongs to. Logging is
//! best effort: none of these functions can fail the caller.

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use itemstore_core::RequestContext;

/// Logs that `operation` started.
pub fn log_info(operation: &str, ctx: &RequestContext) {
    tracing::info!(request_id = %ctx.request_id, operation, "[INFO]");
}

/// Logs `operation` together with a JSON rendering of `payload`.
///
/// Empty payloads (null, empty strings, sequences or maps) are left out.
pub fn log_info_with_payload<T>(operation: &str, payload: &T, ctx: &RequestContext)
where
    T: Serialize + ?Sized,
{
    match payload_text(payload) {
        Ok(Some(payload)) => {
            tracing::info!(request_id = %ctx.request_id, operation, %payload, "[INFO]")
        }
        Ok(None) => log_info(operation, ctx),
        Err(err) => {
            log_error(operation, "JSON Marshal", ctx, &err);
            log_info(operation, ctx);
        }
    }
}

/// Logs a failure of `operation`; `cause` names the step that failed.
pub fn log_error(operation: &str, cause: &str, ctx: &RequestContext, err: &dyn Display) {
    if cause.is_empty() {
        tracing::error!(request_id = %ctx.request_id, operation, error = %err, "[ERROR]");
    } else {
        tracing::error!(request_id = %ctx.request_id, operation, cause, error = %err, "[ERROR]");
    }
}

/// Renders `payload` as compact JSON, or `None` when it is empty.
pub(crate) fn payload_text<T>(payload: &T) -> Result<Option<String>, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(payload)?;
    let empty = match &value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        _ => false,
    };
    if empty {
        return Ok(None);
    }
    serde_json::to_string(&value).map(Some)
}
