//! Invocation metadata logging.
//!
//! Logs what a request-handling invocation received before the handler runs.

use serde::Serialize;

use itemstore_core::RequestContext;

use crate::logs::{log_error, payload_text};

/// Logs the inbound request payload and the environment the process runs in.
///
/// Only environment variable names are logged; values may hold credentials.
pub fn log_input<T>(ctx: &RequestContext, request: &T)
where
    T: Serialize + ?Sized,
{
    let names = environment_names(std::env::vars());
    match serde_json::to_string(&names) {
        Ok(env) => tracing::info!(request_id = %ctx.request_id, %env, "[ENV-DATA]"),
        Err(err) => log_error("log_input", "environment", ctx, &err),
    }

    match payload_text(request) {
        Ok(input) => {
            let input = input.unwrap_or_default();
            tracing::info!(request_id = %ctx.request_id, %input, "[INPUT-DATA]");
        }
        Err(err) => log_error("log_input", "JSON Marshal", ctx, &err),
    }
}

/// Sorted, de-duplicated variable names.
fn environment_names<I>(vars: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut names: Vec<String> = vars
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| !name.is_empty())
        .collect();
    names.sort();
    names.dedup();
    names
}
