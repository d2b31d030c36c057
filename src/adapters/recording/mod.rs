//! Recording adapters that capture interactions to cassettes.

pub mod openai_broker;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::json;

use crate::cassette::recorder::CassetteRecorder;

/// Record a `Result<T, E>` interaction using the `Ok`/`Err` JSON convention.
///
/// Both sides are stored structurally so a replay reproduces the exact value.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Serialize,
    I: Serialize,
{
    let output = match result {
        Ok(value) => serde_json::to_value(value).map(|v| json!({ "Ok": v })),
        Err(error) => serde_json::to_value(error).map(|v| json!({ "Err": v })),
    };
    let recorded = serde_json::to_value(input)
        .and_then(|input| output.map(|output| (input, output)));

    let (input, output) = match recorded {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!(port, method, error = %e, "skipping unserializable interaction");
            return;
        }
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input, output),
        Err(e) => tracing::warn!(port, method, error = %e, "recorder lock poisoned"),
    }
}
