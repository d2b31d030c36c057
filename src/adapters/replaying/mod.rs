//! Replaying adapters that serve recorded interactions from cassettes.

pub mod openai_broker;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

/// Retrieve the next recorded output for a given port and method.
///
/// # Errors
///
/// Returns an error if the cassette has no more interactions for the pair.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, String> {
    let mut guard = replayer
        .lock()
        .map_err(|e| format!("replayer lock poisoned: {e}"))?;
    guard
        .next_interaction(port, method)
        .map(|interaction| interaction.output.clone())
}

/// A recorded output decoded back into its `Ok` or `Err` value.
pub(crate) enum Replayed<T, E> {
    /// The recorded call succeeded.
    Ok(T),
    /// The recorded call failed with a structured error.
    Err(E),
    /// The recorded error was a bare message.
    Message(String),
}

/// Decode a replayed output recorded with the `Ok`/`Err` convention.
pub(crate) fn replay_result<T, E>(output: serde_json::Value) -> Result<Replayed<T, E>, String>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    if let Some(err) = output.get("Err").or_else(|| output.get("err")) {
        if let Some(message) = err.as_str() {
            return Ok(Replayed::Message(message.to_string()));
        }
        return serde_json::from_value(err.clone())
            .map(Replayed::Err)
            .map_err(|e| format!("Failed to decode recorded error: {e}"));
    }
    let ok = output
        .get("Ok")
        .or_else(|| output.get("ok"))
        .cloned()
        .unwrap_or(output);
    serde_json::from_value(ok)
        .map(Replayed::Ok)
        .map_err(|e| format!("Failed to decode recorded output: {e}"))
}
