//! Replaying adapters that serve recorded interactions from cassettes.

pub mod thumbnail_service;

use std::sync::{Arc, Mutex, PoisonError};

use crate::cassette::replayer::CassetteReplayer;

/// Retrieve the next recorded output for a given port and method.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, String> {
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    guard.next_interaction(port, method).map(|i| i.output.clone())
}

/// Deserialize a replayed output as `Result<T, String>`.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, String> {
    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        return Err(err_val.as_str().unwrap_or("replayed error").to_string());
    }
    let ok_val = output.get("Ok").or_else(|| output.get("ok")).cloned().unwrap_or(output);
    serde_json::from_value(ok_val).map_err(|e| format!("Malformed replayed output: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replays_ok_err_and_bare_values() {
        assert_eq!(replay_result::<String>(json!({"Ok": "QUJDRA=="})).unwrap(), "QUJDRA==");
        assert_eq!(replay_result::<String>(json!({"Err": "boom"})).unwrap_err(), "boom");
        assert_eq!(replay_result::<String>(json!("bare")).unwrap(), "bare");
        assert!(replay_result::<String>(json!({"Ok": 42})).is_err());
    }
}
