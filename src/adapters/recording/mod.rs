//! Recording adapters that capture interactions to cassettes.

pub mod thumbnail_service;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Record a `Result<T, E>` interaction using the Ok/Err JSON convention.
///
/// Values that cannot be serialized are logged and skipped; recording never
/// changes the result handed back to the caller.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let serialized = serde_json::to_value(input).and_then(|input_json| {
        let output_json = match result {
            Ok(v) => {
                let inner = serde_json::to_value(v)?;
                serde_json::json!({ "Ok": inner })
            }
            Err(e) => serde_json::json!({ "Err": e.to_string() }),
        };
        Ok((input_json, output_json))
    });

    match serialized {
        Ok((input_json, output_json)) => {
            let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
            guard.record(port, method, input_json, output_json);
        }
        Err(e) => tracing::warn!(port, method, error = %e, "Skipping unrecordable interaction"),
    }
}
