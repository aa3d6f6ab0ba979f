//! Adapters for emitting redacted values through `slog`.
//!
//! This module connects the redaction engine with `slog` by providing
//! `slog::Value` implementations that serialize redacted outputs as structured
//! JSON via `slog`'s nested-value support.
//!
//! It is responsible for:
//! - Ensuring a logged value has been through the engine first, with the
//!   caller's predicate, rather than logging the original.
//! - Avoiding fallible logging APIs: redaction and serialization failures are
//!   represented as placeholder strings rather than propagated as errors.

use serde::Serialize;
use serde_json::Value as JsonValue;
use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{
    boundary::Redact,
    capability::CapabilityPredicate,
    engine::{Redactable, Traverse},
};

/// Placeholder emitted for a withheld [`Redactable`].
pub const WITHHELD_PLACEHOLDER: &str = "[WITHHELD]";

const REDACTION_FAILED: &str = "Failed to redact value";
const SERIALIZATION_FAILED: &str = "Failed to serialize redacted value";

/// A `slog::Value` that emits an owned redacted payload as structured JSON.
pub struct RedactedJson {
    value: JsonValue,
}

impl RedactedJson {
    fn new(value: JsonValue) -> Self {
        Self { value }
    }

    /// The JSON that will be logged.
    pub fn as_json(&self) -> &JsonValue {
        &self.value
    }
}

impl SlogValue for RedactedJson {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.value.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// Converts values into a `slog::Value` that logs their redacted form as JSON.
///
/// Calling `into_redacted_json` consumes the value, redacts it with
/// `predicate`, and stores the result as a `serde_json::Value`. The original
/// value is never serialized.
///
/// ## Example
/// ```ignore
/// use redactor::json::IntoRedactedJson;
///
/// info!(logger, "user loaded"; "user" => user.into_redacted_json(&grants));
/// ```
pub trait IntoRedactedJson: Traverse + Serialize + Sized {
    /// Redacts `self` and returns a `slog::Value` that serializes as structured JSON.
    ///
    /// If the value's field table is misconfigured, the returned value stores
    /// the JSON string `"Failed to redact value"`. If serialization fails, it
    /// stores `"Failed to serialize redacted value"`.
    fn into_redacted_json(self, predicate: &dyn CapabilityPredicate) -> RedactedJson {
        let json_value = match self.redacted_with(predicate) {
            Ok(redacted) => serde_json::to_value(redacted)
                .unwrap_or_else(|_| JsonValue::String(SERIALIZATION_FAILED.to_string())),
            Err(_) => JsonValue::String(REDACTION_FAILED.to_string()),
        };
        RedactedJson::new(json_value)
    }
}

impl<T> IntoRedactedJson for T where T: Traverse + Serialize {}

/// Logs the wrapped value as nested JSON, or [`WITHHELD_PLACEHOLDER`] once
/// withheld.
impl<T> SlogValue for Redactable<T>
where
    T: Serialize,
{
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        match self.value() {
            Some(value) => {
                let json_value = serde_json::to_value(value)
                    .unwrap_or_else(|_| JsonValue::String(SERIALIZATION_FAILED.to_string()));
                SlogValue::serialize(&slog::Serde(json_value), record, key, serializer)
            }
            None => serializer.emit_str(key, WITHHELD_PLACEHOLDER),
        }
    }
}
