//! Integration tests for the `json` feature.
//!
//! These tests verify that:
//! - `Redactable` serializes as `{ value, withheld }`
//! - `into_redacted_json()` redacts before serializing
//! - `Redactable` values logged directly never leak a withheld payload

#![cfg(feature = "json")]

use std::{cell::RefCell, collections::HashMap, fmt::Arguments};

use redactor::{
    json::{IntoRedactedJson, WITHHELD_PLACEHOLDER},
    AllowAll, CapabilitySet, DenyAll, Redact, Redactable,
};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

#[derive(Clone, Redact, Serialize)]
struct User {
    name: String,
    #[redact("user:password:read")]
    password: Redactable<String>,
    #[redact("user:email:read")]
    email: Redactable<String>,
}

fn user() -> User {
    User {
        name: "John Doe".into(),
        password: Redactable::new("catsaredumb".into()),
        email: Redactable::new("johndoe@acme.com".into()),
    }
}

// A test serializer that captures serialized key-value pairs
struct CapturingSerializer {
    captured: RefCell<HashMap<String, CapturedValue>>,
}

#[derive(Debug, Clone, PartialEq)]
enum CapturedValue {
    Str(String),
    Serde(JsonValue),
}

impl CapturingSerializer {
    fn new() -> Self {
        Self {
            captured: RefCell::new(HashMap::new()),
        }
    }

    fn get(&self, key: &str) -> Option<CapturedValue> {
        self.captured.borrow().get(key).cloned()
    }
}

impl slog::Serializer for CapturingSerializer {
    fn emit_arguments(&mut self, key: slog::Key, val: &Arguments<'_>) -> slog::Result {
        self.captured
            .borrow_mut()
            .insert(key.into(), CapturedValue::Str(val.to_string()));
        Ok(())
    }

    fn emit_serde(&mut self, key: slog::Key, val: &dyn slog::SerdeValue) -> slog::Result {
        let json = serde_json::to_value(val.as_serde()).unwrap_or(JsonValue::Null);
        self.captured
            .borrow_mut()
            .insert(key.into(), CapturedValue::Serde(json));
        Ok(())
    }
}

fn serialize_to_capture<V: slog::Value>(
    value: &V,
    key: &'static str,
    serializer: &mut CapturingSerializer,
) {
    static RS: slog::RecordStatic<'static> = slog::record_static!(slog::Level::Info, "");
    let args = format_args!("");
    let record = slog::Record::new(&RS, &args, slog::b!());
    value.serialize(&record, key, serializer).unwrap();
}

#[test]
fn redactable_serializes_value_and_flag() {
    let present = Redactable::new(42_u32);
    assert_eq!(
        serde_json::to_value(&present).unwrap(),
        json!({ "value": 42, "withheld": false })
    );

    let withheld: Redactable<u32> = Redactable::withheld();
    assert_eq!(
        serde_json::to_value(&withheld).unwrap(),
        json!({ "value": null, "withheld": true })
    );
}

#[test]
fn present_none_is_distinguishable_from_withheld() {
    let present_none: Redactable<Option<u32>> = Redactable::new(None);
    assert_eq!(
        serde_json::to_value(&present_none).unwrap(),
        json!({ "value": null, "withheld": false })
    );
}

#[test]
fn redacted_user_serializes_without_payload() {
    let user = user().redacted_with(&DenyAll).unwrap();
    let json = serde_json::to_value(&user).unwrap();

    assert_eq!(json["name"], "John Doe");
    assert_eq!(json["password"], json!({ "value": null, "withheld": true }));
    assert!(!json.to_string().contains("catsaredumb"));
}

#[test]
fn into_redacted_json_applies_predicate() {
    let grants: CapabilitySet = ["user:email:read"].into_iter().collect();
    let redacted = user().into_redacted_json(&grants);

    let json = redacted.as_json();
    assert_eq!(json["email"]["value"], "johndoe@acme.com");
    assert_eq!(json["password"]["withheld"], true);
}

#[test]
fn into_redacted_json_logs_as_nested_json() {
    let redacted = user().into_redacted_json(&DenyAll);

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&redacted, "user", &mut serializer);

    if let Some(CapturedValue::Serde(json)) = serializer.get("user") {
        assert_eq!(json["name"], "John Doe");
        assert_eq!(json["email"]["withheld"], true);
    } else {
        panic!("Expected Serde value for 'user' key");
    }
}

#[test]
fn withheld_redactable_logs_placeholder() {
    let mut password = Redactable::new(String::from("catsaredumb"));
    password.withhold();

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&password, "password", &mut serializer);

    assert_eq!(
        serializer.get("password"),
        Some(CapturedValue::Str(WITHHELD_PLACEHOLDER.to_string()))
    );
}

#[test]
fn visible_redactable_logs_its_value() {
    let user = user().redacted_with(&AllowAll).unwrap();

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&user.email, "email", &mut serializer);

    assert_eq!(
        serializer.get("email"),
        Some(CapturedValue::Serde(json!("johndoe@acme.com")))
    );
}
