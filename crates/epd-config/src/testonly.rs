//! Test-only helpers.

use crate::source::{Json, RawDocument};

/// Minimal valid config: all required fields plus the API key required by the default weather provider.
pub(crate) fn sample_json() -> serde_json::Value {
    serde_json::json!({
        "locale": "en_US",
        "wifiSSID": "home",
        "wifiPassword": "hunter2",
        "owmApikey": "0123456789abcdef",
        "latitude": "58.3806",
        "longitude": "26.7251",
        "city": "Tartu",
        "timezone": "EET-2EEST,M3.5.0/3,M10.5.0/4",
        "dateFormat": "%a, %B %e",
    })
}

/// Creates a raw document from a JSON object.
pub(crate) fn document(json: serde_json::Value) -> RawDocument {
    let serde_json::Value::Object(object) = json else {
        panic!("expected an object, got {json:?}");
    };
    RawDocument::new().with(Json::new("test.json", object))
}

/// Creates a raw document from the sample config with the specified overrides.
/// `null` values in `overrides` remove the corresponding key.
pub(crate) fn sample_with(overrides: serde_json::Value) -> RawDocument {
    let mut json = sample_json();
    let (serde_json::Value::Object(base), serde_json::Value::Object(overrides)) =
        (&mut json, overrides)
    else {
        panic!("expected objects");
    };
    for (key, value) in overrides {
        if value.is_null() {
            base.remove(&key);
        } else {
            base.insert(key, value);
        }
    }
    document(json)
}
