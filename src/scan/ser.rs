//! Serialize and deserialize data into JSON format.

use crate::{Error, err::error};

/// The object can be serialized and deserialized into JSON.
pub trait JsonSer: Sized {
    fn save(&self) -> json::JsonValue;

    fn load(obj: &json::JsonValue) -> Result<Self, Error>;
}

/// Extracts float value from the JSON object.
pub fn get_f64(obj: &json::JsonValue, key: &str) -> Result<f64, Error> {
    obj[key].as_f64().ok_or_else(|| error!(JsonLoad, "Failed to parse '{}': missing or incorrect float '{}'", obj, key))
}

/// Extracts u32 value from the JSON object.
pub fn get_u32(obj: &json::JsonValue, key: &str) -> Result<u32, Error> {
    obj[key].as_u32().ok_or_else(|| error!(JsonLoad, "Failed to parse '{}': missing or incorrect integer '{}'", obj, key))
}

/// Extracts usize value from the JSON object.
pub fn get_usize(obj: &json::JsonValue, key: &str) -> Result<usize, Error> {
    obj[key].as_usize().ok_or_else(|| error!(JsonLoad, "Failed to parse '{}': missing or incorrect integer '{}'", obj, key))
}

/// Extracts optional u32 value from the JSON object (missing or null values are None).
pub fn get_opt_u32(obj: &json::JsonValue, key: &str) -> Result<Option<u32>, Error> {
    if obj[key].is_null() {
        Ok(None)
    } else {
        get_u32(obj, key).map(Some)
    }
}

/// Extracts boolean value from the JSON object.
pub fn get_bool(obj: &json::JsonValue, key: &str) -> Result<bool, Error> {
    obj[key].as_bool().ok_or_else(|| error!(JsonLoad, "Failed to parse '{}': missing or incorrect boolean '{}'", obj, key))
}

/// Converts optional value into JSON, None is converted into null.
pub fn opt_to_json<T: Into<json::JsonValue>>(val: Option<T>) -> json::JsonValue {
    match val {
        Some(v) => v.into(),
        None => json::JsonValue::Null,
    }
}
