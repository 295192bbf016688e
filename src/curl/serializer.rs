//! Body serializers

use serde_json::Value;

use crate::error::{CurlError, Result};
use crate::http::FORM_CONTENT_TYPE;
use crate::utils::FormUtils;

/// Turns body data into the string sent on the wire
pub trait Serializer: Send + Sync {
    fn serialize(&self, data: &Value) -> Result<String>;

    /// Content type announced alongside the serialized body
    fn content_type(&self) -> &str {
        FORM_CONTENT_TYPE
    }
}

impl<F> Serializer for F
where
    F: Fn(&Value) -> Result<String> + Send + Sync,
{
    fn serialize(&self, data: &Value) -> Result<String> {
        self(data)
    }
}

/// URL-encoded form body; the default
#[derive(Debug, Clone, Copy, Default)]
pub struct FormSerializer;

impl Serializer for FormSerializer {
    fn serialize(&self, data: &Value) -> Result<String> {
        Ok(FormUtils::encode_value(data))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, data: &Value) -> Result<String> {
        Ok(serde_json::to_string(data)?)
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}

/// Look up a built-in serializer by name (`form` or `json`)
pub fn serializer_by_name(name: &str) -> Result<Box<dyn Serializer>> {
    match name.to_ascii_lowercase().as_str() {
        "form" => Ok(Box::new(FormSerializer)),
        "json" => Ok(Box::new(JsonSerializer)),
        _ => Err(CurlError::InvalidSerializer(name.to_string())),
    }
}
