//! Utility functions and helpers

use crate::error::{CurlError, Result};
use serde_json::Value;
use url::form_urlencoded;

/// URL composition utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Collapse any run of leading slashes into exactly one
    pub fn normalize_endpoint(path: &str) -> String {
        format!("/{}", path.trim_start_matches('/'))
    }

    /// Append a normalized endpoint to a base URL without doubling the slash
    pub fn join_endpoint(base: &str, endpoint: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), endpoint)
    }

    /// Attach a query string, continuing an existing query if there is one
    pub fn append_query(base: &str, query: &str) -> String {
        if query.is_empty() {
            return base.to_string();
        }
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{}{}{}", base, separator, query)
    }
}

/// Form (`application/x-www-form-urlencoded`) encoding
pub struct FormUtils;

impl FormUtils {
    /// Percent-encode key/value pairs and join them with `&`
    pub fn encode_pairs<I, K, V>(pairs: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish()
    }

    /// Encode an arbitrary JSON value as a form body.
    ///
    /// Objects and arrays are flattened with bracket keys (`a[b]=1`,
    /// `list[0]=x`), booleans become `1`/`0` and nulls are dropped. A
    /// top-level string is taken to be an already encoded body and is
    /// returned verbatim; other top-level scalars are rendered as text.
    pub fn encode_value(data: &Value) -> String {
        match data {
            Value::Object(_) | Value::Array(_) => {
                let mut pairs = Vec::new();
                flatten(None, data, &mut pairs);
                Self::encode_pairs(pairs)
            }
            Value::String(raw) => raw.clone(),
            Value::Null => String::new(),
            scalar => scalar_text(scalar),
        }
    }
}

fn flatten(prefix: Option<&str>, value: &Value, out: &mut Vec<(String, String)>) {
    let nested_key = |key: &str| match prefix {
        Some(prefix) => format!("{}[{}]", prefix, key),
        None => key.to_string(),
    };

    match value {
        Value::Object(map) => {
            for (key, item) in map {
                flatten(Some(&nested_key(key)), item, out);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(Some(&nested_key(&index.to_string())), item, out);
            }
        }
        Value::Null => {}
        scalar => {
            if let Some(key) = prefix {
                out.push((key.to_string(), scalar_text(scalar)));
            }
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// String utilities
pub struct StringUtils;

impl StringUtils {
    /// Parse timeout values (supports suffixes like 's', 'm', 'h')
    pub fn parse_timeout(input: &str) -> Result<std::time::Duration> {
        if let Ok(seconds) = input.parse::<u64>() {
            return Ok(std::time::Duration::from_secs(seconds));
        }

        let (number_part, suffix) = if let Some(stripped) = input.strip_suffix('s') {
            (stripped, 1)
        } else if let Some(stripped) = input.strip_suffix('m') {
            (stripped, 60)
        } else if let Some(stripped) = input.strip_suffix('h') {
            (stripped, 3600)
        } else {
            return Err(CurlError::Config(format!(
                "Invalid timeout format: '{}'. Use number with optional suffix (s/m/h)",
                input
            )));
        };

        let number: u64 = number_part
            .parse()
            .map_err(|_| CurlError::Config(format!("Invalid timeout number: '{}'", number_part)))?;

        let seconds = number
            .checked_mul(suffix)
            .ok_or_else(|| CurlError::Config(format!("Timeout out of range: '{}'", input)))?;

        Ok(std::time::Duration::from_secs(seconds))
    }

    /// Parse a boolean switch such as `1`, `true`, `off`
    pub fn parse_flag(input: &str) -> Option<bool> {
        match input.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }
}
