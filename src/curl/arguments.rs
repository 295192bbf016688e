//! Query-string arguments

use std::fmt;

use crate::error::{CurlError, Result};
use crate::utils::FormUtils;

/// Argument name; either a string or an integer index.
///
/// Canonical decimal strings such as `"7"` become [`ArgumentKey::Index`], so
/// `"7"` and `7` name the same argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgumentKey {
    Name(String),
    Index(i64),
}

impl ArgumentKey {
    fn parse(name: &str) -> Self {
        match name.parse::<i64>() {
            Ok(index) if index.to_string() == name => ArgumentKey::Index(index),
            _ => ArgumentKey::Name(name.to_string()),
        }
    }
}

impl fmt::Display for ArgumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentKey::Name(name) => write!(f, "{}", name),
            ArgumentKey::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for ArgumentKey {
    fn from(name: &str) -> Self {
        ArgumentKey::parse(name)
    }
}

impl From<String> for ArgumentKey {
    fn from(name: String) -> Self {
        ArgumentKey::parse(&name)
    }
}

impl From<i64> for ArgumentKey {
    fn from(index: i64) -> Self {
        ArgumentKey::Index(index)
    }
}

impl From<i32> for ArgumentKey {
    fn from(index: i32) -> Self {
        ArgumentKey::Index(i64::from(index))
    }
}

/// Argument value; either a string or an integer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgumentValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentValue::Text(text) => write!(f, "{}", text),
            ArgumentValue::Integer(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for ArgumentValue {
    fn from(text: &str) -> Self {
        ArgumentValue::Text(text.to_string())
    }
}

impl From<String> for ArgumentValue {
    fn from(text: String) -> Self {
        ArgumentValue::Text(text)
    }
}

impl From<i64> for ArgumentValue {
    fn from(value: i64) -> Self {
        ArgumentValue::Integer(value)
    }
}

impl From<i32> for ArgumentValue {
    fn from(value: i32) -> Self {
        ArgumentValue::Integer(i64::from(value))
    }
}

/// Query arguments, kept in insertion order so encoding is reproducible
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentSet {
    entries: Vec<(ArgumentKey, ArgumentValue)>,
}

impl ArgumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ArgumentKey) -> Option<&ArgumentValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, key: &ArgumentKey) -> bool {
        self.get(key).is_some()
    }

    /// Store a value; an existing key is replaced in place only when
    /// `overwrite` is set
    pub fn insert(&mut self, key: ArgumentKey, value: ArgumentValue, overwrite: bool) -> Result<()> {
        match self.entries.iter().position(|(existing, _)| *existing == key) {
            Some(_) if !overwrite => Err(CurlError::ArgumentAlreadySet(key.to_string())),
            Some(index) => {
                self.entries[index].1 = value;
                Ok(())
            }
            None => {
                self.entries.push((key, value));
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArgumentKey, &ArgumentValue)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    /// `key=value` pairs, percent-encoded and joined with `&`
    pub fn to_query(&self) -> String {
        FormUtils::encode_pairs(
            self.entries
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_names_share_a_key_with_integers() {
        assert_eq!(ArgumentKey::from("7"), ArgumentKey::Index(7));
        assert_eq!(ArgumentKey::from("-3"), ArgumentKey::Index(-3));
        assert_eq!(ArgumentKey::from("07"), ArgumentKey::Name("07".to_string()));
        assert_eq!(ArgumentKey::from("a1"), ArgumentKey::Name("a1".to_string()));
    }

    #[test]
    fn insert_refuses_duplicates_without_overwrite() {
        let mut arguments = ArgumentSet::new();
        arguments
            .insert("a".into(), 1.into(), false)
            .expect("first insert");

        let err = arguments
            .insert("a".into(), 2.into(), false)
            .expect_err("duplicate");
        assert!(matches!(err, CurlError::ArgumentAlreadySet(name) if name == "a"));
        assert_eq!(arguments.get(&"a".into()), Some(&ArgumentValue::Integer(1)));

        arguments
            .insert("a".into(), 3.into(), true)
            .expect("overwrite");
        assert_eq!(arguments.get(&"a".into()), Some(&ArgumentValue::Integer(3)));
        assert_eq!(arguments.len(), 1);
    }

    #[test]
    fn query_keeps_insertion_order_and_encodes() {
        let mut arguments = ArgumentSet::new();
        arguments.insert("z".into(), "last word".into(), false).expect("z");
        arguments.insert(0.into(), "a&b".into(), false).expect("0");

        assert_eq!(arguments.to_query(), "z=last+word&0=a%26b");
        assert_eq!(ArgumentSet::new().to_query(), "");
    }
}
