//! Low-level transport options
//!
//! An [`OptionSet`] is the complete configuration applied to a transport
//! handle in one batch. Values are stored as given; interpretation happens
//! in the handle, which coerces leniently and ignores what it cannot use.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use crate::utils::StringUtils;

/// Option keys understood by transport handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransportOption {
    /// Seconds allowed for the connection phase (0 = no limit)
    ConnectTimeout,
    /// Seconds allowed for the whole transfer (0 = no limit)
    Timeout,
    /// Hand the body back as the result instead of writing it to stdout
    ReturnTransfer,
    /// Verbatim request method
    CustomRequest,
    Url,
    /// Issue a POST when no custom method is given
    Post,
    /// Request body
    PostFields,
    /// Overrides the port of the target URL
    Port,
    FollowLocation,
    UserAgent,
    /// Content type announced for the request body
    ContentType,
}

impl TransportOption {
    pub fn name(&self) -> &'static str {
        match self {
            TransportOption::ConnectTimeout => "CONNECTTIMEOUT",
            TransportOption::Timeout => "TIMEOUT",
            TransportOption::ReturnTransfer => "RETURNTRANSFER",
            TransportOption::CustomRequest => "CUSTOMREQUEST",
            TransportOption::Url => "URL",
            TransportOption::Post => "POST",
            TransportOption::PostFields => "POSTFIELDS",
            TransportOption::Port => "PORT",
            TransportOption::FollowLocation => "FOLLOWLOCATION",
            TransportOption::UserAgent => "USERAGENT",
            TransportOption::ContentType => "CONTENTTYPE",
        }
    }
}

impl fmt::Display for TransportOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Value stored for a transport option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(value) => Some(*value),
            OptionValue::Integer(value) => Some(*value != 0),
            OptionValue::Text(value) => StringUtils::parse_flag(value.trim()),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            OptionValue::Bool(value) => Some(i64::from(*value)),
            OptionValue::Integer(value) => Some(*value),
            OptionValue::Text(value) => value.trim().parse().ok(),
        }
    }

    /// Borrow the value if it is stored as text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Render the value as text, the way it would be sent on the wire
    pub fn as_text(&self) -> String {
        match self {
            OptionValue::Bool(true) => "1".to_string(),
            OptionValue::Bool(false) => String::new(),
            OptionValue::Integer(value) => value.to_string(),
            OptionValue::Text(value) => value.clone(),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Integer(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Integer(i64::from(value))
    }
}

impl From<u16> for OptionValue {
    fn from(value: u16) -> Self {
        OptionValue::Integer(i64::from(value))
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        OptionValue::Integer(i64::from(value))
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

/// Mapping from option key to value, one entry per key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    entries: BTreeMap<TransportOption, OptionValue>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous value for the key
    pub fn set(&mut self, key: TransportOption, value: impl Into<OptionValue>) -> &mut Self {
        self.entries.insert(key, value.into());
        self
    }

    /// Builder-style variant of [`OptionSet::set`]
    pub fn with(mut self, key: TransportOption, value: impl Into<OptionValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: TransportOption) -> Option<&OptionValue> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: TransportOption) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, TransportOption, OptionValue> {
        self.entries.iter()
    }

    /// Combine two sets; entries of `overrides` win on key collision
    pub fn merged(&self, overrides: &OptionSet) -> OptionSet {
        let mut entries = self.entries.clone();
        entries.extend(
            overrides
                .entries
                .iter()
                .map(|(key, value)| (*key, value.clone())),
        );
        OptionSet { entries }
    }
}

impl FromIterator<(TransportOption, OptionValue)> for OptionSet {
    fn from_iter<I: IntoIterator<Item = (TransportOption, OptionValue)>>(iter: I) -> Self {
        OptionSet {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(TransportOption, OptionValue)> for OptionSet {
    fn extend<I: IntoIterator<Item = (TransportOption, OptionValue)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl IntoIterator for OptionSet {
    type Item = (TransportOption, OptionValue);
    type IntoIter = btree_map::IntoIter<TransportOption, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a OptionSet {
    type Item = (&'a TransportOption, &'a OptionValue);
    type IntoIter = btree_map::Iter<'a, TransportOption, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_prefers_overrides() {
        let defaults = OptionSet::new()
            .with(TransportOption::Timeout, 30)
            .with(TransportOption::ReturnTransfer, true);
        let explicit = OptionSet::new()
            .with(TransportOption::Timeout, 5)
            .with(TransportOption::Port, 8080);

        let merged = defaults.merged(&explicit);
        assert_eq!(merged.len(), 3);
        assert_eq!(
            merged.get(TransportOption::Timeout),
            Some(&OptionValue::Integer(5))
        );
        assert_eq!(
            merged.get(TransportOption::ReturnTransfer),
            Some(&OptionValue::Bool(true))
        );
        assert_eq!(
            merged.get(TransportOption::Port),
            Some(&OptionValue::Integer(8080))
        );
    }

    #[test]
    fn set_replaces_existing_value() {
        let mut options = OptionSet::new();
        options.set(TransportOption::Url, "http://a");
        options.set(TransportOption::Url, "http://b");
        assert_eq!(options.len(), 1);
        assert_eq!(
            options.get(TransportOption::Url).and_then(OptionValue::as_str),
            Some("http://b")
        );
    }

    #[test]
    fn values_coerce_leniently() {
        assert_eq!(OptionValue::from(1).as_bool(), Some(true));
        assert_eq!(OptionValue::from("off").as_bool(), Some(false));
        assert_eq!(OptionValue::from(" 15 ").as_integer(), Some(15));
        assert_eq!(OptionValue::from(true).as_integer(), Some(1));
        assert_eq!(OptionValue::from("abc").as_integer(), None);
        assert_eq!(OptionValue::from(false).as_text(), "");
        assert_eq!(OptionValue::from(42).as_text(), "42");
        assert_eq!(OptionValue::from(42).as_str(), None);
    }
}
