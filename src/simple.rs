//! Transport wrapper
//!
//! [`SimpleCurl`] is a thin pass-through over a [`Transport`]: it keeps a
//! set of raw options, runs one transfer on demand and remembers what came
//! back. It does not validate options or interpret results.

use log::debug;

use crate::http::{
    OptionSet, OptionValue, RawResult, ReqwestTransport, Transfer, Transport, TransportHandle,
    TransportOption,
};

/// Owns raw transport options and the outcome of the last transfer
#[derive(Debug)]
pub struct SimpleCurl<T: Transport = ReqwestTransport> {
    transport: T,
    options: OptionSet,
    transfer: Option<Transfer>,
}

impl SimpleCurl<ReqwestTransport> {
    pub fn new() -> Self {
        Self::with_transport(ReqwestTransport)
    }
}

impl Default for SimpleCurl<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> SimpleCurl<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            options: OptionSet::new(),
            transfer: None,
        }
    }

    pub fn set_option(&mut self, key: TransportOption, value: impl Into<OptionValue>) -> &mut Self {
        self.options.set(key, value);
        self
    }

    /// Apply every entry in iteration order
    pub fn set_options<I>(&mut self, options: I) -> &mut Self
    where
        I: IntoIterator<Item = (TransportOption, OptionValue)>,
    {
        for (key, value) in options {
            self.set_option(key, value);
        }
        self
    }

    /// Stored value for `key`, or `default` when it was never set
    pub fn get_option(&self, key: TransportOption, default: impl Into<OptionValue>) -> OptionValue {
        self.options
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    pub fn get_options(&self) -> &OptionSet {
        &self.options
    }

    pub fn get_url(&self) -> Option<&str> {
        self.options
            .get(TransportOption::Url)
            .and_then(OptionValue::as_str)
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.set_option(TransportOption::Url, url.into())
    }

    /// Run one transfer with the stored options
    pub fn execute(&mut self) -> &mut Self {
        let options = self.options.clone();
        self.execute_with(&options)
    }

    /// Run one transfer with `options` applied in a single batch.
    ///
    /// A fresh handle is opened for every call and closed before returning,
    /// so repeated execution never touches a closed handle.
    pub fn execute_with(&mut self, options: &OptionSet) -> &mut Self {
        let url = options.get(TransportOption::Url).map(OptionValue::as_text);
        let mut handle = self.transport.init(url.as_deref());
        handle.set_options(options);

        let result = handle.perform();
        let transfer = Transfer {
            result,
            info: handle.info(),
            error_code: handle.error_code(),
            error_message: handle.error_message(),
        };
        handle.close();

        debug!(
            "Transfer finished: http_code={} error_code={}",
            transfer.info.http_code, transfer.error_code
        );
        self.transfer = Some(transfer);
        self
    }

    /// Raw result of the last transfer; `None` before the first one
    pub fn get_result(&self) -> Option<&RawResult> {
        self.transfer.as_ref().map(|transfer| &transfer.result)
    }

    pub fn get_transfer(&self) -> Option<&Transfer> {
        self.transfer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::scripted::ScriptedTransport;

    #[test]
    fn options_are_stored_and_overwritten() {
        let mut simple = SimpleCurl::with_transport(ScriptedTransport::default());
        simple
            .set_option(TransportOption::Timeout, 10)
            .set_option(TransportOption::Timeout, 20);

        assert_eq!(
            simple.get_option(TransportOption::Timeout, 0),
            OptionValue::Integer(20)
        );
        assert_eq!(
            simple.get_option(TransportOption::Port, 80),
            OptionValue::Integer(80)
        );
    }

    #[test]
    fn set_options_applies_each_entry() {
        let mut simple = SimpleCurl::with_transport(ScriptedTransport::default());
        simple.set_options(vec![
            (TransportOption::Url, OptionValue::from("http://a.test")),
            (TransportOption::Post, OptionValue::from(true)),
        ]);

        assert_eq!(simple.get_options().len(), 2);
        assert_eq!(simple.get_url(), Some("http://a.test"));
    }

    #[test]
    fn url_accessors_alias_the_url_option() {
        let mut simple = SimpleCurl::with_transport(ScriptedTransport::default());
        assert_eq!(simple.get_url(), None);
        simple.set_url("http://b.test");
        assert_eq!(
            simple.get_option(TransportOption::Url, ""),
            OptionValue::from("http://b.test")
        );
    }

    #[test]
    fn result_is_empty_before_execute() {
        let simple = SimpleCurl::with_transport(ScriptedTransport::default());
        assert!(simple.get_result().is_none());
        assert!(simple.get_transfer().is_none());
    }

    #[test]
    fn execute_captures_result_and_closes_handle() {
        let transport = ScriptedTransport::respond(200, "hello");
        let mut simple = SimpleCurl::with_transport(transport.clone());
        simple.set_url("http://c.test").execute();

        assert_eq!(simple.get_result(), Some(&RawResult::Body("hello".to_string())));
        assert_eq!(transport.opened(), 1);
        assert_eq!(transport.closed(), 1);
        assert_eq!(transport.applied()[0], *simple.get_options());
    }

    #[test]
    fn each_execute_uses_a_fresh_handle() {
        let transport = ScriptedTransport::respond(200, "one").then_fail(7, "refused");
        let mut simple = SimpleCurl::with_transport(transport.clone());
        simple.set_url("http://d.test");

        simple.execute();
        assert_eq!(simple.get_result(), Some(&RawResult::Body("one".to_string())));

        simple.execute();
        assert_eq!(simple.get_result(), Some(&RawResult::Failed));
        let error = simple.get_transfer().and_then(Transfer::error).expect("error");
        assert_eq!(error.code, 7);

        assert_eq!(transport.opened(), 2);
        assert_eq!(transport.closed(), 2);
    }

    #[test]
    fn execute_with_leaves_stored_options_alone() {
        let transport = ScriptedTransport::default();
        let mut simple = SimpleCurl::with_transport(transport.clone());
        simple.set_option(TransportOption::Timeout, 1);

        let batch = OptionSet::new().with(TransportOption::Url, "http://e.test");
        simple.execute_with(&batch);

        assert_eq!(transport.applied(), vec![batch]);
        assert!(!simple.get_options().contains(TransportOption::Url));
    }
}
