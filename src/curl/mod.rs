//! Request builder
//!
//! [`Curl`] layers request semantics over [`SimpleCurl`]: a base URL with an
//! optional endpoint, query arguments, a communication method and body data
//! with a pluggable serializer. On `execute` it derives a default option set
//! from those fields, lets explicitly set options override it, runs the
//! transfer and keeps the transport's metadata and error for inspection.
//!
//! ```no_run
//! use rcurl::Curl;
//! use serde_json::json;
//!
//! # fn main() -> rcurl::Result<()> {
//! let mut curl = Curl::new();
//! curl.set_url("https://api.example.com/")
//!     .set_endpoint("v1/items")
//!     .set_argument("page", 2, false)?
//!     .set_communication_method("POST")?
//!     .set_data(json!({"name": "widget"}))
//!     .execute()?;
//!
//! if let Some(error) = curl.get_error() {
//!     eprintln!("request failed: {}", error);
//! } else {
//!     println!("HTTP {:?}", curl.get_response_code());
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;

use log::{debug, warn};
use serde_json::Value;

use crate::config::{CurlConfig, Method};
use crate::error::{CurlError, Result};
use crate::http::{
    OptionSet, OptionValue, RawResult, ReqwestTransport, TransferInfo, Transport,
    TransportError, TransportOption,
};
use crate::simple::SimpleCurl;
use crate::utils::UrlUtils;

pub mod arguments;
pub mod serializer;

pub use arguments::{ArgumentKey, ArgumentSet, ArgumentValue};
pub use serializer::{serializer_by_name, FormSerializer, JsonSerializer, Serializer};

/// Fluent request builder
pub struct Curl<T: Transport = ReqwestTransport> {
    simple: SimpleCurl<T>,
    config: CurlConfig,
    url: Option<String>,
    endpoint: Option<String>,
    method: Method,
    data: Value,
    serializer: Box<dyn Serializer>,
    arguments: ArgumentSet,
    info: Option<TransferInfo>,
    error: Option<TransportError>,
}

impl Curl<ReqwestTransport> {
    pub fn new() -> Self {
        Self::with_transport(ReqwestTransport)
    }

    pub fn with_config(config: CurlConfig) -> Self {
        let mut curl = Self::new();
        curl.set_config(config);
        curl
    }

    pub fn get(url: &str) -> RawResult {
        Self::request(Method::Get, url, None, None)
    }

    pub fn post(url: &str, data: impl Into<Value>) -> RawResult {
        Self::request(Method::Post, url, Some(data.into()), None)
    }

    pub fn put(url: &str, data: impl Into<Value>) -> RawResult {
        Self::request(Method::Put, url, Some(data.into()), None)
    }

    pub fn delete(url: &str, data: impl Into<Value>) -> RawResult {
        Self::request(Method::Delete, url, Some(data.into()), None)
    }

    /// One-shot request returning only the raw result.
    ///
    /// Any failure, whether in composing the request or in the transfer,
    /// yields [`RawResult::Failed`]; details only reach the log.
    pub fn request(
        method: Method,
        url: &str,
        data: Option<Value>,
        options: Option<OptionSet>,
    ) -> RawResult {
        Self::request_with(ReqwestTransport, method, url, data, options)
    }
}

impl Default for Curl<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Curl<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            simple: SimpleCurl::with_transport(transport),
            config: CurlConfig::default(),
            url: None,
            endpoint: None,
            method: Method::default(),
            data: Value::Null,
            serializer: Box::new(FormSerializer),
            arguments: ArgumentSet::new(),
            info: None,
            error: None,
        }
    }

    /// [`Curl::request`] over an arbitrary transport
    pub fn request_with(
        transport: T,
        method: Method,
        url: &str,
        data: Option<Value>,
        options: Option<OptionSet>,
    ) -> RawResult {
        let mut curl = Self::with_transport(transport);
        curl.set_method(method).set_url(url);
        if let Some(data) = data {
            curl.set_data(data);
        }
        if let Some(options) = options {
            curl.set_options(options);
        }

        if let Err(e) = curl.execute() {
            warn!("{} {} was not sent: {}", method, url, e);
            return RawResult::Failed;
        }
        curl.simple.get_result().cloned().unwrap_or(RawResult::Failed)
    }

    pub fn set_config(&mut self, config: CurlConfig) -> &mut Self {
        self.config = config;
        self
    }

    pub fn get_config(&self) -> &CurlConfig {
        &self.config
    }

    /// Value of an argument that must be present
    pub fn get_argument(&self, name: impl Into<ArgumentKey>) -> Result<&ArgumentValue> {
        let key = name.into();
        self.arguments
            .get(&key)
            .ok_or_else(|| CurlError::MissingArgument(key.to_string()))
    }

    /// Value of an argument, or `default` when it is absent
    pub fn get_argument_or(
        &self,
        name: impl Into<ArgumentKey>,
        default: impl Into<ArgumentValue>,
    ) -> ArgumentValue {
        self.arguments
            .get(&name.into())
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    pub fn get_arguments(&self) -> &ArgumentSet {
        &self.arguments
    }

    /// Store an argument; an existing one is replaced only with `overwrite`
    pub fn set_argument(
        &mut self,
        name: impl Into<ArgumentKey>,
        value: impl Into<ArgumentValue>,
        overwrite: bool,
    ) -> Result<&mut Self> {
        self.arguments.insert(name.into(), value.into(), overwrite)?;
        Ok(self)
    }

    /// Store each argument in turn with the same `overwrite` flag.
    ///
    /// Stops at the first failure; arguments stored before it are kept.
    pub fn set_arguments<I, K, V>(&mut self, arguments: I, overwrite: bool) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ArgumentKey>,
        V: Into<ArgumentValue>,
    {
        for (name, value) in arguments {
            self.set_argument(name, value, overwrite)?;
        }
        Ok(self)
    }

    /// Set the sub-path appended to the base URL, normalized to one leading slash
    pub fn set_endpoint(&mut self, path: &str) -> &mut Self {
        self.endpoint = Some(UrlUtils::normalize_endpoint(path));
        self
    }

    pub fn get_endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = Some(url.into());
        self
    }

    pub fn get_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Final URL: base, endpoint if one was set, then the encoded arguments
    pub fn get_request_url(&self) -> Result<String> {
        let url = self.url.as_deref().ok_or(CurlError::MissingUrl)?;
        let base = match &self.endpoint {
            Some(endpoint) => UrlUtils::join_endpoint(url, endpoint),
            None => url.to_string(),
        };
        Ok(UrlUtils::append_query(&base, &self.arguments.to_query()))
    }

    /// Set the method by name; unknown names leave the current method in place
    pub fn set_communication_method(&mut self, method: &str) -> Result<&mut Self> {
        self.method = method.parse()?;
        Ok(self)
    }

    pub fn set_method(&mut self, method: Method) -> &mut Self {
        self.method = method;
        self
    }

    pub fn get_communication_method(&self) -> Method {
        self.method
    }

    pub fn set_data(&mut self, data: impl Into<Value>) -> &mut Self {
        self.data = data.into();
        self
    }

    pub fn get_data(&self) -> &Value {
        &self.data
    }

    pub fn set_serialize_data_function<S>(&mut self, serializer: S) -> &mut Self
    where
        S: Serializer + 'static,
    {
        self.serializer = Box::new(serializer);
        self
    }

    /// Select a built-in serializer; an unknown name leaves the current one
    pub fn set_serializer_by_name(&mut self, name: &str) -> Result<&mut Self> {
        self.serializer = serializer_by_name(name)?;
        Ok(self)
    }

    /// Body data run through the configured serializer
    pub fn serialize_data(&self) -> Result<String> {
        self.serializer.serialize(&self.data)
    }

    pub fn set_option(&mut self, key: TransportOption, value: impl Into<OptionValue>) -> &mut Self {
        self.simple.set_option(key, value);
        self
    }

    pub fn set_options<I>(&mut self, options: I) -> &mut Self
    where
        I: IntoIterator<Item = (TransportOption, OptionValue)>,
    {
        self.simple.set_options(options);
        self
    }

    pub fn get_option(&self, key: TransportOption, default: impl Into<OptionValue>) -> OptionValue {
        self.simple.get_option(key, default)
    }

    /// Options set explicitly by the caller
    pub fn get_options(&self) -> &OptionSet {
        self.simple.get_options()
    }

    /// Option set derived from the builder's fields and configuration
    pub fn get_default_options(&self) -> Result<OptionSet> {
        let mut options = OptionSet::new();
        options
            .set(
                TransportOption::ConnectTimeout,
                seconds(self.config.connect_timeout),
            )
            .set(TransportOption::Timeout, seconds(self.config.timeout))
            .set(TransportOption::ReturnTransfer, self.config.return_transfer)
            .set(TransportOption::CustomRequest, self.method.as_str())
            .set(TransportOption::Post, self.method.sends_body())
            .set(TransportOption::Url, self.get_request_url()?);

        if self.config.follow_location {
            options.set(TransportOption::FollowLocation, true);
        }
        if let Some(user_agent) = &self.config.user_agent {
            options.set(TransportOption::UserAgent, user_agent.as_str());
        }
        if self.method.sends_body() {
            options
                .set(TransportOption::PostFields, self.serialize_data()?)
                .set(TransportOption::ContentType, self.serializer.content_type());
        }

        Ok(options)
    }

    /// Options actually applied: defaults overridden by explicit options
    pub fn get_request_options(&self) -> Result<OptionSet> {
        Ok(self.get_default_options()?.merged(self.simple.get_options()))
    }

    /// Run the request once.
    ///
    /// Returns an error only when the request cannot be composed. A failed
    /// transfer still returns `Ok`; its code and message are available from
    /// [`Curl::get_error`].
    pub fn execute(&mut self) -> Result<&mut Self> {
        self.info = None;
        self.error = None;

        let options = self.get_request_options()?;
        debug!(
            "{} {} with {} options",
            self.method,
            options
                .get(TransportOption::Url)
                .map(OptionValue::as_text)
                .unwrap_or_default(),
            options.len()
        );
        self.simple.execute_with(&options);

        if let Some(transfer) = self.simple.get_transfer() {
            self.info = Some(transfer.info.clone());
            self.error = transfer.error();
        }
        if let Some(error) = &self.error {
            debug!("{} {} failed: {}", self.method, self.get_url().unwrap_or_default(), error);
        }
        Ok(self)
    }

    /// Raw result of the last execution; `None` before the first one
    pub fn get_result(&self) -> Option<&RawResult> {
        self.simple.get_result()
    }

    pub fn get_info(&self) -> Option<&TransferInfo> {
        self.info.as_ref()
    }

    /// Transport failure of the last execution, if any
    pub fn get_error(&self) -> Option<&TransportError> {
        self.error.as_ref()
    }

    pub fn get_response_code(&self) -> Option<u16> {
        self.info.as_ref().map(|info| info.http_code)
    }
}

impl<T: Transport + fmt::Debug> fmt::Debug for Curl<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curl")
            .field("simple", &self.simple)
            .field("config", &self.config)
            .field("url", &self.url)
            .field("endpoint", &self.endpoint)
            .field("method", &self.method)
            .field("data", &self.data)
            .field("arguments", &self.arguments)
            .field("info", &self.info)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Whole seconds, rounded up so a sub-second limit never reads as "no limit"
fn seconds(duration: std::time::Duration) -> i64 {
    let whole = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
    i64::try_from(whole).unwrap_or(i64::MAX)
}
