//! HTTP transport module
//!
//! This module defines the transport primitive the request builders sit on:
//! a handle that takes one batch of options, performs one blocking transfer
//! and then reports a raw result, transfer metadata and a numeric error code.
//! [`ReqwestTransport`] is the default implementation.

use std::io::Write;
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::Method;
use url::Url;

pub mod error_code;
pub mod options;
pub mod response;
#[cfg(test)]
pub(crate) mod scripted;

pub use options::{OptionSet, OptionValue, TransportOption};
pub use response::{RawResult, Transfer, TransferInfo, TransportError};

/// Content type sent with a body when no other is configured
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

const MAX_REDIRECTS: usize = 20;

/// Factory for transport handles
pub trait Transport {
    type Handle: TransportHandle;

    /// Open a handle, optionally bound to a URL
    fn init(&self, url: Option<&str>) -> Self::Handle;
}

/// One request cycle against the underlying HTTP client.
///
/// A handle is configured, performed once and closed. `close` consumes the
/// handle so it cannot be used afterwards.
pub trait TransportHandle {
    /// Apply a batch of options; later batches overwrite earlier keys
    fn set_options(&mut self, options: &OptionSet);

    /// Run the transfer, blocking until it completes or fails
    fn perform(&mut self) -> RawResult;

    fn info(&self) -> TransferInfo;

    /// 0 on success
    fn error_code(&self) -> u32;

    fn error_message(&self) -> String;

    fn close(self)
    where
        Self: Sized,
    {
    }
}

/// Blocking transport backed by `reqwest`
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransport;

impl Transport for ReqwestTransport {
    type Handle = ReqwestHandle;

    fn init(&self, url: Option<&str>) -> ReqwestHandle {
        let mut options = OptionSet::new();
        if let Some(url) = url {
            options.set(TransportOption::Url, url);
        }
        ReqwestHandle {
            options,
            info: TransferInfo::default(),
            error: None,
        }
    }
}

/// Handle for a single `reqwest` transfer; builds its own client
#[derive(Debug)]
pub struct ReqwestHandle {
    options: OptionSet,
    info: TransferInfo,
    error: Option<TransportError>,
}

impl TransportHandle for ReqwestHandle {
    fn set_options(&mut self, options: &OptionSet) {
        self.options
            .extend(options.iter().map(|(key, value)| (*key, value.clone())));
    }

    fn perform(&mut self) -> RawResult {
        let started = std::time::Instant::now();
        let outcome = self.send();
        self.info.total_time = started.elapsed().as_secs_f64();

        match outcome {
            Ok(result) => {
                self.error = None;
                result
            }
            Err(error) => {
                warn!(
                    "Transfer to '{}' failed ({}): {}",
                    self.info.url,
                    error_code::describe(error.code),
                    error.message
                );
                self.error = Some(error);
                RawResult::Failed
            }
        }
    }

    fn info(&self) -> TransferInfo {
        self.info.clone()
    }

    fn error_code(&self) -> u32 {
        self.error
            .as_ref()
            .map(|error| error.code)
            .unwrap_or(error_code::OK)
    }

    fn error_message(&self) -> String {
        self.error
            .as_ref()
            .map(|error| error.message.clone())
            .unwrap_or_default()
    }
}

impl ReqwestHandle {
    fn send(&mut self) -> Result<RawResult, TransportError> {
        let url = self.target_url()?;
        self.info.url = url.to_string();

        let client = self.build_client()?;
        let method = self.method()?;
        debug!("> {} {}", method, url);

        let mut request = client.request(method, url);
        if let Some(body) = self.options.get(TransportOption::PostFields) {
            let content_type = self
                .options
                .get(TransportOption::ContentType)
                .map(OptionValue::as_text)
                .unwrap_or_else(|| FORM_CONTENT_TYPE.to_string());
            request = request.header(CONTENT_TYPE, content_type).body(body.as_text());
        }

        let response = request.send().map_err(reqwest_failure)?;
        self.info.http_code = response.status().as_u16();
        self.info.url = response.url().to_string();
        self.info.content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        debug!("< {} {}", self.info.http_code, self.info.url);

        let body = response.text().map_err(reqwest_failure)?;
        self.info.size_download = body.len() as u64;

        if self.flag(TransportOption::ReturnTransfer) {
            return Ok(RawResult::Body(body));
        }
        std::io::stdout()
            .write_all(body.as_bytes())
            .map_err(|e| failure(error_code::WRITE_ERROR, e.to_string()))?;
        Ok(RawResult::Completed)
    }

    fn target_url(&self) -> Result<Url, TransportError> {
        let raw = self
            .options
            .get(TransportOption::Url)
            .map(OptionValue::as_text)
            .unwrap_or_default();
        if raw.is_empty() {
            return Err(failure(error_code::URL_MALFORMAT, "No URL set"));
        }

        let mut url = Url::parse(&raw).map_err(|e| {
            failure(
                error_code::URL_MALFORMAT,
                format!("Invalid URL '{}': {}", raw, e),
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(failure(
                error_code::UNSUPPORTED_PROTOCOL,
                format!("Protocol \"{}\" not supported", url.scheme()),
            ));
        }

        if let Some(port) = self.integer(TransportOption::Port) {
            let port = u16::try_from(port).map_err(|_| {
                failure(
                    error_code::BAD_FUNCTION_ARGUMENT,
                    format!("Invalid port: {}", port),
                )
            })?;
            url.set_port(Some(port)).map_err(|_| {
                failure(
                    error_code::URL_MALFORMAT,
                    format!("Cannot set port on '{}'", raw),
                )
            })?;
        }

        Ok(url)
    }

    fn build_client(&self) -> Result<Client, TransportError> {
        let policy = if self.flag(TransportOption::FollowLocation) {
            Policy::limited(MAX_REDIRECTS)
        } else {
            Policy::none()
        };

        let mut builder = Client::builder()
            .redirect(policy)
            .timeout(self.seconds(TransportOption::Timeout));
        if let Some(connect_timeout) = self.seconds(TransportOption::ConnectTimeout) {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(user_agent) = self.options.get(TransportOption::UserAgent) {
            builder = builder.user_agent(user_agent.as_text());
        }

        builder
            .build()
            .map_err(|e| failure(error_code::FAILED_INIT, error_chain(&e)))
    }

    fn method(&self) -> Result<Method, TransportError> {
        let custom = self
            .options
            .get(TransportOption::CustomRequest)
            .map(OptionValue::as_text)
            .filter(|method| !method.is_empty());
        if let Some(custom) = custom {
            return Method::from_bytes(custom.as_bytes()).map_err(|_| {
                failure(
                    error_code::BAD_FUNCTION_ARGUMENT,
                    format!("Invalid request method '{}'", custom),
                )
            });
        }

        if self.flag(TransportOption::Post) || self.options.contains(TransportOption::PostFields) {
            Ok(Method::POST)
        } else {
            Ok(Method::GET)
        }
    }

    fn integer(&self, key: TransportOption) -> Option<i64> {
        let value = self.options.get(key)?;
        let parsed = value.as_integer();
        if parsed.is_none() {
            warn!("Ignoring {} option with non-numeric value '{}'", key, value.as_text());
        }
        parsed
    }

    fn flag(&self, key: TransportOption) -> bool {
        let Some(value) = self.options.get(key) else {
            return false;
        };
        value.as_bool().unwrap_or_else(|| {
            warn!("Ignoring {} option with non-boolean value '{}'", key, value.as_text());
            false
        })
    }

    /// Positive second counts only; 0 means no limit
    fn seconds(&self, key: TransportOption) -> Option<Duration> {
        self.integer(key)
            .filter(|seconds| *seconds > 0)
            .map(|seconds| Duration::from_secs(seconds as u64))
    }
}

fn failure(code: u32, message: impl Into<String>) -> TransportError {
    TransportError {
        code,
        message: message.into(),
    }
}

fn reqwest_failure(err: reqwest::Error) -> TransportError {
    failure(error_code::code_for_reqwest_error(&err), error_chain(&err))
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
