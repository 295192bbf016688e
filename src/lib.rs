//! rcurl - a fluent request builder over a blocking HTTP transport
//!
//! [`SimpleCurl`] wraps one transport and passes raw options straight
//! through. [`Curl`] builds on it with a base URL, endpoint, query
//! arguments, method and serialized body, and records the transfer's
//! metadata and error after execution.

pub mod config;
pub mod curl;
pub mod error;
pub mod http;
pub mod logging;
pub mod simple;
pub mod utils;

pub use config::{CurlConfig, Method};
pub use curl::{ArgumentKey, ArgumentValue, Curl, Serializer};
pub use error::{CurlError, Result};
pub use http::{OptionSet, OptionValue, RawResult, TransferInfo, TransportError, TransportOption};
pub use simple::SimpleCurl;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
