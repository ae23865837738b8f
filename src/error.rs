//! Client-level error types shared by authentication, resource fetches, and configuration.

// crates.io
use reqwest::Error as ReqwestError;
// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type JsonParseError = serde_path_to_error::Error<serde_json::Error>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token endpoint interaction failed.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Resource endpoint interaction failed.
	#[error(transparent)]
	Request(#[from] RequestError),
}

/// Failures raised while exchanging client credentials for an access token.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint returned HTTP {status}: {body}.")]
	Endpoint {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Raw response body, useful for provider error payloads.
		body: String,
	},
	/// Token endpoint could not be reached.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Underlying transport failure.
		#[source]
		source: ReqwestError,
	},
	/// Token endpoint answered 2xx but the body is not a valid token payload.
	#[error("Token endpoint returned a malformed token payload.")]
	ResponseParse {
		/// Structured parsing failure pointing at the offending field.
		#[source]
		source: JsonParseError,
	},
}

/// Failures raised while fetching a resource endpoint.
#[derive(Debug, ThisError)]
pub enum RequestError {
	/// Resource endpoint answered with a non-success status.
	#[error("Resource endpoint {url} returned HTTP {status}: {body}.")]
	Endpoint {
		/// Full request URL, including the endpoint path.
		url: Url,
		/// HTTP status code returned by the resource endpoint.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Resource endpoint could not be reached or timed out.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Full request URL, including the endpoint path.
		url: Url,
		/// Underlying transport failure.
		#[source]
		source: ReqwestError,
	},
	/// Resource endpoint answered 2xx with a body that is not valid JSON.
	#[error("Resource endpoint {url} returned malformed JSON.")]
	ResponseParse {
		/// Full request URL, including the endpoint path.
		url: Url,
		/// Structured parsing failure pointing at the offending field.
		#[source]
		source: JsonParseError,
	},
}

/// Configuration and construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: ReqwestError,
	},
	/// Endpoint path does not join into a valid URL.
	#[error("Endpoint `{endpoint}` does not form a valid URL.")]
	InvalidEndpoint {
		/// Offending endpoint path or URL string.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Required environment variable is unset.
	#[error("Environment variable `{name}` is required but unset.")]
	MissingVariable {
		/// Name of the missing variable.
		name: &'static str,
	},
	/// Environment selector string is not recognized.
	#[error("Unknown environment `{value}`; expected `sandbox` or `production`.")]
	UnknownEnvironment {
		/// Rejected selector value.
		value: String,
	},
}
