//! Environment routing and credential material.
//!
//! Credentials are passed explicitly into [`crate::client::AnbimaClient`]; nothing here is
//! process-global. [`Credentials::from_env`] is a convenience loader for the `ANBIMA_*`
//! variables, not a hidden singleton.

// std
use std::{env, str::FromStr};
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, error::ConfigError, token::TokenSecret};

const PRODUCTION_BASE_URL: &str = "https://api.anbima.com.br";
const SANDBOX_BASE_URL: &str = "https://api-sandbox.anbima.com.br/mocks";
// Token exchanges always go through the production host, sandbox included.
const TOKEN_URL: &str = "https://api.anbima.com.br/oauth/access-token";

const ENV_CLIENT_ID: &str = "ANBIMA_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "ANBIMA_CLIENT_SECRET";
const ENV_ENVIRONMENT: &str = "ANBIMA_ENVIRONMENT";

/// Target environment selecting which resource host the client talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
	#[default]
	/// Mock-backed sandbox host.
	Sandbox,
	/// Live production host.
	Production,
}
impl Environment {
	/// Returns the resource base URL for this environment.
	pub fn base_url(&self) -> &'static str {
		match self {
			Self::Sandbox => SANDBOX_BASE_URL,
			Self::Production => PRODUCTION_BASE_URL,
		}
	}

	/// Returns the token endpoint URL; identical across environments.
	pub fn token_url(&self) -> &'static str {
		TOKEN_URL
	}

	/// Canonical lowercase selector name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Sandbox => "sandbox",
			Self::Production => "production",
		}
	}
}
impl FromStr for Environment {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"sandbox" => Ok(Self::Sandbox),
			// `prod` is accepted as a legacy alias.
			"production" | "prod" => Ok(Self::Production),
			_ => Err(ConfigError::UnknownEnvironment { value: s.to_owned() }),
		}
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable client credentials plus the target environment.
#[derive(Clone, Debug)]
pub struct Credentials {
	/// OAuth 2.0 client identifier; also sent as the `client_id` header on resource requests.
	pub client_id: String,
	/// OAuth 2.0 client secret used for HTTP Basic authentication at the token endpoint.
	pub client_secret: TokenSecret,
	/// Target environment.
	pub environment: Environment,
}
impl Credentials {
	/// Creates credentials from an identifier/secret pair and a target environment.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		environment: Environment,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			environment,
		}
	}

	/// Loads credentials from the `ANBIMA_CLIENT_ID`, `ANBIMA_CLIENT_SECRET`, and optional
	/// `ANBIMA_ENVIRONMENT` variables (defaulting to the sandbox).
	pub fn from_env() -> Result<Self> {
		let client_id = require_var(ENV_CLIENT_ID)?;
		let client_secret = require_var(ENV_CLIENT_SECRET)?;
		let environment = match env::var(ENV_ENVIRONMENT) {
			Ok(value) => value.parse()?,
			Err(_) => Environment::default(),
		};

		Ok(Self::new(client_id, client_secret, environment))
	}

	/// Renders the `Authorization` header value for the token request, i.e.
	/// `Basic base64(client_id:client_secret)`.
	pub fn basic_authorization(&self) -> String {
		let pair = format!("{}:{}", self.client_id, self.client_secret.expose());

		format!("Basic {}", STANDARD.encode(pair))
	}
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
	env::var(name).map_err(|_| ConfigError::MissingVariable { name })
}
