//! Authenticated API client maintaining a cached client-credentials session.
//!
//! [`AnbimaClient`] wraps a reqwest transport with the token lifecycle the provider expects:
//! HTTP Basic at the fixed token endpoint, a form-encoded `client_credentials` grant, and the
//! token replayed on resource requests through the provider's custom `access_token` header
//! rather than the standard `Authorization: Bearer` scheme.

// std
use std::time::Duration as StdDuration;
// crates.io
use reqwest::{
	Client as ReqwestClient, Response,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	config::Credentials,
	error::{AuthError, ConfigError, RequestError},
	token::{SessionToken, TokenReusePolicy, TokenResponse, TokenSecret},
};

const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);
const JSON_CONTENT_TYPE: &str = "application/json";
// Provider-specific resource headers; the token is NOT sent as `Authorization: Bearer`.
const CLIENT_ID_HEADER: &str = "client_id";
const ACCESS_TOKEN_HEADER: &str = "access_token";

/// Authenticated API client bound to one credential set and environment.
///
/// The session token lives behind an async mutex, so a shared instance is safe to call from
/// concurrent tasks and at most one authentication runs at a time. Tokens are acquired lazily:
/// construction performs no network I/O.
pub struct AnbimaClient {
	http: ReqwestClient,
	credentials: Credentials,
	base_url: Url,
	token_url: Url,
	reuse_policy: TokenReusePolicy,
	session: AsyncMutex<Option<SessionToken>>,
}
impl AnbimaClient {
	/// Creates a client for the credentials' environment with a 30-second request timeout.
	pub fn new(credentials: Credentials) -> Result<Self> {
		let http = ReqwestClient::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.map_err(|e| ConfigError::HttpClientBuild { source: e })?;
		let base_url = parse_endpoint(credentials.environment.base_url())?;
		let token_url = parse_endpoint(credentials.environment.token_url())?;

		Ok(Self {
			http,
			credentials,
			base_url,
			token_url,
			reuse_policy: TokenReusePolicy::default(),
			session: AsyncMutex::new(None),
		})
	}

	/// Replaces the underlying transport. Timeout behavior follows the supplied client.
	pub fn with_http_client(mut self, client: ReqwestClient) -> Self {
		self.http = client;

		self
	}

	/// Overrides the resource base URL, e.g. to point at a mock server or local gateway.
	pub fn with_base_url(mut self, url: Url) -> Self {
		self.base_url = url;

		self
	}

	/// Overrides the token endpoint URL.
	pub fn with_token_url(mut self, url: Url) -> Self {
		self.token_url = url;

		self
	}

	/// Sets the cached-token reuse policy.
	pub fn with_reuse_policy(mut self, policy: TokenReusePolicy) -> Self {
		self.reuse_policy = policy;

		self
	}

	/// Resource base URL the client resolves endpoints against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Token endpoint URL the client authenticates against.
	pub fn token_url(&self) -> &Url {
		&self.token_url
	}

	/// Performs the `client_credentials` grant and caches the resulting session token,
	/// overwriting any previously cached one.
	///
	/// Returns the raw token payload. Failures are logged and propagated as
	/// [`AuthError`]; the cached state is left untouched on failure.
	pub async fn authenticate(&self) -> Result<TokenResponse> {
		let mut session = self.session.lock().await;

		self.refresh_session(&mut session).await
	}

	/// Returns a token usable for resource requests, authenticating first when the cached
	/// session is absent or rejected by the reuse policy.
	pub async fn get_token(&self) -> Result<TokenSecret> {
		let mut session = self.session.lock().await;

		if let Some(current) = session.as_ref()
			&& self.reuse_policy.allows(current, OffsetDateTime::now_utc())
		{
			return Ok(current.access_token.clone());
		}

		tracing::info!("No reusable session token cached; authenticating.");

		let payload = self.refresh_session(&mut session).await?;

		Ok(TokenSecret::new(payload.access_token))
	}

	/// Performs an authenticated GET against `{base_url}/{endpoint}` with optional query
	/// parameters, returning the parsed JSON body (object or array).
	///
	/// `params` accepts anything reqwest can serialize as a query string, e.g.
	/// `&[("tipo-fundo", "FIDC")]`.
	pub async fn get<P>(&self, endpoint: &str, params: Option<&P>) -> Result<serde_json::Value>
	where
		P: Serialize + ?Sized,
	{
		let token = self.get_token().await?;
		let url = self.resource_url(endpoint)?;
		let mut request = self
			.http
			.get(url.clone())
			.header(CONTENT_TYPE, JSON_CONTENT_TYPE)
			.header(CLIENT_ID_HEADER, &self.credentials.client_id)
			.header(ACCESS_TOKEN_HEADER, token.expose());

		if let Some(params) = params {
			request = request.query(params);
		}

		tracing::info!(url = %url, "GET resource endpoint.");

		let response = request.send().await.map_err(|e| {
			tracing::error!(url = %url, error = %e, "Resource request failed to complete.");

			RequestError::Network { url: url.clone(), source: e }
		})?;
		let (status, body) = split_response(response)
			.await
			.map_err(|e| RequestError::Network { url: url.clone(), source: e })?;

		if !status_is_success(status) {
			tracing::error!(url = %url, status, "Resource endpoint returned an error status.");

			return Err(RequestError::Endpoint { url, status, body }.into());
		}

		let deserializer = &mut serde_json::Deserializer::from_str(&body);

		serde_path_to_error::deserialize(deserializer).map_err(|e| {
			tracing::error!(url = %url, "Resource endpoint returned malformed JSON.");

			RequestError::ResponseParse { url, source: e }.into()
		})
	}

	async fn refresh_session(&self, slot: &mut Option<SessionToken>) -> Result<TokenResponse> {
		tracing::info!(url = %self.token_url, "Requesting access token.");

		let response = self
			.http
			.post(self.token_url.clone())
			.header(AUTHORIZATION, self.credentials.basic_authorization())
			.header(ACCEPT, JSON_CONTENT_TYPE)
			// The provider requires a form-encoded body, not JSON.
			.form(&[("grant_type", "client_credentials")])
			.send()
			.await
			.map_err(|e| {
				tracing::error!(url = %self.token_url, error = %e, "Token request failed to complete.");

				AuthError::Network { source: e }
			})?;
		let (status, body) =
			split_response(response).await.map_err(|e| AuthError::Network { source: e })?;

		if !status_is_success(status) {
			tracing::error!(url = %self.token_url, status, "Token endpoint returned an error status.");

			return Err(AuthError::Endpoint { status, body }.into());
		}

		let deserializer = &mut serde_json::Deserializer::from_str(&body);
		let payload: TokenResponse =
			serde_path_to_error::deserialize(deserializer).map_err(|e| {
				tracing::error!(url = %self.token_url, "Token endpoint returned a malformed payload.");

				AuthError::ResponseParse { source: e }
			})?;

		*slot = Some(SessionToken::issue(&payload, OffsetDateTime::now_utc()));

		Ok(payload)
	}

	// Joins base URL and endpoint with exactly one separator, tolerating slashes on
	// either side.
	fn resource_url(&self, endpoint: &str) -> Result<Url> {
		let raw = format!(
			"{}/{}",
			self.base_url.as_str().trim_end_matches('/'),
			endpoint.trim_start_matches('/'),
		);

		Url::parse(&raw).map_err(|e| {
			ConfigError::InvalidEndpoint { endpoint: endpoint.to_owned(), source: e }.into()
		})
	}
}
impl Debug for AnbimaClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AnbimaClient")
			.field("client_id", &self.credentials.client_id)
			.field("environment", &self.credentials.environment)
			.field("base_url", &self.base_url.as_str())
			.field("token_url", &self.token_url.as_str())
			.field("reuse_policy", &self.reuse_policy)
			.finish()
	}
}

fn parse_endpoint(raw: &str) -> Result<Url> {
	Url::parse(raw)
		.map_err(|e| ConfigError::InvalidEndpoint { endpoint: raw.to_owned(), source: e }.into())
}

async fn split_response(response: Response) -> Result<(u16, String), reqwest::Error> {
	let status = response.status().as_u16();
	let body = response.text().await?;

	Ok((status, body))
}

fn status_is_success(status: u16) -> bool {
	(200..300).contains(&status)
}
