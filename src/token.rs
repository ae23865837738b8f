//! Token payloads, cached session state, and the reuse policy flag.

// self
use crate::_prelude::*;

const DEFAULT_LIFETIME_SECS: u64 = 3_600;

/// Redacted secret wrapper keeping credential material out of logs and `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Raw token endpoint payload as returned by [`authenticate`](crate::client::AnbimaClient::authenticate).
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenResponse {
	/// Issued access token.
	pub access_token: String,
	/// Declared lifetime in seconds, when the provider supplies one.
	pub expires_in: Option<u64>,
	/// Token type label, typically `bearer`.
	pub token_type: Option<String>,
}
impl TokenResponse {
	/// Declared token lifetime, falling back to the provider default of one hour.
	pub fn lifetime(&self) -> Duration {
		Duration::seconds(self.expires_in.unwrap_or(DEFAULT_LIFETIME_SECS) as i64)
	}
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.field("token_type", &self.token_type)
			.finish()
	}
}

/// Cached session token owned by a single client instance.
///
/// Replaced wholesale on every successful authentication; no history is retained.
#[derive(Clone, Debug)]
pub struct SessionToken {
	/// Access token presented on resource requests.
	pub access_token: TokenSecret,
	/// Instant the token was acquired.
	pub issued_at: OffsetDateTime,
	/// Absolute expiry instant, `issued_at` plus the declared lifetime.
	pub expires_at: OffsetDateTime,
}
impl SessionToken {
	/// Builds a session from a token payload, stamping expiry relative to `issued_at`.
	pub fn issue(payload: &TokenResponse, issued_at: OffsetDateTime) -> Self {
		Self {
			access_token: TokenSecret::new(payload.access_token.clone()),
			issued_at,
			expires_at: issued_at + payload.lifetime(),
		}
	}

	/// Returns `true` once `instant` reaches the expiry instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}
}

/// Controls when a cached session token may be reused instead of re-authenticating.
///
/// The expiry instant is always recorded; whether it gates reuse is this flag's call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenReusePolicy {
	#[default]
	/// Reuse any cached token regardless of its expiry instant; only absence triggers
	/// re-authentication. This is the provider client's historical behavior.
	CachedPresence,
	/// Re-authenticate once the cached token passes its expiry instant.
	RespectExpiry,
}
impl TokenReusePolicy {
	/// Decides whether `session` may be reused at `instant`.
	pub fn allows(&self, session: &SessionToken, instant: OffsetDateTime) -> bool {
		match self {
			Self::CachedPresence => true,
			Self::RespectExpiry => !session.is_expired_at(instant),
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn payload(expires_in: Option<u64>) -> TokenResponse {
		TokenResponse {
			access_token: "tok123".into(),
			expires_in,
			token_type: Some("bearer".into()),
		}
	}

	#[test]
	fn lifetime_defaults_to_one_hour() {
		assert_eq!(payload(None).lifetime(), Duration::hours(1));
		assert_eq!(payload(Some(600)).lifetime(), Duration::minutes(10));
	}

	#[test]
	fn session_stamps_absolute_expiry() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let session = SessionToken::issue(&payload(Some(600)), issued);

		assert_eq!(session.access_token.expose(), "tok123");
		assert_eq!(session.expires_at, macros::datetime!(2025-01-01 00:10 UTC));
		assert!(!session.is_expired_at(macros::datetime!(2025-01-01 00:09 UTC)));
		assert!(session.is_expired_at(macros::datetime!(2025-01-01 00:10 UTC)));
	}

	#[test]
	fn reuse_policies_diverge_on_expired_sessions() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let later = macros::datetime!(2025-01-01 02:00 UTC);
		let session = SessionToken::issue(&payload(Some(600)), issued);

		assert!(TokenReusePolicy::CachedPresence.allows(&session, later));
		assert!(!TokenReusePolicy::RespectExpiry.allows(&session, later));
		assert!(TokenReusePolicy::RespectExpiry.allows(&session, issued));
	}

	#[test]
	fn payload_parses_with_optional_lifetime() {
		let parsed: TokenResponse = serde_json::from_str("{\"access_token\":\"tok123\"}")
			.expect("Payload without expires_in should parse.");

		assert_eq!(parsed.access_token, "tok123");
		assert_eq!(parsed.expires_in, None);

		serde_json::from_str::<TokenResponse>("{\"expires_in\":600}")
			.expect_err("Payload without access_token should fail to parse.");
	}

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("tok123");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert!(!format!("{:?}", payload(None)).contains("tok123"));
	}
}
