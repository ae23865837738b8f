//! Demonstrates authenticating against a mocked sandbox host and fetching a fund listing
//! through the generic GET passthrough.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use anbima_client::{
	client::AnbimaClient,
	config::{Credentials, Environment},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access-token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let funds_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/feed/fundos/v2/fundos").query_param("tipo-fundo", "FIDC");
			then.status(200).header("content-type", "application/json").body(
				"[{\"codigo_fundo\":\"FIDC-001\",\"razao_social\":\"Fundo Exemplo FIDC\"}]",
			);
		})
		.await;
	// Real usage: `Credentials::from_env()?` with `ANBIMA_CLIENT_ID`/`ANBIMA_CLIENT_SECRET` set,
	// and no URL overrides.
	let credentials = Credentials::new("demo-client", "super-secret", Environment::Sandbox);
	let client = AnbimaClient::new(credentials)?
		.with_token_url(Url::parse(&server.url("/oauth/access-token"))?)
		.with_base_url(Url::parse(&server.base_url())?);
	let funds =
		client.get("feed/fundos/v2/fundos", Some(&[("tipo-fundo", "FIDC")])).await?;

	println!("Fetched funds: {funds}.");

	token_mock.assert_async().await;
	funds_mock.assert_async().await;

	Ok(())
}
