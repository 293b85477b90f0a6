//! Searches public YouTube videos through the key-only connector.
//!
//! The API key comes from `KEYRING__YOUTUBE_KEY` or, when unset, from stdin; it is then saved
//! through the connector exactly as a host management screen would. The example verifies a site
//! token and runs one `search` call with the key appended as a query pair.

// std
use std::{
	io::{self, Write},
	sync::Arc,
};
// crates.io
use color_eyre::{Result, eyre::eyre};
use url::Url;
// self
use keyring_connector::{
	connector::RequestParams,
	settings::{MemorySettings, SettingsStore},
	store::{MemoryTokenStore, TokenStore},
	youtube,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let settings: Arc<dyn SettingsStore> = Arc::new(MemorySettings::default());
	let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::default());
	let admin_url = Url::parse("https://blog.example/wp-admin/admin.php?page=keyring")?;
	let connector = youtube::connector(admin_url, settings, store)?;

	if !connector.is_configured() {
		let message = format!("{} is unset; enter a YouTube API key", youtube::API_KEY_ENV);
		let api_key = prompt(&message)?;

		connector.save_api_key(&api_key)?;
	}

	let redirect = connector.request_token();

	println!("Verification redirect: {}", redirect.location);

	let id = connector.complete_verification(
		Some(connector.nonces().kr_nonce()),
		Some(connector.nonces().nonce()),
	)?;

	println!("Stored token {id}.");

	let query = prompt("Search query")?;
	let credential =
		connector.resolve_credentials()?.ok_or_else(|| eyre!("API key disappeared after saving."))?;
	let params = RequestParams::default()
		.query("part", "snippet")
		.query("type", "video")
		.query("maxResults", "5")
		.query("q", query)
		.query("key", credential.key.expose());

	match connector.request(youtube::endpoint("search")?, params) {
		Ok(response) => println!("Search response ({}): {}", response.status, response.body),
		Err(e) => {
			println!("Search failed with code `{}` and status {:?}.", e.code(), e.status());

			if let Some(response) = e.response() {
				println!("{}", response.body);
			}
		},
	}

	Ok(())
}

fn prompt(message: &str) -> Result<String> {
	loop {
		print!("{message}: ");

		io::stdout().flush()?;

		let mut input = String::new();

		io::stdin().read_line(&mut input)?;

		let trimmed = input.trim();

		if !trimmed.is_empty() {
			return Ok(trimmed.to_owned());
		}
	}
}
