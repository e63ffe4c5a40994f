use http_client_utils::prelude::*;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    setup_logger();

    // Reads HTTP_CLIENT_* variables, falling back to defaults
    let settings = Settings::from_env();
    info!("Connecting to {} with {} auth", settings.base_url, settings.auth_type);

    let client = ClientBuilder::from_settings(settings).build()?;

    let path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    let mut response = client.get(&path, GetOptions::new())?;
    info!("GET {} returned {}", path, response.status_code);

    for item in response.data() {
        match item {
            Ok(value) => info!("{}", serde_json::to_string_pretty(&value)?),
            Err(e) => error!("Failed to read payload: {}", e),
        }
    }
    Ok(())
}
