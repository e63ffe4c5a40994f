use http_client_utils::prelude::*;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logger();

    let settings = Settings::from_env();
    let client = ClientBuilder::from_settings(settings).async_build().await?;

    let path = std::env::args().nth(1).unwrap_or_else(|| "/items".to_string());
    let mut response = client
        .get(&path, GetOptions::new().paginate_with("page", 50))
        .await?;
    info!("First page of {} returned {}", path, response.status_code);

    let mut count = 0usize;
    while let Some(item) = response.next_item().await {
        match item {
            Ok(value) => {
                count += 1;
                debug!("{}", value);
            }
            Err(e) => {
                warn!("Pagination stopped early: {}", e);
                break;
            }
        }
    }
    info!("Fetched {} item(s)", count);
    Ok(())
}
