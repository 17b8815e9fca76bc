use anyhow::Result;
use dhpsign::client::{ApiClient, Config};
use dhpsign::default_context;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Base url, application name and credentials come from the
    // DHP_API_BASE_URL, DHP_APPLICATION_NAME, DHP_SIGNING_KEY and
    // DHP_SIGNING_SECRET environment variables.
    let client = ApiClient::new(default_context(), Config::default())?;

    // Fetch the profile of the signing application's service user.
    let response = client
        .send_signed(
            http::Method::GET,
            "/usermanagement/users/profile",
            "",
            http::HeaderMap::new(),
            bytes::Bytes::new(),
        )
        .await?;

    println!("status: {}", response.status);
    println!("response code: {}", response.code);
    println!("body: {}", response.body_string());

    Ok(())
}
