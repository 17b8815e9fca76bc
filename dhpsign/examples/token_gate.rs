use std::env;
use std::sync::Arc;

use anyhow::Result;
use dhpsign::client::{ApiClient, Config};
use dhpsign::default_context;
use dhpsign::gate::{ErrorResponse, TokenGate, ValidationRequest};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // One client per identity deployment. Both read their credentials from
    // the environment, only the base url differs.
    let primary = ApiClient::new(
        default_context(),
        Config::default().with_api_base_url("http://id-1.dhp.example.com"),
    )?;
    let secondary = ApiClient::new(
        default_context(),
        Config::default().with_api_base_url("http://id-2.dhp.example.com"),
    )?;

    let gate = TokenGate::new(vec![Arc::new(primary), Arc::new(secondary)]);

    let subject_id = env::args().nth(1).unwrap_or_else(|| "user-guid".to_string());
    let bearer_token = env::args().nth(2).unwrap_or_else(|| "Bearer token".to_string());

    let decision = gate
        .validate(&ValidationRequest::new(subject_id, bearer_token))
        .await;

    match ErrorResponse::from_decision(decision) {
        None => println!("admitted"),
        Some(denial) => println!(
            "denied with {}: {}",
            denial.http_status(),
            serde_json::to_string(&denial)?
        ),
    }

    Ok(())
}
