use anyhow::Result;
use bytes::Bytes;
use dhpsign_core::Context;
use dhpsign_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Create a custom reqwest client with specific configuration
    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .user_agent("dhpsign-example/1.0")
        .build()?;

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    let url = "http://httpbin.org/get";
    println!("GET {url}");

    let req = http::Request::builder()
        .method("GET")
        .uri(url)
        .header("x-test-header", "dhpsign-example")
        .body(Bytes::new())?;

    match ctx.http_send(req).await {
        Ok(resp) => {
            println!("status: {}", resp.status());
            if let Ok(text) = String::from_utf8(resp.body().to_vec()) {
                println!("{text}");
            }
        }
        Err(err) => {
            eprintln!("request failed: {err}");
        }
    }

    Ok(())
}
