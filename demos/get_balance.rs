use mymobileapi::{Credentials, MyMobileApiClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let debug = std::env::var("MYMOBILEAPI_DEBUG").is_ok_and(|value| value == "1");
    let client = MyMobileApiClient::new(Credentials::from_env()?, debug).await?;

    println!("token expires at: {:?}", client.token_expiry());
    println!("balance: {}", client.get_balance().await?);

    Ok(())
}
