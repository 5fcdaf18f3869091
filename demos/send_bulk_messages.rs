use std::io;

use mymobileapi::{
    BulkMessageRequest, Credentials, Destination, Message, MessageText, MyMobileApiClient,
    SendOptions,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let destination = std::env::var("MYMOBILEAPI_DESTINATION").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "MYMOBILEAPI_DESTINATION environment variable is required",
        )
    })?;
    let content = std::env::var("MYMOBILEAPI_MESSAGE")
        .unwrap_or_else(|_| "Hello from the mymobileapi demo.".to_owned());
    let debug = std::env::var("MYMOBILEAPI_DEBUG").is_ok_and(|value| value == "1");

    let client = MyMobileApiClient::new(Credentials::from_env()?, debug).await?;
    let message = Message::new(Destination::new(destination)?, MessageText::new(content)?);
    let options = SendOptions {
        test_mode: std::env::var("MYMOBILEAPI_TEST_MODE").is_ok_and(|value| value == "1"),
        ..Default::default()
    };
    let request = BulkMessageRequest::new(vec![message], options)?;

    let response = client.send_bulk_messages(request).await?;
    println!(
        "event: {}, cost: {}, remaining balance: {}, faults: {}",
        response.event_id,
        response.cost,
        response.remaining_balance,
        response.error_report.faults.len()
    );

    Ok(())
}
