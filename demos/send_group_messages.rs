use std::io;

use mymobileapi::{
    Credentials, GroupMessageRequest, GroupName, Message, MessageText, MyMobileApiClient,
    SendOptions,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let groups = std::env::var("MYMOBILEAPI_GROUPS").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "MYMOBILEAPI_GROUPS environment variable is required (comma separated)",
        )
    })?;
    let groups = groups
        .split(',')
        .map(GroupName::new)
        .collect::<Result<Vec<_>, _>>()?;
    let content = std::env::var("MYMOBILEAPI_MESSAGE")
        .unwrap_or_else(|_| "Hello from the mymobileapi demo.".to_owned());
    let debug = std::env::var("MYMOBILEAPI_DEBUG").is_ok_and(|value| value == "1");

    let client = MyMobileApiClient::new(Credentials::from_env()?, debug).await?;
    let message = Message::for_groups(MessageText::new(content)?);
    let request = GroupMessageRequest::new(message, groups, SendOptions::default())?;

    let response = client.send_group_messages(request).await?;
    println!(
        "event: {}, messages: {}, parts: {}, cost: {}",
        response.event_id, response.messages, response.parts, response.cost
    );

    Ok(())
}
