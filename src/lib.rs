//! Typed Rust client for the MyMobileAPI SMS gateway REST API.
//!
//! The crate is split into a domain layer of validated types, a transport layer for
//! wire-format details, and a small client layer that owns the session token and runs
//! the authenticated request pipeline.
//!
//! ```rust,no_run
//! use mymobileapi::{
//!     BulkMessageRequest, Credentials, Destination, Message, MessageText, MyMobileApiClient,
//!     SendOptions,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mymobileapi::MyMobileApiError> {
//!     let client = MyMobileApiClient::new(Credentials::new("id", "secret")?, false).await?;
//!     let message = Message::new(Destination::new("27831234567")?, MessageText::new("hello")?);
//!     let request = BulkMessageRequest::new(vec![message], SendOptions::default())?;
//!     let response = client.send_bulk_messages(request).await?;
//!     println!("event {} cost {}", response.event_id, response.cost);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    ApiResponse, Credentials, MyMobileApiClient, MyMobileApiClientBuilder, MyMobileApiError,
};
pub use domain::{
    BulkMessageRequest, BulkMessageResponse, ClientId, ClientSecret, CostBreakdown, CustomerId,
    Destination, Document, ErrorEnvelope, ErrorReport, Fault, FieldError, GroupMessageRequest,
    GroupName, Message, MessageText, PhoneNumber, SendOptions, SenderId, ValidationError,
};
