//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod account;
mod error_envelope;
mod messages;

pub use account::{AuthenticationJsonResponse, BalanceJsonResponse, encode_basic_authorization};
pub use error_envelope::{decode_error_envelope, describe_api_error};
pub use messages::{BulkMessageJsonResponse, encode_bulk_messages_body, encode_group_messages_body};
