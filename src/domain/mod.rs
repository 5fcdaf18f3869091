//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    BULK_MESSAGES_MAX, BulkMessageRequest, Document, GroupMessageRequest, Message,
    REPORTING_FIELD_MAX_CHARS, SendOptions,
};
pub use response::{
    BulkMessageResponse, CostBreakdown, ErrorEnvelope, ErrorReport, Fault, FieldError,
};
pub use validation::ValidationError;
pub use value::{
    ClientId, ClientSecret, CustomerId, Destination, GroupName, MessageText, PhoneNumber,
    SenderId,
};
