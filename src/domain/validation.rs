use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    TooManyMessages {
        max: usize,
        actual: usize,
    },
    InvalidPhoneNumber {
        input: String,
    },
    DeliveryWindow,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} is too long: {actual} characters (max {max})")
            }
            Self::TooManyMessages { max, actual } => {
                write!(f, "too many messages: {actual} (max {max})")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::DeliveryWindow => {
                write!(f, "EndDeliveryUtc must be later than StartDeliveryUtc")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
