use std::fmt;

use phonenumber::country;

use crate::domain::validation::ValidationError;

fn trimmed_non_empty(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_owned())
}

pub(crate) fn ensure_max_chars(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// MyMobileAPI client id (the "username" half of the API credentials).
///
/// Invariant: non-empty after trimming.
pub struct ClientId(String);

impl ClientId {
    pub const FIELD: &'static str = "ClientId";

    /// Create a validated [`ClientId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(trimmed_non_empty(value.into(), Self::FIELD)?))
    }

    /// Borrow the validated client id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq)]
/// MyMobileAPI client secret.
///
/// Invariant: must not be empty (whitespace is preserved). `Debug` output is redacted.
pub struct ClientSecret(String);

impl ClientSecret {
    pub const FIELD: &'static str = "ClientSecret";

    /// Create a validated [`ClientSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message body (`Content`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    pub const FIELD: &'static str = "Content";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Mobile number (MSISDN) a message is sent to (`Destination`).
///
/// Invariant: non-empty after trimming. No normalization happens here; parse into
/// [`PhoneNumber`] and convert it when an international MSISDN is required.
pub struct Destination(String);

impl Destination {
    pub const FIELD: &'static str = "Destination";

    /// Create a validated (non-empty) destination.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(trimmed_non_empty(value.into(), Self::FIELD)?))
    }

    /// Raw (trimmed) value as sent to the API.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for Destination {
    /// Use the E.164 digits without the leading `+`.
    fn from(value: PhoneNumber) -> Self {
        Self(value.msisdn().to_owned())
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let raw = trimmed_non_empty(input.into(), Destination::FIELD)?;

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation (`+27831234567`).
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// E.164 digits without the `+` prefix (`27831234567`).
    pub fn msisdn(&self) -> &str {
        self.e164.trim_start_matches('+')
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// User defined id used to correlate a message with its receipts and replies (`CustomerId`).
///
/// Invariant: non-empty after trimming, at most [`CustomerId::MAX_CHARS`] characters.
pub struct CustomerId(String);

impl CustomerId {
    pub const FIELD: &'static str = "CustomerId";
    pub const MAX_CHARS: usize = 100;

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = trimmed_non_empty(value.into(), Self::FIELD)?;
        ensure_max_chars(&value, Self::FIELD, Self::MAX_CHARS)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender id (source address) for a send (`SenderId`).
///
/// Invariant: non-empty after trimming, at most [`SenderId::MAX_CHARS`] characters.
/// Availability is ultimately decided by the mobile network operator.
pub struct SenderId(String);

impl SenderId {
    pub const FIELD: &'static str = "SenderId";
    pub const MAX_CHARS: usize = 11;

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = trimmed_non_empty(value.into(), Self::FIELD)?;
        ensure_max_chars(&value, Self::FIELD, Self::MAX_CHARS)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Name of a contact group targeted by a group send.
///
/// Invariant: non-empty after trimming.
pub struct GroupName(String);

impl GroupName {
    pub const FIELD: &'static str = "Groups";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(trimmed_non_empty(value.into(), Self::FIELD)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
