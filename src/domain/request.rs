use chrono::{DateTime, Utc};

use crate::domain::validation::ValidationError;
use crate::domain::value::{
    CustomerId, Destination, GroupName, MessageText, SenderId, ensure_max_chars,
};

/// Maximum number of messages accepted in a single `BulkMessages` call.
pub const BULK_MESSAGES_MAX: usize = 100;

/// Maximum length of the reporting-only fields (`CampaignName`, `CostCentre`).
pub const REPORTING_FIELD_MAX_CHARS: usize = 100;

/// Mobile document generated for a message from a document template.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// API name of the document template.
    pub template: String,
    /// Template version; the active version is used when `None`.
    pub version: Option<u32>,
    /// Password protecting the document; no authentication when `None`.
    pub password: Option<String>,
    /// Values for the variables defined in the template.
    pub variables: serde_json::Value,
}

impl Document {
    pub const FIELD: &'static str = "Template";

    pub fn new(template: impl Into<String>) -> Result<Self, ValidationError> {
        let template = template.into();
        if template.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self {
            template,
            version: None,
            password: None,
            variables: serde_json::Value::Null,
        })
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn variables(mut self, variables: serde_json::Value) -> Self {
        self.variables = variables;
        self
    }
}

/// A single SMS message.
///
/// Bulk sends need a destination on every message; group sends address the contacts of
/// the target groups and leave it unset.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub content: MessageText,
    pub destination: Option<Destination>,
    pub customer_id: Option<CustomerId>,
    pub document: Option<Document>,
}

impl Message {
    pub fn new(destination: Destination, content: MessageText) -> Self {
        Self {
            content,
            destination: Some(destination),
            customer_id: None,
            document: None,
        }
    }

    /// Message without a destination, for [`GroupMessageRequest`].
    pub fn for_groups(content: MessageText) -> Self {
        Self {
            content,
            destination: None,
            customer_id: None,
            document: None,
        }
    }

    pub fn customer_id(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn document(mut self, document: Document) -> Self {
        self.document = Some(document);
        self
    }
}

/// Optional settings applied to a whole bulk or group send.
///
/// Unset optional values are omitted from the request; boolean flags are always sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendOptions {
    pub sender_id: Option<SenderId>,
    /// Duplicate check policy as named by the API (`None` when unset).
    pub duplicate_check: Option<String>,
    pub start_delivery_utc: Option<DateTime<Utc>>,
    /// Stagger delivery until this instant. Must be later than `start_delivery_utc`.
    pub end_delivery_utc: Option<DateTime<Utc>>,
    pub reply_rule_set_name: Option<String>,
    /// Reporting only.
    pub campaign_name: Option<String>,
    /// Reporting only.
    pub cost_centre: Option<String>,
    /// Skip subscribers that opted out after a previous send.
    pub check_opt_outs: bool,
    pub shorten_urls: bool,
    /// Hours the network keeps trying to deliver a message.
    pub validity_period: Option<u32>,
    /// Validate and price the send without delivering anything.
    pub test_mode: bool,
    pub rule_name: Option<String>,
    pub reply_rule_version: Option<u32>,
    pub extra_forward_emails: Option<String>,
}

impl SendOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(campaign) = self.campaign_name.as_deref() {
            ensure_max_chars(campaign, "CampaignName", REPORTING_FIELD_MAX_CHARS)?;
        }
        if let Some(cost_centre) = self.cost_centre.as_deref() {
            ensure_max_chars(cost_centre, "CostCentre", REPORTING_FIELD_MAX_CHARS)?;
        }
        match (self.start_delivery_utc, self.end_delivery_utc) {
            (Some(start), Some(end)) if end <= start => Err(ValidationError::DeliveryWindow),
            _ => Ok(()),
        }
    }
}

/// Request for the `BulkMessages` endpoint.
#[derive(Debug, Clone)]
pub struct BulkMessageRequest {
    options: SendOptions,
    messages: Vec<Message>,
}

impl BulkMessageRequest {
    pub fn new(messages: Vec<Message>, options: SendOptions) -> Result<Self, ValidationError> {
        if messages.is_empty() {
            return Err(ValidationError::Empty { field: "Messages" });
        }
        if messages.len() > BULK_MESSAGES_MAX {
            return Err(ValidationError::TooManyMessages {
                max: BULK_MESSAGES_MAX,
                actual: messages.len(),
            });
        }
        if messages.iter().any(|it| it.destination.is_none()) {
            return Err(ValidationError::Empty {
                field: Destination::FIELD,
            });
        }
        options.validate()?;
        Ok(Self { options, messages })
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

/// Request for the `GroupMessages` endpoint: one message fanned out to every contact in
/// the named groups.
#[derive(Debug, Clone)]
pub struct GroupMessageRequest {
    options: SendOptions,
    message: Message,
    groups: Vec<GroupName>,
}

impl GroupMessageRequest {
    pub fn new(
        message: Message,
        groups: Vec<GroupName>,
        options: SendOptions,
    ) -> Result<Self, ValidationError> {
        if groups.is_empty() {
            return Err(ValidationError::Empty {
                field: GroupName::FIELD,
            });
        }
        options.validate()?;
        Ok(Self {
            options,
            message,
            groups,
        })
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn groups(&self) -> &[GroupName] {
        &self.groups
    }
}
