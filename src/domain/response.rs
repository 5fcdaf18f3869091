/// Result of a `BulkMessages` or `GroupMessages` send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkMessageResponse {
    /// Total cost of the send excluding tax.
    pub cost: i64,
    /// Balance left after `cost` was deducted.
    pub remaining_balance: i64,
    pub event_id: i64,
    /// Informational sample of a generated message.
    pub sample: String,
    pub cost_breakdown: Vec<CostBreakdown>,
    /// Messages enqueued for delivery.
    pub messages: i64,
    /// SMS parts enqueued for delivery; long messages need several parts.
    pub parts: i64,
    pub error_report: ErrorReport,
}

/// Cost of a send for one mobile network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostBreakdown {
    pub quantity: i64,
    pub cost: i64,
    pub network: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorReport {
    pub no_network: i64,
    pub duplicates: i64,
    pub opted_outs: i64,
    pub faults: Vec<Fault>,
}

/// A message that could not be enqueued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fault {
    pub raw_destination: String,
    pub scrubbed_destination: String,
    pub customer_id: String,
    pub error_message: String,
    pub status: String,
}

/// Error body returned by the API for every non-2xx response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub code: i64,
    pub message: String,
    pub uuid: String,
    pub object: String,
    pub cause: String,
    pub status: String,
    pub errors: Vec<FieldError>,
}

/// Field-level validation failure reported inside an [`ErrorEnvelope`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldError {
    pub location: String,
    pub name: String,
    pub description: String,
}
