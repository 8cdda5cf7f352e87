use rust_decimal::Decimal;
use thiserror::Error;

/// Faults that prevent a call from reaching a gateway decision.
///
/// Business rejections (bad request, refund before settlement, double void) are
/// not errors; they come back as an unsuccessful `GatewayResponse`.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Error sending request to the gateway - {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gateway answered with HTTP status {status}")]
    HttpStatus { status: u16, body: String },
    #[error("Unrecognized gateway response - {0}")]
    MalformedResponse(String),
}

impl From<quick_xml::de::DeError> for GatewayError {
    fn from(value: quick_xml::de::DeError) -> Self {
        GatewayError::MalformedResponse(value.to_string())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration key {0}")]
    Missing(&'static str),
    #[error("Configuration key {0} is empty")]
    Empty(&'static str),
    #[error("Invalid value for configuration key {key} - {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Reasons a transaction or capture is refused before it is sent.
///
/// Messages start with the gateway's own "unable to read request" text so the
/// two sources read the same to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Server was unable to read request. Missing transaction field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Server was unable to read request. Routing number must be 9 digits")]
    InvalidRoutingNumber,
    #[error("Server was unable to read request. Account number must contain only digits")]
    InvalidAccountNumber,
    #[error("Server was unable to read request. Amount {0} is negative")]
    NegativeAmount(Decimal),
    #[error("Server was unable to read request. Amount {0} has fractions of a cent")]
    SubCentAmount(Decimal),
}
