use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use typed_builder::TypedBuilder;

use super::errors::ConfigError;
use super::errors::ValidationError;

/// Prefix the gateway puts on every message about a request it could not read.
/// Local validation failures reuse it so callers matching on it keep working.
pub const UNREADABLE_REQUEST: &str = "Server was unable to read request.";

/// Gateway credentials. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    store_id: String,
    store_key: String,
    entity_id: String,
    location_id: String,
}

impl Credentials {
    pub fn new(
        store_id: impl Into<String>,
        store_key: impl Into<String>,
        entity_id: impl Into<String>,
        location_id: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let credentials = Credentials {
            store_id: store_id.into(),
            store_key: store_key.into(),
            entity_id: entity_id.into(),
            location_id: location_id.into(),
        };
        for (key, value) in [
            ("store-id", &credentials.store_id),
            ("store-key", &credentials.store_key),
            ("entity-id", &credentials.entity_id),
            ("location-id", &credentials.location_id),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(key));
            }
        }
        Ok(credentials)
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn location_id(&self) -> &str {
        &self.location_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("store_id", &self.store_id)
            .field("store_key", &"***")
            .field("entity_id", &self.entity_id)
            .field("location_id", &self.location_id)
            .finish()
    }
}

/// Gateway-issued identifier correlating authorize, capture, void and refund.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceNumber(String);

impl ReferenceNumber {
    /// Wraps a reference number issued by the gateway. Returns `None` for a blank id.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(ReferenceNumber(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
}

impl AccountType {
    pub fn as_wire(&self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentOrigin {
    #[default]
    Internet,
    Telephone,
}

impl PaymentOrigin {
    pub fn as_wire(&self) -> &'static str {
        match self {
            PaymentOrigin::Internet => "Internet",
            PaymentOrigin::Telephone => "Telephone",
        }
    }
}

/// An ACH debit submitted for authorization.
///
/// Every field is optional at build time so that an incomplete transaction can
/// still be handed to the client, which rejects it before any remote call.
///
/// # Examples
///
/// ```no_run
/// use profitstars_ach::Transaction;
/// use rust_decimal_macros::dec;
///
/// let transaction = Transaction::builder()
///     .routing_number("111000025")
///     .account_number("5637492437")
///     .total_amount(dec!(9.95))
///     .transaction_number("INV-1001")
///     .name_on_account("Jane Doe")
///     .effective_date(chrono::Utc::now().date_naive())
///     .build();
/// ```
#[derive(Clone, Default, PartialEq, TypedBuilder)]
pub struct Transaction {
    #[builder(default, setter(into, strip_option))]
    routing_number: Option<String>,
    #[builder(default, setter(into, strip_option))]
    account_number: Option<String>,
    #[builder(default, setter(strip_option))]
    total_amount: Option<Decimal>,
    #[builder(default, setter(into, strip_option))]
    transaction_number: Option<String>,
    #[builder(default, setter(into, strip_option))]
    name_on_account: Option<String>,
    #[builder(default, setter(strip_option))]
    effective_date: Option<NaiveDate>,
    #[builder(default, setter(into))]
    description: String,
    #[builder(default)]
    account_type: AccountType,
    #[builder(default)]
    payment_origin: PaymentOrigin,
}

impl Transaction {
    pub fn routing_number(&self) -> Option<&str> {
        self.routing_number.as_deref()
    }

    pub fn account_number(&self) -> Option<&str> {
        self.account_number.as_deref()
    }

    pub fn total_amount(&self) -> Option<Decimal> {
        self.total_amount
    }

    pub fn transaction_number(&self) -> Option<&str> {
        self.transaction_number.as_deref()
    }

    pub fn name_on_account(&self) -> Option<&str> {
        self.name_on_account.as_deref()
    }

    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.effective_date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn payment_origin(&self) -> PaymentOrigin {
        self.payment_origin
    }

    /// Checks that every required field is present and well formed.
    pub fn validate(&self) -> Result<ValidTransaction<'_>, ValidationError> {
        let mut missing = vec![];
        let routing_number = present(&self.routing_number, "routing_number", &mut missing);
        let account_number = present(&self.account_number, "account_number", &mut missing);
        let transaction_number =
            present(&self.transaction_number, "transaction_number", &mut missing);
        let name_on_account = present(&self.name_on_account, "name_on_account", &mut missing);
        if self.total_amount.is_none() {
            missing.push("total_amount");
        }
        if self.effective_date.is_none() {
            missing.push("effective_date");
        }
        let (
            Some(routing_number),
            Some(account_number),
            Some(transaction_number),
            Some(name_on_account),
            Some(total_amount),
            Some(effective_date),
        ) = (
            routing_number,
            account_number,
            transaction_number,
            name_on_account,
            self.total_amount,
            self.effective_date,
        )
        else {
            return Err(ValidationError::MissingFields(missing));
        };

        if routing_number.len() != 9 || !is_digits(routing_number) {
            return Err(ValidationError::InvalidRoutingNumber);
        }
        if !is_digits(account_number) {
            return Err(ValidationError::InvalidAccountNumber);
        }
        check_amount(total_amount)?;

        Ok(ValidTransaction {
            routing_number,
            account_number,
            total_amount,
            transaction_number,
            name_on_account,
            effective_date,
            description: &self.description,
            account_type: self.account_type,
            payment_origin: self.payment_origin,
        })
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction [number {} - amount {} - date {}]",
            self.transaction_number.as_deref().unwrap_or("-"),
            self.total_amount
                .map(|amount| amount.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.effective_date
                .map(|date| date.to_string())
                .unwrap_or_else(|| "-".to_string()),
        )
    }
}

/// Amounts must be zero or positive and expressed in whole cents.
pub fn check_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::NegativeAmount(amount));
    }
    if amount.normalize().scale() > 2 {
        return Err(ValidationError::SubCentAmount(amount));
    }
    Ok(())
}

fn present<'a>(
    field: &'a Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<&'a str> {
    match field.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Some(value),
        _ => {
            missing.push(name);
            None
        }
    }
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// A transaction that passed [`Transaction::validate`], ready to be encoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidTransaction<'a> {
    pub routing_number: &'a str,
    pub account_number: &'a str,
    pub total_amount: Decimal,
    pub transaction_number: &'a str,
    pub name_on_account: &'a str,
    pub effective_date: NaiveDate,
    pub description: &'a str,
    pub account_type: AccountType,
    pub payment_origin: PaymentOrigin,
}

/// Outcome of one gateway operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub success: bool,
    pub message: String,
    pub reference_number: Option<ReferenceNumber>,
    pub code: Option<String>,
}

impl GatewayResponse {
    pub fn rejected(message: impl Into<String>) -> Self {
        GatewayResponse {
            success: false,
            message: message.into(),
            reference_number: None,
            code: None,
        }
    }
}

/// Lifecycle of a single transaction as observed through the gateway calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionState {
    #[default]
    Uninitiated,
    Authorized,
    Captured,
    Voided,
    /// Cleared by the banking network. Not reported by any call; see
    /// `TransactionSession::mark_settled`.
    Settled,
    Refunded,
}

impl TransactionState {
    pub fn can_capture(&self) -> bool {
        matches!(self, TransactionState::Authorized)
    }

    pub fn can_void(&self) -> bool {
        matches!(
            self,
            TransactionState::Authorized | TransactionState::Captured
        )
    }

    pub fn can_refund(&self) -> bool {
        matches!(self, TransactionState::Settled)
    }
}
