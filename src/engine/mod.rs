mod client;

pub use client::TransactionClient;

#[cfg(test)]
use mockall::automock;
use rust_decimal::Decimal;

use crate::GatewayError;
use crate::GatewayResponse;
use crate::ReferenceNumber;
use crate::Transaction;

/// Operations offered by an ACH transaction gateway.
#[cfg_attr(test, automock)]
pub trait TransactionProcessor {
    /// Pings the gateway.
    fn test_connection(&self) -> Result<bool, GatewayError>;
    /// Asks the gateway whether the configured credentials are valid.
    fn test_credentials(&self) -> Result<bool, GatewayError>;
    /// Submits a transaction for authorization. On success the response carries
    /// the reference number used by every later call.
    fn authorize(&self, transaction: &Transaction) -> Result<GatewayResponse, GatewayError>;
    /// Captures up to the authorized amount.
    fn capture(
        &self,
        reference: &ReferenceNumber,
        amount: Decimal,
    ) -> Result<GatewayResponse, GatewayError>;
    /// Cancels a transaction that has not settled yet.
    fn void(&self, reference: &ReferenceNumber) -> Result<GatewayResponse, GatewayError>;
    /// Returns the funds of a settled transaction.
    fn refund(&self, reference: &ReferenceNumber) -> Result<GatewayResponse, GatewayError>;
}
