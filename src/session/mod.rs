//! Stateful front end over a [`TransactionProcessor`].
//!
//! A session follows one transaction at a time: it remembers the reference
//! number the gateway handed out, the last message it sent back and the state
//! the transaction was last seen in. Each operation answers with a plain
//! `bool`; the details are read back from the session afterwards.
//!
//! # Example
//!
//! ```no_run
//! use profitstars_ach::{GatewayConfig, TransactionClient, TransactionSession, Transaction};
//!
//! let config = GatewayConfig::from_env()?;
//! let mut session = TransactionSession::new(TransactionClient::connect(&config)?);
//! let transaction = Transaction::builder()
//!     // ...
//!     .build();
//! if session.authorize_transaction(&transaction) {
//!     session.capture_transaction(transaction.total_amount().unwrap_or_default());
//! }
//! println!("{}", session.response_message());
//! ```
use std::fmt;

use log::warn;
use rust_decimal::Decimal;

use crate::GatewayError;
use crate::GatewayResponse;
use crate::ReferenceNumber;
use crate::Transaction;
use crate::TransactionProcessor;
use crate::TransactionState;

pub const NO_REFERENCE_MESSAGE: &str = "No reference number; authorize a transaction first";

pub struct TransactionSession<P> {
    processor: P,
    reference_number: Option<ReferenceNumber>,
    response_message: String,
    state: TransactionState,
    last_error: Option<GatewayError>,
}

impl<P> fmt::Debug for TransactionSession<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionSession")
            .field("reference_number", &self.reference_number)
            .field("response_message", &self.response_message)
            .field("state", &self.state)
            .finish()
    }
}

impl<P: TransactionProcessor> TransactionSession<P> {
    pub fn new(processor: P) -> Self {
        TransactionSession {
            processor,
            reference_number: None,
            response_message: String::new(),
            state: TransactionState::Uninitiated,
            last_error: None,
        }
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }

    pub fn reference_number(&self) -> Option<&ReferenceNumber> {
        self.reference_number.as_ref()
    }

    /// Points the session at an existing transaction, e.g. to refund one that
    /// was captured earlier. The transaction is assumed settled; the gateway
    /// has the final word.
    pub fn set_reference_number(&mut self, reference: ReferenceNumber) {
        self.resume(reference, TransactionState::Settled);
    }

    /// Picks up an existing transaction believed to be in `state`.
    pub fn resume(&mut self, reference: ReferenceNumber, state: TransactionState) {
        self.reference_number = Some(reference);
        self.state = state;
    }

    pub fn response_message(&self) -> &str {
        &self.response_message
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Fault raised by the last call when it never got a gateway verdict.
    pub fn last_error(&self) -> Option<&GatewayError> {
        self.last_error.as_ref()
    }

    /// Records that the current transaction cleared the banking network.
    pub fn mark_settled(&mut self) {
        self.state = TransactionState::Settled;
    }

    pub fn test_connection(&mut self) -> bool {
        let result = self.processor.test_connection();
        self.health_check("Connection", result)
    }

    pub fn test_credentials(&mut self) -> bool {
        let result = self.processor.test_credentials();
        self.health_check("Credentials", result)
    }

    /// Starts a new transaction. The previous reference number is dropped
    /// whether or not the authorization succeeds.
    pub fn authorize_transaction(&mut self, transaction: &Transaction) -> bool {
        self.reference_number = None;
        self.state = TransactionState::Uninitiated;
        let result = self.processor.authorize(transaction);
        self.record(result, TransactionState::Authorized)
    }

    /// Captures the transaction at the current reference number.
    pub fn capture_transaction(&mut self, amount: Decimal) -> bool {
        let Some(reference) = self.current_reference() else {
            return false;
        };
        if !self.state.can_capture() {
            warn!("Capturing {} while it is {:?}", reference, self.state);
        }
        let result = self.processor.capture(&reference, amount);
        self.record(result, TransactionState::Captured)
    }

    /// Voids the transaction at the current reference number.
    pub fn void_transaction(&mut self) -> bool {
        let Some(reference) = self.current_reference() else {
            return false;
        };
        if !self.state.can_void() {
            warn!("Voiding {} while it is {:?}", reference, self.state);
        }
        let result = self.processor.void(&reference);
        self.record(result, TransactionState::Voided)
    }

    /// Refunds the transaction at the current reference number.
    pub fn refund_transaction(&mut self) -> bool {
        let Some(reference) = self.current_reference() else {
            return false;
        };
        if !self.state.can_refund() {
            warn!("Refunding {} while it is {:?}", reference, self.state);
        }
        let result = self.processor.refund(&reference);
        self.record(result, TransactionState::Refunded)
    }

    fn current_reference(&mut self) -> Option<ReferenceNumber> {
        self.last_error = None;
        if self.reference_number.is_none() {
            self.response_message = NO_REFERENCE_MESSAGE.to_string();
        }
        self.reference_number.clone()
    }

    fn health_check(&mut self, what: &str, result: Result<bool, GatewayError>) -> bool {
        self.last_error = None;
        match result {
            Ok(true) => {
                self.response_message = format!("{} OK", what);
                true
            }
            Ok(false) => {
                self.response_message = format!("{} check failed", what);
                false
            }
            Err(e) => self.fail(e),
        }
    }

    fn record(
        &mut self,
        result: Result<GatewayResponse, GatewayError>,
        on_success: TransactionState,
    ) -> bool {
        self.last_error = None;
        match result {
            Ok(response) => {
                self.response_message = response.message;
                if response.success {
                    if let Some(reference) = response.reference_number {
                        self.reference_number = Some(reference);
                    }
                    self.state = on_success;
                }
                response.success
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, e: GatewayError) -> bool {
        warn!("Gateway call failed - {}", e);
        self.response_message = e.to_string();
        self.last_error = Some(e);
        false
    }
}
