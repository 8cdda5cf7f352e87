#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::str::FromStr;

use fake::faker::name::en::Name;
use fake::Fake;
use profitstars_ach::{Credentials, GatewayError, SoapAction, SoapTransport, Transaction};
use rust_decimal::Decimal;

pub const STORE_KEY: &str = "fake-store-key";

pub const REFUND_NOT_CLEARED: &str = "Server was unable to process request. ---> An exception of type System.ArgumentException was thrown. The message was Transaction is in a state that cannot be refunded\nParameter name: originalReferenceNumber";

pub fn credentials() -> Credentials {
    Credentials::new("4100", STORE_KEY, "4200", "4300").unwrap()
}

/// A transaction against the routing/account pair the test environment accepts.
pub fn fake_transaction() -> Transaction {
    Transaction::builder()
        .routing_number("111000025")
        .account_number("5637492437")
        .total_amount(Decimal::new((0..9_999_999).fake::<i64>(), 2))
        .transaction_number((0..99999).fake::<u32>().to_string())
        .name_on_account(Name().fake::<String>())
        .effective_date(chrono::Local::now().date_naive())
        .build()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeState {
    Authorized,
    Captured,
    Voided,
    Settled,
    Refunded,
}

#[derive(Debug)]
struct FakeTransaction {
    amount: Decimal,
    state: FakeState,
}

#[derive(Debug, Default)]
struct Ledger {
    next_reference: u32,
    transactions: Vec<FakeTransaction>,
    references: HashMap<String, usize>,
    calls: Vec<SoapAction>,
}

impl Ledger {
    fn issue(&mut self, index: usize) -> String {
        self.next_reference += 1;
        let reference = format!("PS{:08}", self.next_reference);
        self.references.insert(reference.clone(), index);
        reference
    }
}

/// In-process stand-in for the gateway, answering with real SOAP envelopes.
#[derive(Debug, Default)]
pub struct FakeGateway {
    ledger: RefCell<Ledger>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the banking network clearing the transaction.
    pub fn settle(&self, reference: &str) {
        let mut ledger = self.ledger.borrow_mut();
        let index = ledger.references[reference];
        ledger.transactions[index].state = FakeState::Settled;
    }

    pub fn state_of(&self, reference: &str) -> Option<FakeState> {
        let ledger = self.ledger.borrow();
        ledger
            .references
            .get(reference)
            .map(|index| ledger.transactions[*index].state)
    }

    pub fn calls(&self) -> Vec<SoapAction> {
        self.ledger.borrow().calls.clone()
    }

    fn answer(&self, action: SoapAction, envelope: &str) -> String {
        let mut ledger = self.ledger.borrow_mut();
        ledger.calls.push(action);
        match action {
            SoapAction::TestConnection => wrap(
                "<TestConnectionResponse xmlns=\"https://ssl.selectpayment.com/PV\"><TestConnectionResult>true</TestConnectionResult></TestConnectionResponse>",
            ),
            SoapAction::TestCredentials => {
                let verdict = if field(envelope, "storeKey").as_deref() == Some(STORE_KEY) {
                    "Success"
                } else {
                    "Failure"
                };
                wrap(&format!(
                    "<TestCredentialsResponse xmlns=\"https://ssl.selectpayment.com/PV\"><TestCredentialsResult><returnValue>{}</returnValue></TestCredentialsResult></TestCredentialsResponse>",
                    verdict
                ))
            }
            SoapAction::AuthorizeTransaction => {
                let amount = field(envelope, "TotalAmount")
                    .and_then(|a| Decimal::from_str(&a).ok());
                let Some(amount) = amount else {
                    return fault(
                        "soap:Client",
                        "Server was unable to read request. ---&gt; There is an error in XML document (1, 2).",
                    );
                };
                ledger.transactions.push(FakeTransaction {
                    amount,
                    state: FakeState::Authorized,
                });
                let index = ledger.transactions.len() - 1;
                let reference = ledger.issue(index);
                result(action, true, "Transaction authorized", Some(&reference))
            }
            SoapAction::CaptureTransaction => {
                let Some(index) = lookup(&ledger, envelope) else {
                    return unknown_reference();
                };
                let amount = field(envelope, "captureAmount")
                    .and_then(|a| Decimal::from_str(&a).ok())
                    .unwrap_or_default();
                let transaction = &mut ledger.transactions[index];
                if transaction.state != FakeState::Authorized {
                    return result(action, false, "Transaction cannot be captured", None);
                }
                if amount > transaction.amount {
                    return result(
                        action,
                        false,
                        "Capture amount exceeds authorized amount",
                        None,
                    );
                }
                transaction.state = FakeState::Captured;
                let reference = ledger.issue(index);
                result(action, true, "Transaction captured", Some(&reference))
            }
            SoapAction::VoidTransaction => {
                let Some(index) = lookup(&ledger, envelope) else {
                    return unknown_reference();
                };
                let transaction = &mut ledger.transactions[index];
                match transaction.state {
                    FakeState::Authorized | FakeState::Captured => {
                        transaction.state = FakeState::Voided;
                        result(action, true, "Transaction voided", None)
                    }
                    _ => result(
                        action,
                        false,
                        "Transaction is in a state that cannot be voided",
                        None,
                    ),
                }
            }
            SoapAction::RefundTransaction => {
                let Some(index) = lookup(&ledger, envelope) else {
                    return unknown_reference();
                };
                let transaction = &mut ledger.transactions[index];
                if transaction.state != FakeState::Settled {
                    return fault(
                        "soap:Server",
                        "Server was unable to process request. ---&gt; An exception of type System.ArgumentException was thrown. The message was Transaction is in a state that cannot be refunded\nParameter name: originalReferenceNumber",
                    );
                }
                transaction.state = FakeState::Refunded;
                let reference = ledger.issue(index);
                result(action, true, "Transaction refunded", Some(&reference))
            }
        }
    }
}

impl SoapTransport for FakeGateway {
    fn send(&self, action: SoapAction, envelope: String) -> Result<String, GatewayError> {
        Ok(self.answer(action, &envelope))
    }
}

/// A transport that never reaches the gateway.
#[derive(Debug)]
pub struct Unreachable;

impl SoapTransport for Unreachable {
    fn send(&self, _action: SoapAction, _envelope: String) -> Result<String, GatewayError> {
        Err(GatewayError::HttpStatus {
            status: 504,
            body: "Gateway Timeout".to_string(),
        })
    }
}

fn lookup(ledger: &Ledger, envelope: &str) -> Option<usize> {
    field(envelope, "originalReferenceNumber")
        .and_then(|r| ledger.references.get(&r).copied())
}

fn field(envelope: &str, name: &str) -> Option<String> {
    let open = format!("<{}>", name);
    let close = format!("</{}>", name);
    let start = envelope.find(&open)? + open.len();
    let end = envelope[start..].find(&close)? + start;
    Some(envelope[start..end].to_string())
}

fn wrap(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?><soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\"><soap:Body>{}</soap:Body></soap:Envelope>",
        body
    )
}

fn fault(code: &str, message: &str) -> String {
    wrap(&format!(
        "<soap:Fault><faultcode>{}</faultcode><faultstring>{}</faultstring><detail /></soap:Fault>",
        code, message
    ))
}

fn unknown_reference() -> String {
    fault(
        "soap:Server",
        "Server was unable to process request. ---&gt; Unknown originalReferenceNumber",
    )
}

fn result(action: SoapAction, success: bool, message: &str, reference: Option<&str>) -> String {
    wrap(&format!(
        "<{action}Response xmlns=\"https://ssl.selectpayment.com/PV\"><{action}Result><Success>{success}</Success><ResponseCode>{code}</ResponseCode><ResponseMessage>{message}</ResponseMessage>{reference}</{action}Result></{action}Response>",
        action = action.name(),
        success = success,
        code = if success { "Success" } else { "Error" },
        message = message,
        reference = reference
            .map(|r| format!("<ReferenceNumber>{}</ReferenceNumber>", r))
            .unwrap_or_default(),
    ))
}
