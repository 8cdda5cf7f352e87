//! SOAP 1.1 envelopes for the transaction processing service.
//!
//! Requests are written as templates with every caller value escaped; replies
//! are deserialized with `quick-xml`, keyed on the local element names.
use quick_xml::escape::escape;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::SoapAction;
use super::SERVICE_NAMESPACE;
use crate::Credentials;
use crate::GatewayError;
use crate::ReferenceNumber;
use crate::ValidTransaction;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn envelope(action: SoapAction, parameters: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <{action} xmlns="{namespace}">{parameters}</{action}>
  </soap:Body>
</soap:Envelope>"#,
        action = action.name(),
        namespace = SERVICE_NAMESPACE,
        parameters = parameters,
    )
}

fn element(name: &str, value: &str) -> String {
    format!("<{name}>{}</{name}>", escape(value))
}

/// Callers reject sub-cent amounts before encoding, so this never rounds.
fn amount(mut value: Decimal) -> String {
    value.rescale(2);
    value.to_string()
}

fn store_parameters(credentials: &Credentials) -> String {
    [
        element("storeId", credentials.store_id()),
        element("storeKey", credentials.store_key()),
    ]
    .concat()
}

fn location_parameters(credentials: &Credentials) -> String {
    [
        store_parameters(credentials),
        element("entityId", credentials.entity_id()),
        element("locationId", credentials.location_id()),
    ]
    .concat()
}

pub fn test_connection_request() -> String {
    envelope(SoapAction::TestConnection, "")
}

pub fn test_credentials_request(credentials: &Credentials) -> String {
    envelope(
        SoapAction::TestCredentials,
        &location_parameters(credentials),
    )
}

pub fn authorize_request(credentials: &Credentials, transaction: &ValidTransaction<'_>) -> String {
    let fields = [
        element("EntityId", credentials.entity_id()),
        element("LocationId", credentials.location_id()),
        element("PaymentOrigin", transaction.payment_origin.as_wire()),
        element("AccountType", transaction.account_type.as_wire()),
        element("OperationType", "Sale"),
        element(
            "EffectiveDate",
            &transaction.effective_date.format(DATE_FORMAT).to_string(),
        ),
        element("Description", transaction.description),
        element("TotalAmount", &amount(transaction.total_amount)),
        element("TransactionNumber", transaction.transaction_number),
        element("NameOnAccount", transaction.name_on_account),
        element("RoutingNumber", transaction.routing_number),
        element("AccountNumber", transaction.account_number),
    ]
    .concat();
    let parameters = format!(
        "{}<transaction>{}</transaction>",
        store_parameters(credentials),
        fields
    );
    envelope(SoapAction::AuthorizeTransaction, &parameters)
}

pub fn capture_request(
    credentials: &Credentials,
    reference: &ReferenceNumber,
    capture_amount: Decimal,
) -> String {
    let parameters = [
        location_parameters(credentials),
        element("originalReferenceNumber", reference.as_str()),
        element("captureAmount", &amount(capture_amount)),
    ]
    .concat();
    envelope(SoapAction::CaptureTransaction, &parameters)
}

pub fn void_request(credentials: &Credentials, reference: &ReferenceNumber) -> String {
    reference_request(SoapAction::VoidTransaction, credentials, reference)
}

pub fn refund_request(credentials: &Credentials, reference: &ReferenceNumber) -> String {
    reference_request(SoapAction::RefundTransaction, credentials, reference)
}

fn reference_request(
    action: SoapAction,
    credentials: &Credentials,
    reference: &ReferenceNumber,
) -> String {
    let parameters = [
        location_parameters(credentials),
        element("originalReferenceNumber", reference.as_str()),
    ]
    .concat();
    envelope(action, &parameters)
}

/// What the gateway answered, before it is mapped onto the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoapReply {
    Fault {
        code: Option<String>,
        message: String,
    },
    Connection(bool),
    Credentials(String),
    Transaction(TransactionResult),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionResult {
    pub success: bool,
    #[serde(default)]
    pub response_code: Option<String>,
    #[serde(default)]
    pub response_message: Option<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Body")]
    body: Body,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(rename = "$value")]
    content: BodyContent,
}

#[derive(Debug, Deserialize)]
enum BodyContent {
    Fault(Fault),
    TestConnectionResponse(TestConnectionResponse),
    TestCredentialsResponse(TestCredentialsResponse),
    AuthorizeTransactionResponse(TransactionResponse),
    CaptureTransactionResponse(TransactionResponse),
    VoidTransactionResponse(TransactionResponse),
    RefundTransactionResponse(TransactionResponse),
}

#[derive(Debug, Deserialize)]
struct Fault {
    #[serde(rename = "faultcode", default)]
    code: Option<String>,
    #[serde(rename = "faultstring")]
    message: String,
}

#[derive(Debug, Deserialize)]
struct TestConnectionResponse {
    #[serde(rename = "TestConnectionResult")]
    result: bool,
}

#[derive(Debug, Deserialize)]
struct TestCredentialsResponse {
    #[serde(rename = "TestCredentialsResult")]
    result: CredentialsResult,
}

#[derive(Debug, Deserialize)]
struct CredentialsResult {
    #[serde(rename = "returnValue", alias = "ReturnValue")]
    return_value: String,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    #[serde(
        rename = "AuthorizeTransactionResult",
        alias = "CaptureTransactionResult",
        alias = "VoidTransactionResult",
        alias = "RefundTransactionResult"
    )]
    result: TransactionResult,
}

/// Parses a response envelope, checking that it answers `action`.
///
/// Text values are trimmed at both ends by the deserializer; whitespace and
/// line breaks inside a message are kept as sent.
pub fn decode(action: SoapAction, xml: &str) -> Result<SoapReply, GatewayError> {
    let envelope: Envelope = quick_xml::de::from_str(xml)?;
    let reply = match (action, envelope.body.content) {
        (_, BodyContent::Fault(fault)) => SoapReply::Fault {
            code: fault.code.filter(|code| !code.is_empty()),
            message: fault.message,
        },
        (SoapAction::TestConnection, BodyContent::TestConnectionResponse(r)) => {
            SoapReply::Connection(r.result)
        }
        (SoapAction::TestCredentials, BodyContent::TestCredentialsResponse(r)) => {
            SoapReply::Credentials(r.result.return_value)
        }
        (SoapAction::AuthorizeTransaction, BodyContent::AuthorizeTransactionResponse(r))
        | (SoapAction::CaptureTransaction, BodyContent::CaptureTransactionResponse(r))
        | (SoapAction::VoidTransaction, BodyContent::VoidTransactionResponse(r))
        | (SoapAction::RefundTransaction, BodyContent::RefundTransactionResponse(r)) => {
            SoapReply::Transaction(r.result)
        }
        (action, other) => {
            return Err(GatewayError::MalformedResponse(format!(
                "expected a {} response, got {:?}",
                action, other
            )))
        }
    };
    Ok(reply)
}

/// Returns true when `xml` is a SOAP fault envelope.
pub fn is_fault(xml: &str) -> bool {
    matches!(
        quick_xml::de::from_str::<Envelope>(xml),
        Ok(Envelope {
            body: Body {
                content: BodyContent::Fault(_)
            }
        })
    )
}
