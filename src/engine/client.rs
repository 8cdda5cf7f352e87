//! SOAP-backed implementation of the transaction processor.
use std::fmt;

use log::debug;
use log::info;
use log::warn;
use rust_decimal::Decimal;

use super::TransactionProcessor;
use crate::check_amount;
use crate::io::soap;
use crate::io::soap::SoapReply;
use crate::io::HttpTransport;
use crate::io::SoapAction;
use crate::io::SoapTransport;
use crate::Credentials;
use crate::GatewayConfig;
use crate::GatewayError;
use crate::GatewayResponse;
use crate::ReferenceNumber;
use crate::Transaction;

const CREDENTIALS_ACCEPTED: &str = "Success";

/// Client for the ACH transaction processing service.
///
/// Every operation is a single blocking round trip. Gateway rejections come
/// back as an unsuccessful [`GatewayResponse`] carrying the gateway's own text;
/// `Err` is reserved for failures that kept the gateway from deciding.
pub struct TransactionClient<T> {
    credentials: Credentials,
    transport: T,
}

impl<T> fmt::Debug for TransactionClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionClient")
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl TransactionClient<HttpTransport> {
    /// Creates a client talking HTTP to the configured endpoint.
    pub fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let transport = HttpTransport::new(config)?;
        Ok(TransactionClient::new(
            config.credentials().clone(),
            transport,
        ))
    }
}

impl<T: SoapTransport> TransactionClient<T> {
    pub fn new(credentials: Credentials, transport: T) -> Self {
        TransactionClient {
            credentials,
            transport,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn call(&self, action: SoapAction, envelope: String) -> Result<SoapReply, GatewayError> {
        debug!("Sending {}", action);
        let xml = self.transport.send(action, envelope)?;
        soap::decode(action, &xml)
    }

    fn transaction_call(
        &self,
        action: SoapAction,
        envelope: String,
    ) -> Result<GatewayResponse, GatewayError> {
        let response = match self.call(action, envelope)? {
            SoapReply::Fault { code, message } => GatewayResponse {
                success: false,
                message,
                reference_number: None,
                code,
            },
            SoapReply::Transaction(result) => {
                let code = result.response_code.filter(|code| !code.is_empty());
                let message = result
                    .response_message
                    .filter(|message| !message.is_empty())
                    .or_else(|| code.clone())
                    .unwrap_or_else(|| default_message(action, result.success));
                GatewayResponse {
                    success: result.success,
                    message,
                    reference_number: result.reference_number.and_then(ReferenceNumber::new),
                    code,
                }
            }
            other => return Err(unexpected(action, &other)),
        };
        if response.success {
            info!(
                "{} accepted, reference {}",
                action,
                response
                    .reference_number
                    .as_ref()
                    .map(ReferenceNumber::as_str)
                    .unwrap_or("-")
            );
        } else {
            warn!("{} rejected - {}", action, response.message);
        }
        Ok(response)
    }
}

impl<T: SoapTransport> TransactionProcessor for TransactionClient<T> {
    fn test_connection(&self) -> Result<bool, GatewayError> {
        match self.call(SoapAction::TestConnection, soap::test_connection_request())? {
            SoapReply::Connection(reachable) => Ok(reachable),
            SoapReply::Fault { message, .. } => {
                warn!("TestConnection faulted - {}", message);
                Ok(false)
            }
            other => Err(unexpected(SoapAction::TestConnection, &other)),
        }
    }

    fn test_credentials(&self) -> Result<bool, GatewayError> {
        let envelope = soap::test_credentials_request(&self.credentials);
        match self.call(SoapAction::TestCredentials, envelope)? {
            SoapReply::Credentials(value) => {
                let accepted = value.trim().eq_ignore_ascii_case(CREDENTIALS_ACCEPTED);
                if !accepted {
                    warn!("Credentials not accepted - {}", value);
                }
                Ok(accepted)
            }
            SoapReply::Fault { message, .. } => {
                warn!("TestCredentials faulted - {}", message);
                Ok(false)
            }
            other => Err(unexpected(SoapAction::TestCredentials, &other)),
        }
    }

    fn authorize(&self, transaction: &Transaction) -> Result<GatewayResponse, GatewayError> {
        let valid = match transaction.validate() {
            Ok(valid) => valid,
            Err(e) => {
                warn!("{:?} not sent - {}", transaction, e);
                return Ok(GatewayResponse::rejected(e.to_string()));
            }
        };
        let envelope = soap::authorize_request(&self.credentials, &valid);
        let response = self.transaction_call(SoapAction::AuthorizeTransaction, envelope)?;
        if response.success && response.reference_number.is_none() {
            return Err(GatewayError::MalformedResponse(
                "authorization accepted without a reference number".to_string(),
            ));
        }
        Ok(response)
    }

    fn capture(
        &self,
        reference: &ReferenceNumber,
        amount: Decimal,
    ) -> Result<GatewayResponse, GatewayError> {
        if let Err(e) = check_amount(amount) {
            warn!("Capture of {} not sent - {}", reference, e);
            return Ok(GatewayResponse::rejected(e.to_string()));
        }
        let envelope = soap::capture_request(&self.credentials, reference, amount);
        self.transaction_call(SoapAction::CaptureTransaction, envelope)
    }

    fn void(&self, reference: &ReferenceNumber) -> Result<GatewayResponse, GatewayError> {
        let envelope = soap::void_request(&self.credentials, reference);
        self.transaction_call(SoapAction::VoidTransaction, envelope)
    }

    fn refund(&self, reference: &ReferenceNumber) -> Result<GatewayResponse, GatewayError> {
        let envelope = soap::refund_request(&self.credentials, reference);
        self.transaction_call(SoapAction::RefundTransaction, envelope)
    }
}

fn default_message(action: SoapAction, success: bool) -> String {
    if success {
        format!("{} succeeded", action)
    } else {
        format!("{} was declined", action)
    }
}

fn unexpected(action: SoapAction, reply: &SoapReply) -> GatewayError {
    GatewayError::MalformedResponse(format!("unexpected {} reply {:?}", action, reply))
}
