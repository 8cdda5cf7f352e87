//! Remote boundary: the SOAP actions the gateway exposes, the transport seam,
//! and the envelope codec.
mod http;
pub mod soap;

pub use http::HttpTransport;

use std::fmt;

#[cfg(test)]
use mockall::automock;

use crate::GatewayError;

/// XML namespace of the transaction processing service.
pub const SERVICE_NAMESPACE: &str = "https://ssl.selectpayment.com/PV";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoapAction {
    TestConnection,
    TestCredentials,
    AuthorizeTransaction,
    CaptureTransaction,
    VoidTransaction,
    RefundTransaction,
}

impl SoapAction {
    pub fn name(&self) -> &'static str {
        match self {
            SoapAction::TestConnection => "TestConnection",
            SoapAction::TestCredentials => "TestCredentials",
            SoapAction::AuthorizeTransaction => "AuthorizeTransaction",
            SoapAction::CaptureTransaction => "CaptureTransaction",
            SoapAction::VoidTransaction => "VoidTransaction",
            SoapAction::RefundTransaction => "RefundTransaction",
        }
    }

    /// Value of the `SOAPAction` HTTP header, quotes included.
    pub fn header_value(&self) -> String {
        format!("\"{}/{}\"", SERVICE_NAMESPACE, self.name())
    }
}

impl fmt::Display for SoapAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Delivers one SOAP envelope and returns the raw response envelope.
///
/// Implementations return the body of SOAP fault responses as `Ok`, even when
/// they arrive with an HTTP error status; deciding what a fault means is up to
/// the caller.
#[cfg_attr(test, automock)]
pub trait SoapTransport {
    fn send(&self, action: SoapAction, envelope: String) -> Result<String, GatewayError>;
}

impl<T: SoapTransport + ?Sized> SoapTransport for &T {
    fn send(&self, action: SoapAction, envelope: String) -> Result<String, GatewayError> {
        (**self).send(action, envelope)
    }
}

impl<T: SoapTransport + ?Sized> SoapTransport for Box<T> {
    fn send(&self, action: SoapAction, envelope: String) -> Result<String, GatewayError> {
        (**self).send(action, envelope)
    }
}
