use std::fmt;

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::Url;

use super::soap;
use super::SoapAction;
use super::SoapTransport;
use crate::GatewayConfig;
use crate::GatewayError;

const SOAP_ACTION_HEADER: &str = "SOAPAction";
const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Blocking HTTP transport posting SOAP 1.1 envelopes to the service endpoint.
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl HttpTransport {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .redirect(Policy::none())
            .build()?;
        Ok(HttpTransport {
            client,
            endpoint: config.endpoint().clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl SoapTransport for HttpTransport {
    fn send(&self, action: SoapAction, envelope: String) -> Result<String, GatewayError> {
        debug!("POST {} action {}", self.endpoint, action);
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .header(SOAP_ACTION_HEADER, action.header_value())
            .body(envelope)
            .send()?;
        let status = response.status();
        let body = response.text()?;
        debug!("{} answered with HTTP {}", action, status.as_u16());

        // Faults are delivered with a 500 status and still carry the verdict.
        if status.is_success() || soap::is_fault(&body) {
            Ok(body)
        } else {
            Err(GatewayError::HttpStatus {
                status: status.as_u16(),
                body,
            })
        }
    }
}
