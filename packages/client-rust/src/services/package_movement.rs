//! Postal code inquiry (`pmis` v4). The remote service is deprecated in
//! favour of [`ValidatePostalRequest`](super::ValidatePostalRequest).

use fedex_core::{Response, SchemaError, SchemaFactory, SchemaObject};
use tracing::warn;

use super::DEFAULT_CARRIER;
use crate::classify;
use crate::envelope::{Envelope, VersionInfo};
use crate::error::{RemoteErrorKind, RequestError};
use crate::request::OperationAdapter;
use crate::traits::Transport;
use crate::transport::TransportError;

#[derive(Debug)]
pub struct PostalCodeInquiryRequest {
    postal_code: String,
    country_code: String,
    carrier_code: String,
}

impl PostalCodeInquiryRequest {
    #[must_use]
    pub fn new(postal_code: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            postal_code: postal_code.into(),
            country_code: country_code.into(),
            carrier_code: DEFAULT_CARRIER.to_string(),
        }
    }

    #[must_use]
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    #[must_use]
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn set_carrier_code(&mut self, code: impl Into<String>) {
        self.carrier_code = code.into();
    }
}

impl OperationAdapter for PostalCodeInquiryRequest {
    fn version(&self) -> VersionInfo {
        VersionInfo::new("pmis", 4, 0, 0)
    }

    fn prepare_fields(&mut self, _factory: &dyn SchemaFactory) -> Result<(), SchemaError> {
        warn!(
            service = "pmis",
            "postal code inquiry is deprecated; use ValidatePostalRequest"
        );
        Ok(())
    }

    fn assemble_and_dispatch(
        &self,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError> {
        let params = envelope
            .params()
            .with("PostalCode", self.postal_code.as_str())
            .with("CountryCode", self.country_code.as_str())
            .with("CarrierCode", self.carrier_code.as_str());
        transport.invoke("postalCodeInquiry", &params)
    }

    fn check_errors(&self, response: &Response) -> Result<(), RequestError> {
        classify::check_for_errors_with(response, |note| {
            if note.message_contains("Postal Code Not Found") {
                RemoteErrorKind::PostalCodeNotFound
            } else if note.message_contains("Invalid Postal Code Format") {
                RemoteErrorKind::InvalidPostalCodeFormat
            } else {
                RemoteErrorKind::Rejected
            }
        })
    }
}
