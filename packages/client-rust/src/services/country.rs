//! Postal code validation (`cnty` v8).

use fedex_core::{SchemaError, SchemaFactory, SchemaObject};

use super::DEFAULT_CARRIER;
use crate::envelope::{Envelope, VersionInfo};
use crate::request::OperationAdapter;
use crate::traits::Transport;
use crate::transport::TransportError;

/// Validates a postal code and reports its state, city and location ids.
#[derive(Debug)]
pub struct ValidatePostalRequest {
    address: SchemaObject,
    carrier_code: String,
    check_for_mismatch: bool,
    routing_code: String,
}

impl Default for ValidatePostalRequest {
    fn default() -> Self {
        Self {
            address: SchemaObject::default(),
            carrier_code: DEFAULT_CARRIER.to_string(),
            check_for_mismatch: true,
            routing_code: "FDSD".to_string(),
        }
    }
}

impl ValidatePostalRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn address(&self) -> &SchemaObject {
        &self.address
    }

    pub fn address_mut(&mut self) -> &mut SchemaObject {
        &mut self.address
    }

    pub fn set_carrier_code(&mut self, code: impl Into<String>) {
        self.carrier_code = code.into();
    }

    pub fn set_check_for_mismatch(&mut self, check: bool) {
        self.check_for_mismatch = check;
    }

    pub fn set_routing_code(&mut self, code: impl Into<String>) {
        self.routing_code = code.into();
    }
}

impl OperationAdapter for ValidatePostalRequest {
    fn version(&self) -> VersionInfo {
        VersionInfo::new("cnty", 8, 0, 0)
    }

    fn prepare_fields(&mut self, factory: &dyn SchemaFactory) -> Result<(), SchemaError> {
        self.address = factory.create("Address")?;
        Ok(())
    }

    fn assemble_and_dispatch(
        &self,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError> {
        let params = envelope
            .params()
            .with("Address", self.address.clone())
            .with("ShipDateTime", super::now())
            .with("CarrierCode", self.carrier_code.as_str())
            .with("CheckForMismatch", self.check_for_mismatch)
            .with("RoutingCode", self.routing_code.as_str());
        transport.invoke("validatePostal", &params)
    }
}
