//! Service availability and commitment (`vacs` v8).

use chrono::NaiveDate;
use fedex_core::{SchemaError, SchemaFactory, SchemaObject};

use super::DEFAULT_CARRIER;
use crate::envelope::{Envelope, VersionInfo};
use crate::request::OperationAdapter;
use crate::traits::Transport;
use crate::transport::TransportError;

/// Lists the services and delivery commitments available between two
/// addresses on a ship date, today unless set otherwise.
#[derive(Debug)]
pub struct AvailabilityCommitmentRequest {
    origin: SchemaObject,
    destination: SchemaObject,
    ship_date: NaiveDate,
    carrier_code: String,
    service: Option<String>,
    packaging: String,
}

impl Default for AvailabilityCommitmentRequest {
    fn default() -> Self {
        Self {
            origin: SchemaObject::default(),
            destination: SchemaObject::default(),
            ship_date: super::now().date_naive(),
            carrier_code: DEFAULT_CARRIER.to_string(),
            service: None,
            packaging: "YOUR_PACKAGING".to_string(),
        }
    }
}

impl AvailabilityCommitmentRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn origin(&self) -> &SchemaObject {
        &self.origin
    }

    pub fn origin_mut(&mut self) -> &mut SchemaObject {
        &mut self.origin
    }

    #[must_use]
    pub fn destination(&self) -> &SchemaObject {
        &self.destination
    }

    pub fn destination_mut(&mut self) -> &mut SchemaObject {
        &mut self.destination
    }

    #[must_use]
    pub fn ship_date(&self) -> NaiveDate {
        self.ship_date
    }

    pub fn set_ship_date(&mut self, date: NaiveDate) {
        self.ship_date = date;
    }

    pub fn set_carrier_code(&mut self, code: impl Into<String>) {
        self.carrier_code = code.into();
    }

    /// Restrict the answer to one service type, e.g. `"PRIORITY_OVERNIGHT"`.
    pub fn set_service(&mut self, service: impl Into<String>) {
        self.service = Some(service.into());
    }

    pub fn set_packaging(&mut self, packaging: impl Into<String>) {
        self.packaging = packaging.into();
    }
}

impl OperationAdapter for AvailabilityCommitmentRequest {
    fn version(&self) -> VersionInfo {
        VersionInfo::new("vacs", 8, 0, 0)
    }

    fn prepare_fields(&mut self, factory: &dyn SchemaFactory) -> Result<(), SchemaError> {
        self.origin = factory.create("Address")?;
        self.destination = factory.create("Address")?;
        Ok(())
    }

    fn assemble_and_dispatch(
        &self,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError> {
        let mut params = envelope.params();
        params.push("Origin", self.origin.clone());
        params.push("Destination", self.destination.clone());
        params.push("ShipDate", self.ship_date);
        params.push("CarrierCode", self.carrier_code.as_str());
        params.push_opt("Service", self.service.as_deref());
        params.push("Packaging", self.packaging.as_str());
        transport.invoke("serviceAvailability", &params)
    }
}
