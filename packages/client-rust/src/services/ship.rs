//! Shipment processing, validation and deletion (`ship` v23).

use fedex_core::{Response, SchemaError, SchemaFactory, SchemaObject, SchemaValue};

use crate::envelope::{Envelope, VersionInfo};
use crate::error::RequestError;
use crate::request::{OperationAdapter, Request};
use crate::traits::Transport;
use crate::transport::TransportError;

fn ship_version() -> VersionInfo {
    VersionInfo::new("ship", 23, 0, 0)
}

// ---------------------------------------------------------------------------
// ProcessShipmentRequest
// ---------------------------------------------------------------------------

/// Creates a shipment and returns its labels.
///
/// [`Request::send_validation`] runs the same payload through
/// `validateShipment`, which checks it without creating anything.
#[derive(Debug, Default)]
pub struct ProcessShipmentRequest {
    requested_shipment: SchemaObject,
}

impl ProcessShipmentRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn requested_shipment(&self) -> &SchemaObject {
        &self.requested_shipment
    }

    pub fn requested_shipment_mut(&mut self) -> &mut SchemaObject {
        &mut self.requested_shipment
    }

    /// Adds a `RequestedPackageLineItem`, updating the package count and the
    /// total weight.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if called before the request is prepared.
    pub fn add_package(&mut self, item: SchemaObject) -> Result<(), SchemaError> {
        super::add_package(&mut self.requested_shipment, item)
    }

    fn dispatch(
        &self,
        operation: &str,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError> {
        let params = envelope
            .params()
            .with("RequestedShipment", self.requested_shipment.clone());
        transport.invoke(operation, &params)
    }

    /// Sends the shipment to `validateShipment`.
    ///
    /// # Errors
    ///
    /// Propagates the transport's error unchanged.
    pub fn dispatch_validation(
        &self,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError> {
        self.dispatch("validateShipment", envelope, transport)
    }
}

impl OperationAdapter for ProcessShipmentRequest {
    fn version(&self) -> VersionInfo {
        ship_version()
    }

    fn prepare_fields(&mut self, factory: &dyn SchemaFactory) -> Result<(), SchemaError> {
        let mut shipment = super::requested_shipment(factory)?;
        let responsible = super::party(factory)?;
        let payor = factory.create("Payor")?.with("ResponsibleParty", responsible)?;
        let payment = shipment
            .object_mut("ShippingChargesPayment")
            .ok_or_else(|| SchemaError::NotAnObject {
                type_name: "RequestedShipment".to_string(),
                field: "ShippingChargesPayment".to_string(),
            })?;
        payment.set("Payor", payor)?;
        payment.set_path("Payor.ResponsibleParty.Address.CountryCode", "US")?;

        shipment.set("LabelSpecification", factory.create("LabelSpecification")?)?;
        shipment.set(
            "RateRequestTypes",
            SchemaValue::Sequence(vec![SchemaValue::from("PREFERRED")]),
        )?;
        self.requested_shipment = shipment;
        Ok(())
    }

    fn assemble_and_dispatch(
        &self,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError> {
        self.dispatch("processShipment", envelope, transport)
    }
}

impl Request<ProcessShipmentRequest> {
    /// Validates the shipment remotely without creating it. Classification
    /// is the same as for [`send`](Request::send).
    ///
    /// # Errors
    ///
    /// Same as [`send`](Request::send).
    pub fn send_validation(&mut self) -> Result<&Response, RequestError> {
        self.send_with(ProcessShipmentRequest::dispatch_validation)
    }
}

// ---------------------------------------------------------------------------
// DeleteShipmentRequest
// ---------------------------------------------------------------------------

/// Cancels a shipment by tracking number.
#[derive(Debug)]
pub struct DeleteShipmentRequest {
    tracking_id: SchemaObject,
    deletion_control: String,
}

impl Default for DeleteShipmentRequest {
    fn default() -> Self {
        Self {
            tracking_id: SchemaObject::default(),
            deletion_control: "DELETE_ALL_PACKAGES".to_string(),
        }
    }
}

impl DeleteShipmentRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tracking_id(&self) -> &SchemaObject {
        &self.tracking_id
    }

    /// Sets the tracking number and its type (e.g. `"EXPRESS"`, `"GROUND"`).
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if called before the request is prepared.
    pub fn set_tracking_number(&mut self, number: &str, id_type: &str) -> Result<(), SchemaError> {
        self.tracking_id.set("TrackingNumber", number)?;
        self.tracking_id.set("TrackingIdType", id_type)
    }

    /// Sets the deletion mode, e.g. `"DELETE_ONE_PACKAGE"`.
    pub fn set_deletion_control(&mut self, control: impl Into<String>) {
        self.deletion_control = control.into();
    }
}

impl OperationAdapter for DeleteShipmentRequest {
    fn version(&self) -> VersionInfo {
        ship_version()
    }

    fn prepare_fields(&mut self, factory: &dyn SchemaFactory) -> Result<(), SchemaError> {
        self.tracking_id = factory.create("TrackingId")?;
        Ok(())
    }

    fn assemble_and_dispatch(
        &self,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError> {
        let params = envelope
            .params()
            .with("ShipTimestamp", super::now())
            .with("TrackingId", self.tracking_id.clone())
            .with("DeletionControl", self.deletion_control.as_str());
        transport.invoke("deleteShipment", &params)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::config::{Credentials, RequestOptions};
    use crate::request::{RequestFactory, RequestState};
    use crate::schemas::SchemaCatalog;
    use crate::services::testing::Fixture;
    use crate::transport::{ScriptedTransport, ValidatingTransport};

    #[test]
    fn prepares_payor_label_and_rate_types() {
        let fx = Fixture::new();
        let request = fx.request(ProcessShipmentRequest::new());
        let shipment = request.adapter().requested_shipment();
        let country = shipment
            .object("ShippingChargesPayment")
            .and_then(|p| p.object("Payor"))
            .and_then(|p| p.object("ResponsibleParty"))
            .and_then(|p| p.object("Address"))
            .and_then(|a| a.text("CountryCode"));
        assert_eq!(country, Some("US"));
        assert!(shipment.object("LabelSpecification").is_some());
        let types = shipment.get("RateRequestTypes").unwrap().elements();
        assert_eq!(types[0].as_text(), Some("PREFERRED"));
    }

    #[test]
    fn send_validation_calls_validate_shipment() {
        let fx = Fixture::new();
        fx.succeed("validateShipment");
        let mut request = fx.request(ProcessShipmentRequest::new());
        request.send_validation().unwrap();
        assert_eq!(fx.transport.last_call().unwrap().operation, "validateShipment");
        assert_eq!(request.state(), RequestState::Succeeded);
    }

    #[test]
    fn send_calls_process_shipment() {
        let fx = Fixture::new();
        fx.succeed("processShipment");
        let mut request = fx.request(ProcessShipmentRequest::new());
        request.send().unwrap();
        assert_eq!(fx.transport.last_call().unwrap().operation, "processShipment");
    }

    #[test]
    fn missing_label_format_is_a_schema_validation_error() {
        let catalog = Arc::new(SchemaCatalog::standard().unwrap());
        let registry = catalog.registry("ship").unwrap();
        let transport = Arc::new(ValidatingTransport::new(ScriptedTransport::new(), registry));
        let factory = RequestFactory::new(
            Arc::new(Credentials::new("k", "p", "1", "2")),
            transport.clone(),
            catalog,
        );
        let mut request = factory
            .create(ProcessShipmentRequest::new(), &RequestOptions::default())
            .unwrap();
        match request.send().unwrap_err() {
            RequestError::SchemaValidation { detail } => {
                assert!(detail.contains("LabelSpecification: missing required field LabelFormatType"));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(transport.inner().calls().is_empty());
    }

    #[test]
    fn delete_sends_tracking_id_and_control() {
        let fx = Fixture::new();
        fx.transport.respond_json("deleteShipment", json!({"HighestSeverity": "SUCCESS"}));
        let mut request = fx.request(DeleteShipmentRequest::new());
        request
            .adapter_mut()
            .unwrap()
            .set_tracking_number("794798682968", "EXPRESS")
            .unwrap();
        request.send().unwrap();

        let call = fx.transport.last_call().unwrap();
        let names: Vec<&str> = call.params.names().skip(3).collect();
        assert_eq!(names, vec!["ShipTimestamp", "TrackingId", "DeletionControl"]);
        assert_eq!(
            call.params.object("TrackingId").unwrap().text("TrackingNumber"),
            Some("794798682968")
        );
        assert_eq!(
            call.params.get("DeletionControl").and_then(|v| v.as_text()),
            Some("DELETE_ALL_PACKAGES")
        );
    }
}
