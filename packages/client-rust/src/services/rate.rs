//! Pre-ship rating (`crs` v24).

use fedex_core::{SchemaError, SchemaFactory, SchemaObject};

use crate::envelope::{Envelope, VersionInfo};
use crate::request::OperationAdapter;
use crate::traits::Transport;
use crate::transport::TransportError;

/// Quotes shipping charges, optionally with transit times.
///
/// Populate the shipper, recipient and packages on
/// [`requested_shipment_mut`](Self::requested_shipment_mut) and
/// [`add_package`](Self::add_package), then send.
#[derive(Debug, Default)]
pub struct RateRequest {
    requested_shipment: SchemaObject,
    return_transit_and_commit: bool,
}

impl RateRequest {
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

    /// Ask for transit time and commitment alongside the rates.
    pub fn return_transit_and_commit(&mut self, value: bool) {
        self.return_transit_and_commit = value;
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
}

impl OperationAdapter for RateRequest {
    fn version(&self) -> VersionInfo {
        VersionInfo::new("crs", 24, 0, 0)
    }

    fn prepare_fields(&mut self, factory: &dyn SchemaFactory) -> Result<(), SchemaError> {
        self.requested_shipment = super::requested_shipment(factory)?;
        Ok(())
    }

    fn assemble_and_dispatch(
        &self,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError> {
        let params = envelope
            .params()
            .with("RequestedShipment", self.requested_shipment.clone())
            .with("ReturnTransitAndCommit", self.return_transit_and_commit);
        transport.invoke("getRates", &params)
    }
}

#[cfg(test)]
mod tests {
    use fedex_core::SchemaValue;

    use super::*;
    use crate::services::testing::Fixture;

    #[test]
    fn prepares_sender_paid_empty_shipment() {
        let fx = Fixture::new();
        let request = fx.request(RateRequest::new());
        let shipment = request.adapter().requested_shipment();
        assert_eq!(
            shipment.object("ShippingChargesPayment").unwrap().text("PaymentType"),
            Some("SENDER")
        );
        assert_eq!(shipment.object("TotalWeight").unwrap().text("Units"), Some("LB"));
        assert!(shipment.object("Shipper").unwrap().object("Address").is_some());
        assert_eq!(shipment.get("PackageCount"), Some(&SchemaValue::from(0_i64)));
    }

    #[test]
    fn rate_client_detail_carries_region() {
        let fx = Fixture::new();
        let request = fx.request(RateRequest::new());
        assert_eq!(request.envelope().client_detail().text("Region"), Some("US"));
    }

    #[test]
    fn sends_get_rates_with_packages() {
        let fx = Fixture::new();
        fx.succeed("getRates");
        let mut request = fx.request(RateRequest::new());
        let weight = request
            .create_object("Weight")
            .and_then(|w| w.with("Units", "LB"))
            .and_then(|w| w.with("Value", 1.0))
            .unwrap();
        let package = request
            .create_object("RequestedPackageLineItem")
            .and_then(|p| p.with("Weight", weight))
            .and_then(|p| p.with("GroupPackageCount", 1_i64))
            .unwrap();
        {
            let adapter = request.adapter_mut().unwrap();
            adapter.add_package(package).unwrap();
            adapter.return_transit_and_commit(true);
            adapter
                .requested_shipment_mut()
                .set("DropoffType", "REGULAR_PICKUP")
                .unwrap();
        }
        request.send().unwrap();

        let call = fx.transport.last_call().unwrap();
        assert_eq!(call.operation, "getRates");
        let shipment = call.params.object("RequestedShipment").unwrap();
        assert_eq!(shipment.get("PackageCount"), Some(&SchemaValue::from(1_i64)));
        assert_eq!(shipment.text("DropoffType"), Some("REGULAR_PICKUP"));
        assert_eq!(call.params.get("ReturnTransitAndCommit"), Some(&SchemaValue::from(true)));
    }
}
