//! Concrete operation adapters, one module per remote service.

pub mod address_validation;
pub mod availability;
pub mod country;
pub mod document;
pub mod location;
pub mod package_movement;
pub mod pickup;
pub mod rate;
pub mod ship;
pub mod track;

pub use address_validation::AddressValidationRequest;
pub use availability::AvailabilityCommitmentRequest;
pub use country::ValidatePostalRequest;
pub use document::{DocumentDetail, UploadDocumentsRequest, UploadImagesRequest};
pub use location::SearchLocationRequest;
pub use package_movement::PostalCodeInquiryRequest;
pub use pickup::CreatePickupRequest;
pub use rate::RateRequest;
pub use ship::{DeleteShipmentRequest, ProcessShipmentRequest};
pub use track::TrackRequest;

use chrono::{DateTime, FixedOffset, Local};
use fedex_core::{Scalar, SchemaError, SchemaFactory, SchemaObject, SchemaValue};

/// Carrier code used when the caller does not pick one (FedEx Express).
pub const DEFAULT_CARRIER: &str = "FDXE";

/// Current local time with its offset, for timestamp parameters.
pub(crate) fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// `Party` with empty `Contact` and `Address`.
pub(crate) fn party(factory: &dyn SchemaFactory) -> Result<SchemaObject, SchemaError> {
    factory
        .create("Party")?
        .with("Contact", factory.create("Contact")?)?
        .with("Address", factory.create("Address")?)
}

/// `RequestedShipment` defaults shared by rating and shipping: a timestamp,
/// zero total weight in pounds, empty shipper and recipient, sender pays, and
/// no packages yet.
pub(crate) fn requested_shipment(factory: &dyn SchemaFactory) -> Result<SchemaObject, SchemaError> {
    let total_weight = factory
        .create("Weight")?
        .with("Units", "LB")?
        .with("Value", 0.0)?;
    let payment = factory.create("Payment")?.with("PaymentType", "SENDER")?;
    factory
        .create("RequestedShipment")?
        .with("ShipTimestamp", now())?
        .with("TotalWeight", total_weight)?
        .with("Shipper", party(factory)?)?
        .with("Recipient", party(factory)?)?
        .with("ShippingChargesPayment", payment)?
        .with("PackageCount", 0_i64)?
        .with("RequestedPackageLineItems", SchemaValue::Sequence(Vec::new()))
}

/// Appends a `RequestedPackageLineItem`, adding its weight to `TotalWeight`
/// and incrementing `PackageCount`. A package without a weight counts as
/// zero.
pub(crate) fn add_package(shipment: &mut SchemaObject, item: SchemaObject) -> Result<(), SchemaError> {
    let weight = item
        .object("Weight")
        .and_then(|w| w.get("Value"))
        .and_then(number)
        .unwrap_or(0.0);
    shipment.push("RequestedPackageLineItems", item)?;

    let total = shipment
        .object("TotalWeight")
        .and_then(|w| w.get("Value"))
        .and_then(number)
        .unwrap_or(0.0);
    shipment.set_path("TotalWeight.Value", total + weight)?;

    let count = match shipment.get("PackageCount").and_then(SchemaValue::as_scalar) {
        Some(Scalar::Int(n)) => *n,
        _ => 0,
    };
    shipment.set("PackageCount", count + 1)
}

/// Numeric value of an int or float scalar.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn number(value: &SchemaValue) -> Option<f64> {
    match value.as_scalar()? {
        Scalar::Int(i) => Some(*i as f64),
        Scalar::Float(f) => Some(*f),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for adapter tests.

    use std::sync::Arc;

    use crate::config::{Credentials, RequestOptions};
    use crate::request::{OperationAdapter, Request, RequestFactory};
    use crate::schemas::SchemaCatalog;
    use crate::transport::ScriptedTransport;

    pub struct Fixture {
        pub transport: Arc<ScriptedTransport>,
        pub factory: RequestFactory,
    }

    impl Fixture {
        pub fn new() -> Self {
            let transport = Arc::new(ScriptedTransport::new());
            let credentials = Credentials::new("xxxxxxxx", "yyyyyyyy", "510087780", "118501898")
                .with_integrator_id("123")
                .with_express_region_code("US");
            let factory = RequestFactory::new(
                Arc::new(credentials),
                transport.clone(),
                Arc::new(SchemaCatalog::standard().unwrap()),
            );
            Self { transport, factory }
        }

        pub fn request<A: OperationAdapter>(&self, adapter: A) -> Request<A> {
            self.factory.create(adapter, &RequestOptions::default()).unwrap()
        }

        /// Queues a plain SUCCESS reply for `operation`.
        pub fn succeed(&self, operation: &str) {
            self.transport
                .respond_json(operation, serde_json::json!({"HighestSeverity": "SUCCESS"}));
        }
    }
}
