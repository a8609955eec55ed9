//! Courier dispatch (`disp` v11).

use fedex_core::{SchemaError, SchemaFactory, SchemaObject};

use crate::envelope::{Envelope, VersionInfo};
use crate::request::OperationAdapter;
use crate::traits::Transport;
use crate::transport::TransportError;

/// Schedules a courier pickup.
///
/// The origin is a `PickupOriginDetail` whose `PickupLocation` carries an
/// empty contact and address after preparation; fill those in through
/// [`origin_detail_mut`](Self::origin_detail_mut).
#[derive(Debug, Default)]
pub struct CreatePickupRequest {
    origin_detail: SchemaObject,
    total_weight: SchemaObject,
    pickup_service_category: Option<String>,
    package_count: Option<i64>,
    carrier_code: Option<String>,
    oversize_package_count: Option<i64>,
    remarks: Option<String>,
    commodity_description: Option<String>,
}

impl CreatePickupRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn origin_detail(&self) -> &SchemaObject {
        &self.origin_detail
    }

    pub fn origin_detail_mut(&mut self) -> &mut SchemaObject {
        &mut self.origin_detail
    }

    #[must_use]
    pub fn total_weight(&self) -> &SchemaObject {
        &self.total_weight
    }

    pub fn total_weight_mut(&mut self) -> &mut SchemaObject {
        &mut self.total_weight
    }

    pub fn set_pickup_service_category(&mut self, category: impl Into<String>) {
        self.pickup_service_category = Some(category.into());
    }

    pub fn set_package_count(&mut self, count: i64) {
        self.package_count = Some(count);
    }

    pub fn set_carrier_code(&mut self, code: impl Into<String>) {
        self.carrier_code = Some(code.into());
    }

    pub fn set_oversize_package_count(&mut self, count: i64) {
        self.oversize_package_count = Some(count);
    }

    pub fn set_remarks(&mut self, remarks: impl Into<String>) {
        self.remarks = Some(remarks.into());
    }

    pub fn set_commodity_description(&mut self, description: impl Into<String>) {
        self.commodity_description = Some(description.into());
    }
}

impl OperationAdapter for CreatePickupRequest {
    fn version(&self) -> VersionInfo {
        VersionInfo::new("disp", 11, 0, 0)
    }

    fn prepare_fields(&mut self, factory: &dyn SchemaFactory) -> Result<(), SchemaError> {
        let location = factory
            .create("ContactAndAddress")?
            .with("Contact", factory.create("Contact")?)?
            .with("Address", factory.create("Address")?)?;
        self.origin_detail = factory
            .create("PickupOriginDetail")?
            .with("PickupLocation", location)?;
        self.total_weight = factory.create("Weight")?;
        Ok(())
    }

    fn assemble_and_dispatch(
        &self,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError> {
        let mut params = envelope.params();
        params.push("OriginDetail", self.origin_detail.clone());
        params.push_opt("PickupServiceCategory", self.pickup_service_category.as_deref());
        params.push_opt("PackageCount", self.package_count);
        params.push("TotalWeight", self.total_weight.clone());
        params.push_opt("CarrierCode", self.carrier_code.as_deref());
        params.push_opt("OversizePackageCount", self.oversize_package_count);
        params.push_opt("Remarks", self.remarks.as_deref());
        params.push_opt("CommodityDescription", self.commodity_description.as_deref());
        transport.invoke("createPickup", &params)
    }
}
