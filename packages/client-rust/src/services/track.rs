//! Shipment tracking (`trck` v16).

use fedex_core::{Response, SchemaError, SchemaFactory, SchemaObject};

use super::DEFAULT_CARRIER;
use crate::classify;
use crate::envelope::{Envelope, VersionInfo};
use crate::error::{RemoteErrorKind, RequestError};
use crate::request::OperationAdapter;
use crate::traits::Transport;
use crate::transport::TransportError;

/// Tracks a shipment by tracking number, or by another identifier type.
///
/// By default the package identifier type is `TRACKING_NUMBER_OR_DOORTAG`
/// and the carrier is FedEx Express.
#[derive(Debug, Default)]
pub struct TrackRequest {
    tracking_number: Option<String>,
    selection_details: SchemaObject,
    include_detailed_scans: bool,
}

impl TrackRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request tracking `number` once the request is prepared.
    #[must_use]
    pub fn for_tracking_number(number: impl Into<String>) -> Self {
        Self {
            tracking_number: Some(number.into()),
            ..Self::default()
        }
    }

    /// The `TrackSelectionDetail` payload.
    #[must_use]
    pub fn selection_details(&self) -> &SchemaObject {
        &self.selection_details
    }

    pub fn selection_details_mut(&mut self) -> &mut SchemaObject {
        &mut self.selection_details
    }

    /// Sets `PackageIdentifier.Value`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if called before the request is prepared.
    pub fn set_tracking_number(&mut self, number: &str) -> Result<(), SchemaError> {
        self.selection_details.set_path("PackageIdentifier.Value", number)
    }

    /// Sets `PackageIdentifier.Type`, e.g. `"SHIPPER_REFERENCE"`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if called before the request is prepared.
    pub fn set_identifier_type(&mut self, identifier_type: &str) -> Result<(), SchemaError> {
        self.selection_details.set_path("PackageIdentifier.Type", identifier_type)
    }

    /// Ask for every scan event instead of the summary only.
    pub fn include_detailed_scans(&mut self, include: bool) {
        self.include_detailed_scans = include;
    }
}

impl OperationAdapter for TrackRequest {
    fn version(&self) -> VersionInfo {
        VersionInfo::new("trck", 16, 0, 0)
    }

    fn prepare_fields(&mut self, factory: &dyn SchemaFactory) -> Result<(), SchemaError> {
        let identifier = factory
            .create("TrackPackageIdentifier")?
            .with("Type", "TRACKING_NUMBER_OR_DOORTAG")?;
        self.selection_details = factory
            .create("TrackSelectionDetail")?
            .with("CarrierCode", DEFAULT_CARRIER)?
            .with("PackageIdentifier", identifier)?;
        if let Some(number) = self.tracking_number.take() {
            self.set_tracking_number(&number)?;
        }
        Ok(())
    }

    fn assemble_and_dispatch(
        &self,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError> {
        let mut params = envelope.params();
        params.push("SelectionDetails", self.selection_details.clone());
        params.push_opt(
            "ProcessingOptions",
            self.include_detailed_scans.then_some("INCLUDE_DETAILED_SCANS"),
        );
        transport.invoke("track", &params)
    }

    fn check_errors(&self, response: &Response) -> Result<(), RequestError> {
        classify::check_for_errors_with(response, |note| {
            if note.message_contains("Invalid tracking number") {
                RemoteErrorKind::InvalidTrackingNumber
            } else {
                RemoteErrorKind::Rejected
            }
        })
    }
}
