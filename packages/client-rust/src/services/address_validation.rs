//! Address validation (`aval` v4).

use fedex_core::{SchemaError, SchemaFactory, SchemaObject, SchemaValue};

use crate::envelope::{Envelope, VersionInfo};
use crate::request::OperationAdapter;
use crate::traits::Transport;
use crate::transport::TransportError;

/// Checks one or more addresses against the carrier's address database.
#[derive(Debug, Default)]
pub struct AddressValidationRequest {
    addresses: Vec<SchemaObject>,
}

impl AddressValidationRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an `AddressToValidate`.
    pub fn add_address(&mut self, address: SchemaObject) {
        self.addresses.push(address);
    }

    #[must_use]
    pub fn addresses(&self) -> &[SchemaObject] {
        &self.addresses
    }
}

impl OperationAdapter for AddressValidationRequest {
    fn version(&self) -> VersionInfo {
        VersionInfo::new("aval", 4, 0, 0)
    }

    fn prepare_fields(&mut self, _factory: &dyn SchemaFactory) -> Result<(), SchemaError> {
        Ok(())
    }

    fn assemble_and_dispatch(
        &self,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError> {
        let addresses = self.addresses.iter().cloned().map(SchemaValue::Object).collect();
        let params = envelope
            .params()
            .with("InEffectAsOfTimestamp", super::now())
            .with("AddressesToValidate", SchemaValue::Sequence(addresses));
        transport.invoke("addressValidation", &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::Fixture;

    #[test]
    fn client_detail_has_no_integrator_or_region() {
        let fx = Fixture::new();
        let request = fx.request(AddressValidationRequest::new());
        let detail = request.envelope().client_detail();
        assert!(!detail.supports("IntegratorId"));
        assert!(!detail.supports("Region"));
        assert_eq!(detail.text("AccountNumber"), Some("510087780"));
    }

    #[test]
    fn sends_every_address_in_order() {
        let fx = Fixture::new();
        fx.succeed("addressValidation");
        let mut request = fx.request(AddressValidationRequest::new());
        for city in ["Memphis", "Collierville"] {
            let address = request
                .create_object("Address")
                .and_then(|a| a.with("City", city))
                .unwrap();
            let entry = request
                .create_object("AddressToValidate")
                .and_then(|e| e.with("Address", address))
                .unwrap();
            request.adapter_mut().unwrap().add_address(entry);
        }
        request.send().unwrap();

        let call = fx.transport.last_call().unwrap();
        assert_eq!(call.operation, "addressValidation");
        assert!(call.params.contains("InEffectAsOfTimestamp"));
        let cities: Vec<&str> = call
            .params
            .get("AddressesToValidate")
            .unwrap()
            .elements()
            .into_iter()
            .filter_map(|e| e.as_object()?.object("Address")?.text("City"))
            .collect();
        assert_eq!(cities, vec!["Memphis", "Collierville"]);
    }
}
