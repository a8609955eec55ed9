//! Drop-off location search (`locs` v9).

use fedex_core::{SchemaError, SchemaFactory, SchemaObject};

use crate::envelope::{Envelope, VersionInfo};
use crate::request::OperationAdapter;
use crate::traits::Transport;
use crate::transport::TransportError;

/// Finds FedEx locations near an address, or near a phone number's
/// registered address.
#[derive(Debug)]
pub struct SearchLocationRequest {
    criterion: String,
    phone_number: Option<String>,
    multiple_matches_action: String,
    address: SchemaObject,
    constraints: SchemaObject,
    sort_detail: SchemaObject,
}

impl Default for SearchLocationRequest {
    fn default() -> Self {
        Self {
            criterion: "ADDRESS".to_string(),
            phone_number: None,
            multiple_matches_action: "RETURN_ALL".to_string(),
            address: SchemaObject::default(),
            constraints: SchemaObject::default(),
            sort_detail: SchemaObject::default(),
        }
    }
}

impl SearchLocationRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Search by phone number instead of address.
    pub fn search_by_phone(&mut self, phone_number: impl Into<String>) {
        self.criterion = "PHONE_NUMBER".to_string();
        self.phone_number = Some(phone_number.into());
    }

    pub fn set_multiple_matches_action(&mut self, action: impl Into<String>) {
        self.multiple_matches_action = action.into();
    }

    #[must_use]
    pub fn criterion(&self) -> &str {
        &self.criterion
    }

    #[must_use]
    pub fn address(&self) -> &SchemaObject {
        &self.address
    }

    pub fn address_mut(&mut self) -> &mut SchemaObject {
        &mut self.address
    }

    #[must_use]
    pub fn constraints(&self) -> &SchemaObject {
        &self.constraints
    }

    pub fn constraints_mut(&mut self) -> &mut SchemaObject {
        &mut self.constraints
    }

    pub fn sort_detail_mut(&mut self) -> &mut SchemaObject {
        &mut self.sort_detail
    }
}

impl OperationAdapter for SearchLocationRequest {
    fn version(&self) -> VersionInfo {
        VersionInfo::new("locs", 9, 0, 0)
    }

    fn prepare_fields(&mut self, factory: &dyn SchemaFactory) -> Result<(), SchemaError> {
        self.address = factory.create("Address")?;
        self.constraints = factory.create("SearchLocationConstraints")?;
        self.sort_detail = factory.create("LocationSortDetail")?;
        Ok(())
    }

    fn assemble_and_dispatch(
        &self,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError> {
        let mut params = envelope.params();
        params.push("EffectiveDate", super::now().date_naive());
        params.push("LocationsSearchCriterion", self.criterion.as_str());
        params.push_opt("PhoneNumber", self.phone_number.as_deref());
        params.push("MultipleMatchesAction", self.multiple_matches_action.as_str());
        params.push("Constraints", self.constraints.clone());
        params.push("Address", self.address.clone());
        params.push("SortDetail", self.sort_detail.clone());
        transport.invoke("searchLocations", &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::Fixture;

    #[test]
    fn address_search_is_the_default() {
        let fx = Fixture::new();
        fx.succeed("searchLocations");
        let mut request = fx.request(SearchLocationRequest::new());
        request
            .adapter_mut()
            .unwrap()
            .address_mut()
            .set("PostalCode", "38017")
            .unwrap();
        request.send().unwrap();

        let call = fx.transport.last_call().unwrap();
        assert_eq!(call.operation, "searchLocations");
        assert_eq!(
            call.params.get("LocationsSearchCriterion").and_then(|v| v.as_text()),
            Some("ADDRESS")
        );
        assert_eq!(
            call.params.get("MultipleMatchesAction").and_then(|v| v.as_text()),
            Some("RETURN_ALL")
        );
        assert!(!call.params.contains("PhoneNumber"));
        assert_eq!(call.params.object("Address").unwrap().text("PostalCode"), Some("38017"));
    }

    #[test]
    fn phone_search_sends_number() {
        let fx = Fixture::new();
        fx.succeed("searchLocations");
        let mut request = fx.request(SearchLocationRequest::new());
        request.adapter_mut().unwrap().search_by_phone("9015551234");
        request.send().unwrap();

        let call = fx.transport.last_call().unwrap();
        assert_eq!(
            call.params.get("LocationsSearchCriterion").and_then(|v| v.as_text()),
            Some("PHONE_NUMBER")
        );
        assert_eq!(call.params.get("PhoneNumber").and_then(|v| v.as_text()), Some("9015551234"));
    }
}
