//! The four blocks shared by every request: authentication, client identity,
//! version, and the optional transaction correlation.

use fedex_core::{SchemaError, SchemaFactory, SchemaObject};

use crate::config::{Credentials, RequestOptions};
use crate::transport::NamedParams;

/// Parameter names, in the order they go on the wire.
pub mod param_names {
    pub const AUTHENTICATION: &str = "WebAuthenticationDetail";
    pub const CLIENT_DETAIL: &str = "ClientDetail";
    pub const VERSION: &str = "Version";
    pub const TRANSACTION_DETAIL: &str = "TransactionDetail";
}

/// Service identifier and version triple of one remote interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionInfo {
    /// Short service id, e.g. `"trck"`.
    pub service_id: String,
    pub major: u32,
    pub intermediate: u32,
    pub minor: u32,
}

impl VersionInfo {
    #[must_use]
    pub fn new(service_id: impl Into<String>, major: u32, intermediate: u32, minor: u32) -> Self {
        Self {
            service_id: service_id.into(),
            major,
            intermediate,
            minor,
        }
    }

    /// Returns true when the service id is set.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.service_id.trim().is_empty()
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} v{}.{}.{}",
            self.service_id, self.major, self.intermediate, self.minor
        )
    }
}

/// Identifies one of the shared blocks, for lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Authentication,
    ClientDetail,
    Version,
    TransactionDetail,
}

impl Block {
    /// Parameter name the block is sent under.
    #[must_use]
    pub const fn param_name(self) -> &'static str {
        match self {
            Self::Authentication => param_names::AUTHENTICATION,
            Self::ClientDetail => param_names::CLIENT_DETAIL,
            Self::Version => param_names::VERSION,
            Self::TransactionDetail => param_names::TRANSACTION_DETAIL,
        }
    }
}

/// Assembled shared blocks of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub(crate) authentication: SchemaObject,
    pub(crate) client_detail: SchemaObject,
    pub(crate) version: SchemaObject,
    pub(crate) transaction: Option<SchemaObject>,
}

impl Envelope {
    /// `WebAuthenticationDetail` block.
    #[must_use]
    pub fn authentication(&self) -> &SchemaObject {
        &self.authentication
    }

    /// `ClientDetail` block.
    #[must_use]
    pub fn client_detail(&self) -> &SchemaObject {
        &self.client_detail
    }

    /// `VersionId` block.
    #[must_use]
    pub fn version(&self) -> &SchemaObject {
        &self.version
    }

    /// `TransactionDetail` block, present only when a transaction id was
    /// supplied.
    #[must_use]
    pub fn transaction(&self) -> Option<&SchemaObject> {
        self.transaction.as_ref()
    }

    /// Named parameters for the shared blocks, in wire order. Adapters append
    /// their payload after these.
    #[must_use]
    pub fn params(&self) -> NamedParams {
        let mut params = NamedParams::new();
        params.push(param_names::AUTHENTICATION, self.authentication.clone());
        params.push(param_names::CLIENT_DETAIL, self.client_detail.clone());
        params.push(param_names::VERSION, self.version.clone());
        params.push_opt(param_names::TRANSACTION_DETAIL, self.transaction.clone());
        params
    }
}

/// Builds `WebAuthenticationDetail`. `ParentCredential` carries the same
/// key and password when the schema declares it.
pub(crate) fn authentication_block(
    factory: &dyn SchemaFactory,
    credentials: &Credentials,
) -> Result<SchemaObject, SchemaError> {
    let credential = || {
        factory
            .create("WebAuthenticationCredential")?
            .with("Key", credentials.key.as_str())?
            .with("Password", credentials.password.as_str())
    };
    let mut detail = factory.create("WebAuthenticationDetail")?;
    if detail.supports("ParentCredential") {
        detail.set("ParentCredential", credential()?)?;
    }
    detail.set("UserCredential", credential()?)?;
    Ok(detail)
}

/// Builds `ClientDetail`. Optional fields are only set when the schema
/// declares them and a value exists.
pub(crate) fn client_detail_block(
    factory: &dyn SchemaFactory,
    credentials: &Credentials,
    options: &RequestOptions,
) -> Result<SchemaObject, SchemaError> {
    let mut detail = factory
        .create("ClientDetail")?
        .with("AccountNumber", credentials.account_number.as_str())?
        .with("MeterNumber", credentials.meter_number.as_str())?;

    if let Some(id) = credentials.integrator_id.as_deref() {
        detail.set_if_supported("IntegratorId", id);
    }
    if let Some(region) = credentials.express_region_code.as_deref() {
        detail.set_if_supported("Region", region);
    }
    if let Some(localization) = &options.localization {
        if detail.supports("Localization") {
            let mut block = factory
                .create("Localization")?
                .with("LanguageCode", localization.language_code.as_str())?;
            if let Some(locale) = localization.locale_code.as_deref() {
                block.set_if_supported("LocaleCode", locale);
            }
            detail.set("Localization", block)?;
        }
    }
    Ok(detail)
}

/// Builds `VersionId` from the adapter's version tuple.
pub(crate) fn version_block(
    factory: &dyn SchemaFactory,
    version: &VersionInfo,
) -> Result<SchemaObject, SchemaError> {
    factory
        .create("VersionId")?
        .with("ServiceId", version.service_id.as_str())?
        .with("Major", version.major)?
        .with("Intermediate", version.intermediate)?
        .with("Minor", version.minor)
}

/// Builds `TransactionDetail`, or nothing when no id was supplied.
pub(crate) fn transaction_block(
    factory: &dyn SchemaFactory,
    options: &RequestOptions,
) -> Result<Option<SchemaObject>, SchemaError> {
    options
        .transaction_id()
        .map(|id| {
            factory
                .create("TransactionDetail")?
                .with("CustomerTransactionId", id)
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use fedex_core::{SchemaRegistry, SchemaValue, TypeSchema};

    use super::*;
    use crate::config::Localization;

    fn registry(client_fields: &[&str], auth_fields: &[&str]) -> SchemaRegistry {
        SchemaRegistry::from_types([
            TypeSchema::new("WebAuthenticationCredential", &["Key", "Password"], &["Key", "Password"]),
            TypeSchema::new("WebAuthenticationDetail", auth_fields, &["UserCredential"]),
            TypeSchema::new("ClientDetail", client_fields, &["AccountNumber", "MeterNumber"]),
            TypeSchema::new("Localization", &["LanguageCode", "LocaleCode"], &["LanguageCode"]),
            TypeSchema::new("VersionId", &["ServiceId", "Major", "Intermediate", "Minor"], &[]),
            TypeSchema::new("TransactionDetail", &["CustomerTransactionId"], &[]),
        ])
    }

    fn creds() -> Credentials {
        Credentials::new("k", "p", "510087780", "118501898")
            .with_integrator_id("123")
            .with_express_region_code("US")
    }

    #[test]
    fn parent_credential_mirrors_user_credential() {
        let reg = registry(&["AccountNumber", "MeterNumber"], &["ParentCredential", "UserCredential"]);
        let auth = authentication_block(&reg, &creds()).unwrap();
        assert_eq!(auth.object("ParentCredential"), auth.object("UserCredential"));
        assert_eq!(auth.object("UserCredential").unwrap().text("Key"), Some("k"));
    }

    #[test]
    fn parent_credential_skipped_when_undeclared() {
        let reg = registry(&["AccountNumber", "MeterNumber"], &["UserCredential"]);
        let auth = authentication_block(&reg, &creds()).unwrap();
        assert!(!auth.supports("ParentCredential"));
    }

    #[test]
    fn client_detail_omits_region_when_undeclared() {
        let reg = registry(&["AccountNumber", "MeterNumber", "IntegratorId", "Localization"], &["UserCredential"]);
        let detail = client_detail_block(&reg, &creds(), &RequestOptions::default()).unwrap();
        assert_eq!(detail.text("IntegratorId"), Some("123"));
        assert!(!detail.supports("Region"));
        assert!(detail.get("Localization").unwrap().is_absent());
    }

    #[test]
    fn client_detail_sets_region_and_localization_when_declared() {
        let reg = registry(
            &["AccountNumber", "MeterNumber", "IntegratorId", "Region", "Localization"],
            &["UserCredential"],
        );
        let options = RequestOptions {
            customer_transaction_id: None,
            localization: Some(Localization {
                language_code: "EN".into(),
                locale_code: Some("US".into()),
            }),
        };
        let detail = client_detail_block(&reg, &creds(), &options).unwrap();
        assert_eq!(detail.text("Region"), Some("US"));
        let loc = detail.object("Localization").unwrap();
        assert_eq!(loc.text("LanguageCode"), Some("EN"));
        assert_eq!(loc.text("LocaleCode"), Some("US"));
    }

    #[test]
    fn version_block_carries_tuple() {
        let reg = registry(&[], &[]);
        let block = version_block(&reg, &VersionInfo::new("trck", 16, 0, 0)).unwrap();
        assert_eq!(block.text("ServiceId"), Some("trck"));
        assert_eq!(block.get("Major"), Some(&SchemaValue::from(16_u32)));
    }

    #[test]
    fn transaction_block_only_with_id() {
        let reg = registry(&[], &[]);
        assert!(transaction_block(&reg, &RequestOptions::default()).unwrap().is_none());
        let block = transaction_block(&reg, &RequestOptions::with_transaction_id("abc"))
            .unwrap()
            .unwrap();
        assert_eq!(block.text("CustomerTransactionId"), Some("abc"));
    }

    #[test]
    fn version_display_and_validity() {
        let v = VersionInfo::new("crs", 24, 0, 0);
        assert_eq!(v.to_string(), "crs v24.0.0");
        assert!(v.is_valid());
        assert!(!VersionInfo::new("", 1, 0, 0).is_valid());
    }
}
