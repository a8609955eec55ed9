//! Account credentials and per-request options.

use std::fmt;
use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// Environment variable prefix read by [`Credentials::load`], e.g.
/// `FEDEX_KEY`, `FEDEX_ACCOUNT_NUMBER`.
pub const ENV_PREFIX: &str = "FEDEX";

/// Errors raised while loading or validating credentials.
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("credential field `{0}` must not be empty")]
    Missing(&'static str),
    #[error("failed to load credentials: {0}")]
    Load(#[from] config::ConfigError),
}

/// Account credentials shared by every request.
///
/// Immutable once built. Share it across requests and threads behind an
/// `Arc`. The `Debug` output never shows the password.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// Developer key.
    pub key: String,
    /// Developer password.
    pub password: String,
    /// Account number billed for the request.
    pub account_number: String,
    /// Meter number issued for the account.
    pub meter_number: String,
    /// Separate account used for freight shipments.
    #[serde(default)]
    pub freight_account_number: Option<String>,
    /// Identifier of the integrating software, when assigned.
    #[serde(default)]
    pub integrator_id: Option<String>,
    /// Express region code, e.g. `"US"`.
    #[serde(default)]
    pub express_region_code: Option<String>,
    /// Target the test environment instead of production.
    #[serde(default)]
    pub use_test_server: bool,
}

impl Credentials {
    /// Creates credentials with only the four mandatory values set.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        password: impl Into<String>,
        account_number: impl Into<String>,
        meter_number: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            password: password.into(),
            account_number: account_number.into(),
            meter_number: meter_number.into(),
            freight_account_number: None,
            integrator_id: None,
            express_region_code: None,
            use_test_server: false,
        }
    }

    /// Builder: sets the integrator id.
    #[must_use]
    pub fn with_integrator_id(mut self, id: impl Into<String>) -> Self {
        self.integrator_id = Some(id.into());
        self
    }

    /// Builder: sets the express region code.
    #[must_use]
    pub fn with_express_region_code(mut self, code: impl Into<String>) -> Self {
        self.express_region_code = Some(code.into());
        self
    }

    /// Builder: sets the freight account number.
    #[must_use]
    pub fn with_freight_account_number(mut self, number: impl Into<String>) -> Self {
        self.freight_account_number = Some(number.into());
        self
    }

    /// Builder: selects the test environment.
    #[must_use]
    pub fn with_test_server(mut self, use_test_server: bool) -> Self {
        self.use_test_server = use_test_server;
        self
    }

    /// Loads credentials from an optional TOML file, then `FEDEX_*`
    /// environment variables, which take precedence.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError::Load`] if a source cannot be read or a
    /// mandatory value is missing, and [`CredentialsError::Missing`] if a
    /// credential field is empty.
    pub fn load(path: Option<&Path>) -> Result<Self, CredentialsError> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    pub(crate) fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self, CredentialsError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        let credentials: Self = builder
            .add_source(Environment::with_prefix(prefix))
            .build()?
            .try_deserialize()?;
        credentials.validate()?;
        Ok(credentials)
    }

    /// Checks that the key, password, account number and meter number are set.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError::Missing`] naming the first empty field.
    pub fn validate(&self) -> Result<(), CredentialsError> {
        if self.key.trim().is_empty() {
            return Err(CredentialsError::Missing("key"));
        }
        if self.password.is_empty() {
            return Err(CredentialsError::Missing("password"));
        }
        if self.account_number.trim().is_empty() {
            return Err(CredentialsError::Missing("account_number"));
        }
        if self.meter_number.trim().is_empty() {
            return Err(CredentialsError::Missing("meter_number"));
        }
        Ok(())
    }

    /// Short SHA-256 fingerprint of the key, safe to put in logs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.key.as_bytes());
        hex::encode(&digest[..6])
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.fingerprint())
            .field("password", &"<redacted>")
            .field("account_number", &self.account_number)
            .field("meter_number", &self.meter_number)
            .field("freight_account_number", &self.freight_account_number)
            .field("integrator_id", &self.integrator_id)
            .field("express_region_code", &self.express_region_code)
            .field("use_test_server", &self.use_test_server)
            .finish()
    }
}

/// Language and locale for localized notification messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localization {
    /// Two-letter language code, e.g. `"EN"`.
    pub language_code: String,
    /// Optional locale, e.g. `"US"`.
    pub locale_code: Option<String>,
}

/// Options that vary per request rather than per account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Echoed back in the reply; the `TransactionDetail` block is only sent
    /// when this is non-empty.
    pub customer_transaction_id: Option<String>,
    /// Requested language for notification messages.
    pub localization: Option<Localization>,
}

impl RequestOptions {
    /// Options carrying a customer transaction id.
    #[must_use]
    pub fn with_transaction_id(id: impl Into<String>) -> Self {
        Self {
            customer_transaction_id: Some(id.into()),
            localization: None,
        }
    }

    /// The transaction id, if it is set and non-empty.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> {
        self.customer_transaction_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials::new("key", "hunter2", "510087780", "118501898");
        let out = format!("{creds:?}");
        assert!(!out.contains("hunter2"));
        assert!(out.contains("<redacted>"));
        assert!(out.contains("510087780"));
    }

    #[test]
    fn validate_rejects_empty_key_and_password() {
        let no_key = Credentials::new(" ", "p", "1", "2");
        assert!(matches!(no_key.validate(), Err(CredentialsError::Missing("key"))));
        let no_password = Credentials::new("k", "", "1", "2");
        assert!(matches!(no_password.validate(), Err(CredentialsError::Missing("password"))));
        assert!(Credentials::new("k", "p", "1", "2").validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_account_and_meter() {
        let no_account = Credentials::new("k", "p", "", "2");
        assert!(matches!(
            no_account.validate(),
            Err(CredentialsError::Missing("account_number"))
        ));
        let no_meter = Credentials::new("k", "p", "1", " \t");
        assert!(matches!(
            no_meter.validate(),
            Err(CredentialsError::Missing("meter_number"))
        ));
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let a = Credentials::new("key", "p", "1", "2");
        let b = Credentials::new("key", "other", "3", "4");
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 12);
        assert_ne!(a.fingerprint(), Credentials::new("key2", "p", "1", "2").fingerprint());
    }

    #[test]
    fn load_reads_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "key = \"xxxxxxxxxxxxxxxx\"\n\
             password = \"yyyyyyyyyyyyyyyyyyyyyyyyy\"\n\
             account_number = \"510087780\"\n\
             meter_number = \"118501898\"\n\
             integrator_id = \"123\"\n\
             use_test_server = true"
        )
        .unwrap();

        let creds = Credentials::load_with_prefix(Some(file.path()), "FEDEX_TEST_UNSET_PREFIX").unwrap();
        assert_eq!(creds.account_number, "510087780");
        assert_eq!(creds.integrator_id.as_deref(), Some("123"));
        assert!(creds.express_region_code.is_none());
        assert!(creds.use_test_server);
    }

    #[test]
    fn load_fails_on_empty_password() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "key = \"k\"\npassword = \"\"\naccount_number = \"1\"\nmeter_number = \"2\""
        )
        .unwrap();
        let err = Credentials::load_with_prefix(Some(file.path()), "FEDEX_TEST_UNSET_PREFIX").unwrap_err();
        assert!(matches!(err, CredentialsError::Missing("password")));
    }

    #[test]
    fn load_without_sources_reports_missing_fields() {
        let err = Credentials::load_with_prefix(None, "FEDEX_TEST_UNSET_PREFIX").unwrap_err();
        assert!(matches!(err, CredentialsError::Load(_)));
    }

    #[test]
    fn blank_transaction_id_counts_as_none() {
        assert_eq!(RequestOptions::with_transaction_id("").transaction_id(), None);
        assert_eq!(
            RequestOptions::with_transaction_id("abc").transaction_id(),
            Some("abc")
        );
        assert_eq!(RequestOptions::default().transaction_id(), None);
    }
}
