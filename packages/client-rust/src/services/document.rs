//! Electronic trade document and image upload (`cdus` v11).

use chrono::NaiveDate;
use fedex_core::{Scalar, SchemaError, SchemaFactory, SchemaObject, SchemaValue};

use crate::envelope::{Envelope, VersionInfo};
use crate::request::{OperationAdapter, Request};
use crate::traits::Transport;
use crate::transport::TransportError;

fn cdus_version() -> VersionInfo {
    VersionInfo::new("cdus", 11, 0, 0)
}

fn sequence(items: &[SchemaObject]) -> SchemaValue {
    SchemaValue::Sequence(items.iter().cloned().map(SchemaValue::Object).collect())
}

// ---------------------------------------------------------------------------
// UploadDocumentsRequest
// ---------------------------------------------------------------------------

/// Uploads commercial documents ahead of an international shipment.
#[derive(Debug)]
pub struct UploadDocumentsRequest {
    documents: Vec<SchemaObject>,
    usage: String,
    origin_country_code: Option<String>,
    destination_country_code: Option<String>,
}

impl Default for UploadDocumentsRequest {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            usage: "ELECTRONIC_TRADE_DOCUMENTS".to_string(),
            origin_country_code: None,
            destination_country_code: None,
        }
    }
}

impl UploadDocumentsRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, document: SchemaObject) {
        self.documents.push(document);
    }

    #[must_use]
    pub fn documents(&self) -> &[SchemaObject] {
        &self.documents
    }

    pub fn set_usage(&mut self, usage: impl Into<String>) {
        self.usage = usage.into();
    }

    pub fn set_origin_country_code(&mut self, code: impl Into<String>) {
        self.origin_country_code = Some(code.into());
    }

    pub fn set_destination_country_code(&mut self, code: impl Into<String>) {
        self.destination_country_code = Some(code.into());
    }
}

/// Fields of one `UploadDocumentDetail`.
#[derive(Debug, Clone)]
pub struct DocumentDetail<'a> {
    pub line_number: i64,
    pub customer_reference: Option<&'a str>,
    pub document_type: &'a str,
    pub file_name: &'a str,
    pub content: Vec<u8>,
    pub expiration_date: Option<NaiveDate>,
}

impl Request<UploadDocumentsRequest> {
    /// Builds an `UploadDocumentDetail` from this request's schema. The
    /// result still has to be passed to
    /// [`add_document`](UploadDocumentsRequest::add_document).
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the schema lacks the type or a field.
    pub fn new_document(&self, detail: DocumentDetail<'_>) -> Result<SchemaObject, SchemaError> {
        let mut document = self
            .create_object("UploadDocumentDetail")?
            .with("LineNumber", detail.line_number)?
            .with("DocumentType", detail.document_type)?
            .with("FileName", detail.file_name)?
            .with("DocumentContent", Scalar::Bytes(detail.content))?;
        if let Some(reference) = detail.customer_reference {
            document.set("CustomerReference", reference)?;
        }
        if let Some(date) = detail.expiration_date {
            document.set("ExpirationDate", date)?;
        }
        Ok(document)
    }
}

impl OperationAdapter for UploadDocumentsRequest {
    fn version(&self) -> VersionInfo {
        cdus_version()
    }

    fn prepare_fields(&mut self, _factory: &dyn SchemaFactory) -> Result<(), SchemaError> {
        Ok(())
    }

    fn assemble_and_dispatch(
        &self,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError> {
        let mut params = envelope.params();
        params.push("Documents", sequence(&self.documents));
        params.push("Usage", self.usage.as_str());
        params.push_opt("OriginCountryCode", self.origin_country_code.as_deref());
        params.push_opt("DestinationCountryCode", self.destination_country_code.as_deref());
        transport.invoke("uploadDocuments", &params)
    }
}

// ---------------------------------------------------------------------------
// UploadImagesRequest
// ---------------------------------------------------------------------------

/// Uploads letterhead and signature images for use on trade documents.
#[derive(Debug, Default)]
pub struct UploadImagesRequest {
    images: Vec<SchemaObject>,
}

impl UploadImagesRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an `UploadImageDetail`.
    pub fn add_image(&mut self, image: SchemaObject) {
        self.images.push(image);
    }

    #[must_use]
    pub fn images(&self) -> &[SchemaObject] {
        &self.images
    }
}

impl OperationAdapter for UploadImagesRequest {
    fn version(&self) -> VersionInfo {
        cdus_version()
    }

    fn prepare_fields(&mut self, _factory: &dyn SchemaFactory) -> Result<(), SchemaError> {
        Ok(())
    }

    fn assemble_and_dispatch(
        &self,
        envelope: &Envelope,
        transport: &dyn Transport,
    ) -> Result<SchemaObject, TransportError> {
        let params = envelope.params().with("Images", sequence(&self.images));
        transport.invoke("uploadImages", &params)
    }
}
