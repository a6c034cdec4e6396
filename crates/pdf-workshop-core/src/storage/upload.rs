//! Upload admission: signature sniffing before anything reaches storage.

use bytes::Bytes;
use tracing::{debug, info};

use super::{DocumentId, DocumentStore};
use crate::error::{Error, Result};

/// Leading bytes of every PDF file (`%PDF`).
pub const PDF_SIGNATURE: [u8; 4] = [0x25, 0x50, 0x44, 0x46];

const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Check the magic number. The declared media type plays no part in this.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(&PDF_SIGNATURE)
}

/// Raw upload waiting for validation.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub bytes: Bytes,
    /// Content type declared by the client, if any
    pub media_type: Option<String>,
}

impl PendingUpload {
    pub fn new(bytes: impl Into<Bytes>, media_type: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type,
        }
    }
}

impl DocumentStore {
    /// Validate an upload and promote it to a stored document.
    ///
    /// Bytes that do not start with `%PDF` are rejected with
    /// [`Error::InvalidFormat`] and never touch the storage directory.
    pub fn admit(&self, upload: PendingUpload) -> Result<DocumentId> {
        if let Some(media_type) = upload.media_type.as_deref()
            && media_type != PDF_MEDIA_TYPE
        {
            debug!("Upload declared as {}, checking signature anyway", media_type);
        }

        if !is_pdf(&upload.bytes) {
            return Err(Error::InvalidFormat(
                "Only PDFs are allowed.".to_string(),
            ));
        }

        let id = self.insert(&upload.bytes)?;
        info!("Admitted upload {} ({} bytes)", id, upload.bytes.len());
        Ok(id)
    }
}
