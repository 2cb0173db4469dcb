//! Preview URLs for previously uploaded documents.
//!
//! The backend stores attachments under module-specific upload
//! directories and returns bare filenames; the client reconstructs the
//! full URL from the known base path.

use siteflow_core::error::CoreError;
use siteflow_core::module::Module;

use crate::error::{ClientError, ClientResult};

/// Build the preview URL for a server-stored document.
///
/// Filenames come from the server but are checked anyway: anything with a
/// path separator or a parent reference cannot address a file inside the
/// module's upload directory.
pub fn document_url(upload_base: &str, module: Module, filename: &str) -> ClientResult<String> {
    if filename.trim().is_empty() {
        return Err(ClientError::Core(CoreError::Validation(
            "Document filename is empty".to_string(),
        )));
    }

    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(ClientError::Core(CoreError::Validation(format!(
            "Document filename '{filename}' is not a plain filename"
        ))));
    }

    Ok(format!(
        "{}/{}/{}",
        upload_base.trim_end_matches('/'),
        module.upload_dir(),
        filename
    ))
}
