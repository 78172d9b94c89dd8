use serde::{Deserialize, Serialize};

pub const MAX_DISPLAY_NAME_CHARS: usize = 80;
pub const MAX_TAGLINE_CHARS: usize = 160;
pub const MAX_KYC_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

const KYC_ACCEPTED_EXTENSIONS: [&str; 4] = ["pdf", "png", "jpg", "jpeg"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileInputError {
    #[error("display name must not be empty")]
    EmptyDisplayName,
    #[error("display name exceeds {MAX_DISPLAY_NAME_CHARS} characters")]
    DisplayNameTooLong,
    #[error("tagline exceeds {MAX_TAGLINE_CHARS} characters")]
    TaglineTooLong,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KycDocumentError {
    #[error("document file name must not be empty")]
    EmptyFileName,
    #[error("document type `{extension}` is not accepted")]
    UnsupportedType { extension: String },
    #[error("document exceeds the {MAX_KYC_DOCUMENT_BYTES} byte limit")]
    DocumentTooLarge,
    #[error("document is empty")]
    EmptyDocument,
}

pub fn normalize_display_name(raw: &str) -> Result<String, ProfileInputError> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(ProfileInputError::EmptyDisplayName);
    }
    if collapsed.chars().count() > MAX_DISPLAY_NAME_CHARS {
        return Err(ProfileInputError::DisplayNameTooLong);
    }
    Ok(collapsed)
}

/// Taglines are optional; a blank tagline normalizes to `None`.
pub fn normalize_tagline(raw: &str) -> Result<Option<String>, ProfileInputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_TAGLINE_CHARS {
        return Err(ProfileInputError::TaglineTooLong);
    }
    Ok(Some(trimmed.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycDocumentDescriptor {
    pub file_name: String,
    pub extension: String,
    pub size_bytes: u64,
}

/// Validates a KYC upload before it is handed to the backend. The accepted
/// type list mirrors the verification provider's.
pub fn validate_kyc_document(
    file_name: &str,
    size_bytes: u64,
) -> Result<KycDocumentDescriptor, KycDocumentError> {
    let trimmed = file_name.trim();
    if trimmed.is_empty() {
        return Err(KycDocumentError::EmptyFileName);
    }
    let extension = trimmed
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default();
    if !KYC_ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(KycDocumentError::UnsupportedType { extension });
    }
    if size_bytes == 0 {
        return Err(KycDocumentError::EmptyDocument);
    }
    if size_bytes > MAX_KYC_DOCUMENT_BYTES {
        return Err(KycDocumentError::DocumentTooLarge);
    }
    Ok(KycDocumentDescriptor {
        file_name: trimmed.to_string(),
        extension,
        size_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_collapses_internal_whitespace() {
        let normalized = normalize_display_name("  Mara   Lind ").expect("valid name");
        assert_eq!(normalized, "Mara Lind");
    }

    #[test]
    fn display_name_rejects_blank_input() {
        assert_eq!(
            normalize_display_name("   "),
            Err(ProfileInputError::EmptyDisplayName)
        );
    }

    #[test]
    fn blank_tagline_normalizes_to_none() {
        assert_eq!(normalize_tagline("  "), Ok(None));
        assert_eq!(
            normalize_tagline(" Sprint specialist "),
            Ok(Some("Sprint specialist".to_string()))
        );
    }

    #[test]
    fn kyc_document_accepts_known_types() {
        let descriptor = validate_kyc_document("passport.PDF", 1024).expect("valid document");
        assert_eq!(descriptor.extension, "pdf");
        assert_eq!(descriptor.file_name, "passport.PDF");
    }

    #[test]
    fn kyc_document_rejects_unknown_types() {
        assert_eq!(
            validate_kyc_document("passport.exe", 1024),
            Err(KycDocumentError::UnsupportedType {
                extension: "exe".to_string()
            })
        );
        assert_eq!(
            validate_kyc_document("passport", 1024),
            Err(KycDocumentError::UnsupportedType {
                extension: String::new()
            })
        );
    }

    #[test]
    fn kyc_document_enforces_size_bounds() {
        assert_eq!(
            validate_kyc_document("id.png", 0),
            Err(KycDocumentError::EmptyDocument)
        );
        assert_eq!(
            validate_kyc_document("id.png", MAX_KYC_DOCUMENT_BYTES + 1),
            Err(KycDocumentError::DocumentTooLarge)
        );
    }
}
