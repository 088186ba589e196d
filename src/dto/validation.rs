//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that an image submission payload looks like a base64 data URL
/// (`data:image/...;base64,<payload>`).
///
/// Decoding happens in the detector backend; this only rejects payloads that
/// cannot possibly carry an image so they never reach it.
pub fn validate_image_payload(payload: &str) -> Result<(), ValidationError> {
    let Some((header, encoded)) = payload.split_once(',') else {
        let mut err = ValidationError::new("image_payload_format");
        err.message = Some("image payload must be a data URL with a base64 body".into());
        return Err(err);
    };

    if !header.starts_with("data:") {
        let mut err = ValidationError::new("image_payload_header");
        err.message = Some("image payload must start with a `data:` header".into());
        return Err(err);
    }

    if encoded.is_empty() {
        let mut err = ValidationError::new("image_payload_empty");
        err.message = Some("image payload carries no data".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_image_payload_valid() {
        assert!(validate_image_payload("data:image/jpeg;base64,/9j/4AAQ").is_ok());
        assert!(validate_image_payload("data:image/png;base64,iVBORw0K").is_ok());
    }

    #[test]
    fn test_validate_image_payload_missing_body() {
        assert!(validate_image_payload("data:image/jpeg;base64,").is_err()); // empty body
        assert!(validate_image_payload("data:image/jpeg;base64").is_err()); // no comma
        assert!(validate_image_payload("").is_err()); // empty
    }

    #[test]
    fn test_validate_image_payload_invalid_header() {
        assert!(validate_image_payload("image/jpeg;base64,/9j/4AAQ").is_err());
        assert!(validate_image_payload("blob:abc,def").is_err());
    }
}
