use validator::Validate;

use crate::intent::{
    error::{IntentError, validation_error},
    types::IntentRequest,
};

#[derive(Default, Clone, Copy)]
pub struct RequestNormalizer;

impl RequestNormalizer {
    /// Returns the transcribed text, unaltered, once it is known to be usable.
    pub fn normalize(&self, request: IntentRequest) -> Result<String, IntentError> {
        request
            .validate()
            .map_err(|_| validation_error("transcribedText is required"))?;
        Ok(request.transcribed_text)
    }
}
