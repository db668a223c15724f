use crate::common::error::ApiError;
use crate::common::{ValidationResult, Validator};
use crate::entries::models::{CreateEntryRequest, UpdateEntryRequest};

/// Upper bound on plaintext entry size in bytes
pub const MAX_CONTENT_LENGTH: usize = 200_000;

/// Validate a word count
pub fn validate_word_count(word_count: i64) -> Result<(), ApiError> {
    if word_count < 0 {
        return Err(ApiError::ValidationError(
            "word_count cannot be negative".to_string(),
        ));
    }

    Ok(())
}

/// Validate entry content
pub fn validate_content(content: &str) -> Result<(), ApiError> {
    if content.len() > MAX_CONTENT_LENGTH {
        return Err(ApiError::ValidationError(format!(
            "content exceeds maximum length of {} bytes",
            MAX_CONTENT_LENGTH
        )));
    }

    Ok(())
}

fn check_entry_fields(result: &mut ValidationResult, user_id: &str, word_count: i64, content: &str) {
    result.require("user_id", user_id);

    if let Err(ApiError::ValidationError(msg)) = validate_word_count(word_count) {
        result.add_error("word_count", &msg);
    }

    if let Err(ApiError::ValidationError(msg)) = validate_content(content) {
        result.add_error("content", &msg);
    }
}

impl Validator<CreateEntryRequest> for CreateEntryRequest {
    fn validate(&self, data: &CreateEntryRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        check_entry_fields(&mut result, &data.user_id, data.word_count, &data.content);
        result
    }
}

impl Validator<UpdateEntryRequest> for UpdateEntryRequest {
    fn validate(&self, data: &UpdateEntryRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        check_entry_fields(&mut result, &data.user_id, data.word_count, &data.content);
        result
    }
}
