use crate::common::error::ApiError;
use crate::common::{ValidationResult, Validator};
use crate::users::models::{CreateUserRequest, UpdateUserRequest};

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ApiError::ValidationError("email is required".to_string()));
    }

    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ApiError::ValidationError(
            "email must be a valid address".to_string(),
        )),
    }
}

/// Validate a daily word goal
pub fn validate_word_goal(word_goal: i64) -> Result<(), ApiError> {
    if word_goal <= 0 {
        return Err(ApiError::ValidationError(
            "word_goal must be positive".to_string(),
        ));
    }

    Ok(())
}

fn record(result: &mut ValidationResult, field: &str, check: Result<(), ApiError>) {
    if let Err(ApiError::ValidationError(msg)) = check {
        result.add_error(field, &msg);
    }
}

impl Validator<CreateUserRequest> for CreateUserRequest {
    fn validate(&self, data: &CreateUserRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require("first_name", &data.first_name);
        record(&mut result, "email", validate_email(&data.email));
        if let Some(goal) = data.word_goal {
            record(&mut result, "word_goal", validate_word_goal(goal));
        }

        result
    }
}

impl Validator<UpdateUserRequest> for UpdateUserRequest {
    fn validate(&self, data: &UpdateUserRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(first_name) = &data.first_name {
            result.require("first_name", first_name);
        }
        if let Some(email) = &data.email {
            record(&mut result, "email", validate_email(email));
        }
        if let Some(goal) = data.word_goal {
            record(&mut result, "word_goal", validate_word_goal(goal));
        }

        result
    }
}
