pub mod todo_service;
pub mod user_service;

pub use todo_service::TodoService;
pub use user_service::UserService;

use crate::core::errors::TodoError;

fn validate_string_input(field: &str, value: &str, min_length: usize, max_length: usize) -> Result<(), TodoError> {
    if value.trim().is_empty() {
        return Err(TodoError::invalid_input(
            field,
            format!("Invalid {}", field),
            format!("{} cannot be empty", field),
        ));
    }
    let length = value.chars().count();
    if length < min_length || length > max_length {
        return Err(TodoError::invalid_input(
            field,
            format!("Invalid {} length", field),
            format!("{} must be between {} and {} characters", field, min_length, max_length),
        ));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(TodoError::invalid_input(
            field,
            format!("Invalid {}", field),
            format!("{} contains control characters", field),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), TodoError> {
    if email.trim().is_empty() {
        return Err(TodoError::MissingField("email".to_string()));
    }
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !well_formed || email.len() > crate::core::constants::EMAIL_MAX_LENGTH || email.contains(char::is_whitespace) {
        return Err(TodoError::InvalidEmail(email.to_string()));
    }
    Ok(())
}
