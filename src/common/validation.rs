// src/common/validation.rs

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

use crate::common::error::AppError;

// Regras que dependem do relógio ou de mais de um campo ficam fora do derive.
pub fn invalid_field(field: &'static str, code: &'static str, message: &'static str) -> AppError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));

    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    AppError::ValidationError(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_single_field_error() {
        match invalid_field("dueDate", "past_date", "A data não pode estar no passado.") {
            AppError::ValidationError(errors) => {
                let fields = errors.field_errors();
                assert_eq!(fields.len(), 1);
                let (field, list) = fields.into_iter().next().unwrap();
                assert_eq!(field.to_string(), "dueDate");
                assert_eq!(list[0].code, "past_date");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }
}
