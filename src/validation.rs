use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

/// Validates that a required text field carries something other than whitespace
pub fn validate_required_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some("This field is required".into());
        return Err(error);
    }
    Ok(())
}

/// Validates that an amount is non-zero
///
/// Amounts are signed (negative values are debits), so only an amount of
/// exactly zero is rejected.
pub fn validate_nonzero_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount == Decimal::ZERO {
        let mut error = ValidationError::new("invalid_amount");
        error.message = Some("Amount must be non-zero".into());
        return Err(error);
    }
    Ok(())
}

/// Flattens validator output into a single "field: message; ..." string for
/// the error envelope
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .collect();
            format!("{}: {}", field, messages.join(", "))
        })
        .collect::<Vec<_>>()
        .join("; ")
}
