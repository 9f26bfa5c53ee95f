//! Structural checks applied to a registration before the store is touched.
//!
//! Rules run in a fixed order and the first failure is the only one reported.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::domain::RegisterInput;

/// Minimum trimmed name length, in UTF-16 code units.
pub const MIN_NAME_CHARS: usize = 3;
/// Minimum password length, in UTF-16 code units (an emoji outside the BMP counts as two).
pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("El nombre debe tener al menos 3 caracteres.")]
    InvalidName,
    #[error("Ingresa un correo electrónico válido.")]
    InvalidEmail,
    #[error("La contraseña debe tener al menos 6 caracteres.")]
    WeakPassword,
}

/// Length as JavaScript's `String.length` reports it.
fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

pub fn validate_registration(input: &RegisterInput) -> Result<(), ValidationError> {
    if utf16_len(input.full_name.trim()) < MIN_NAME_CHARS {
        return Err(ValidationError::InvalidName);
    }
    if !EMAIL_SHAPE.is_match(&input.email) {
        return Err(ValidationError::InvalidEmail);
    }
    if utf16_len(&input.password) < MIN_PASSWORD_CHARS {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}
