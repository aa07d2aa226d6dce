//! # Validation Module
//!
//! Form-layer input validation for Tienda.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form (login, payment, address)                               │
//! │  ├── THIS MODULE: format and checksum rules                            │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: StateStore                                                   │
//! │  └── No rejection - accepts well-typed payloads, clamps quantities     │
//! │                                                                         │
//! │  The store stays permissive on purpose; format correctness is          │
//! │  enforced here, before the store is called.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tienda_core::validation::{validate_email, validate_card_number};
//!
//! assert!(validate_email("ana@example.com").is_ok());
//! assert!(validate_card_number("4539 5787 6362 1486").is_ok());
//! ```

use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Identity Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// Deliberately shallow: `local@domain.tld` with no whitespace, matching the
/// storefront's superficial check. Deliverability is not this layer's
/// problem.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required { field: "email" });
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must contain exactly one @",
            })
        }
    };

    let domain_ok = {
        let (host, tld) = match domain.rsplit_once('.') {
            Some(split) => split,
            None => ("", ""),
        };
        !host.is_empty() && !tld.is_empty()
    };

    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "must look like name@domain.tld",
        });
    }

    Ok(())
}

/// Validates a password.
///
/// ## Rules
/// - Minimum 6 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < 6 {
        return Err(ValidationError::TooShort {
            field: "password",
            min: 6,
        });
    }

    Ok(())
}

// =============================================================================
// Payment Validators
// =============================================================================

/// Validates a card number with the Luhn checksum.
///
/// ## How Luhn Works
/// Walking from the rightmost digit, every second digit is doubled (and 9
/// subtracted when the double exceeds 9); the card is valid when the sum of
/// all digits is divisible by 10. Catches single-digit typos and most
/// transpositions.
///
/// Spaces and dashes are ignored; any other non-digit is a format error.
pub fn validate_card_number(card_number: &str) -> ValidationResult<()> {
    let mut digits = Vec::with_capacity(19);
    for c in card_number.chars() {
        match c {
            '0'..='9' => digits.push(c as u32 - '0' as u32),
            ' ' | '-' => {}
            _ => {
                return Err(ValidationError::InvalidFormat {
                    field: "card number",
                    reason: "must contain only digits",
                })
            }
        }
    }

    if digits.is_empty() {
        return Err(ValidationError::Required {
            field: "card number",
        });
    }

    let mut sum = 0;
    let mut double = false;
    for &d in digits.iter().rev() {
        let mut d = d;
        if double {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
        double = !double;
    }

    if sum % 10 != 0 {
        return Err(ValidationError::InvalidFormat {
            field: "card number",
            reason: "failed checksum",
        });
    }

    Ok(())
}

// =============================================================================
// Address Validators
// =============================================================================

/// Validates a phone number.
///
/// ## Rules
/// - Exactly 10 digits, nothing else
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if phone.len() != 10 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone",
            reason: "must be exactly 10 digits",
        });
    }

    Ok(())
}

/// Validates a postal code.
///
/// ## Rules
/// - Exactly 5 digits, nothing else
pub fn validate_zip(zip: &str) -> ValidationResult<()> {
    if zip.len() != 5 || !zip.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "zip",
            reason: "must be exactly 5 digits",
        });
    }

    Ok(())
}

/// Validates that a required field is filled in.
///
/// Whitespace-only values do not count.
pub fn validate_required(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
