//! Password policy enforcement for new passwords.

use lexvault_core::config::AuthConfig;
use lexvault_core::error::AppError;

/// Characters that satisfy the special-character rule.
pub const SPECIAL_CHARACTERS: &str = "@$!%*?&";

/// Validates password strength against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password, reporting the first rule it breaks.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(AppError::invalid_input(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(AppError::invalid_input(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::invalid_input(
                "Password must contain at least one digit",
            ));
        }

        if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
            return Err(AppError::invalid_input(format!(
                "Password must contain at least one of {SPECIAL_CHARACTERS}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&AuthConfig::default())
    }

    #[test]
    fn test_accepts_policy_compliant_password() {
        assert!(validator().validate("Paralegal1!").is_ok());
    }

    #[test]
    fn test_rejects_each_missing_class() {
        for weak in [
            "Sh0rt!",
            "nouppercase1!",
            "NOLOWERCASE1!",
            "NoDigits!!",
            "NoSpecial12",
            "Hash#Only1",
        ] {
            assert!(validator().validate(weak).is_err(), "{weak} accepted");
        }
    }
}
