use validator::ValidationError;

/// Email domain type. Once constructed, guaranteed valid, trimmed, and
/// lowercase — every store lookup keyed by email relies on this
/// normalization, so raw strings never reach the query layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Create a new Email from a string. Trims, lowercases, and validates
    /// the basic shape (local part, `@`, dotted domain).
    pub fn new(email: String) -> Result<Self, ValidationError> {
        let normalized = email.trim().to_lowercase();

        // Maximum email length per RFC 5321
        if normalized.len() > 254 {
            let mut error = ValidationError::new("email_too_long");
            error.message = Some("Email address is too long".into());
            return Err(error);
        }

        let mut parts = normalized.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();

        if local.is_empty() || !domain.contains('.') {
            let mut error = ValidationError::new("invalid_email");
            error.message = Some("Invalid email address format".into());
            return Err(error);
        }

        Ok(Self(normalized))
    }

    /// Get the email as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the `@`. Used as a default display name when a user
    /// joins an organization.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
