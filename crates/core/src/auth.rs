use serde::{Deserialize, Serialize};

/// Authenticated caller as supplied by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    display_name: String,
    email: Option<String>,
}

impl UserIdentity {
    /// Creates a user identity from authentication data.
    ///
    /// The email is normalized so that every table lookup compares the same form.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        display_name: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            display_name: display_name.into(),
            email: email
                .map(|value| normalize_email(value.as_str()))
                .filter(|value| !value.is_empty()),
        }
    }

    /// Returns the stable subject claim from the identity provider.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the normalized email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// Trims and lowercases an email for comparison.
#[must_use]
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::UserIdentity;

    #[test]
    fn identity_normalizes_email() {
        let identity = UserIdentity::new(
            "qc-7",
            "Ravi",
            Some("  Ravi.Quality@EasternMills.com ".to_owned()),
        );
        assert_eq!(identity.email(), Some("ravi.quality@easternmills.com"));
    }

    #[test]
    fn blank_email_is_treated_as_missing() {
        let identity = UserIdentity::new("qc-7", "Ravi", Some("   ".to_owned()));
        assert_eq!(identity.email(), None);
    }
}
