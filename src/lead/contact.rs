pub const DEFAULT_CONTACT_DOMAIN: &str = "wa.me";

/// Builds `https://<domain>/<phone>?text=<percent-encoded message>` links that
/// open a messaging app with the message pre-filled.
#[derive(Clone, Debug)]
pub struct ContactLinkBuilder {
    domain: String,
}

impl ContactLinkBuilder {
    pub fn new(domain: impl Into<String>) -> Self {
        let domain: String = domain.into();
        Self { domain: domain.trim_matches('/').to_string() }
    }

    /// `phone` is used as given; callers pass the digits-only form.
    pub fn build(&self, phone: &str, message: &str) -> String {
        format!("https://{}/{}?text={}", self.domain, phone, urlencoding::encode(message))
    }
}

impl Default for ContactLinkBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CONTACT_DOMAIN)
    }
}
