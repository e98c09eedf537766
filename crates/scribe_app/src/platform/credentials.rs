use scribe_engine::AccessToken;

/// Owns the access token. Effects read it and hand it to each network call.
#[derive(Debug, Clone, Default)]
pub struct CredentialHolder {
    token: Option<AccessToken>,
}

impl CredentialHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AccessToken) -> Self {
        Self { token: Some(token) }
    }

    pub fn set_token(&mut self, token: AccessToken) {
        self.token = Some(token);
    }

    pub fn token(&self) -> Option<AccessToken> {
        self.token.clone()
    }
}
