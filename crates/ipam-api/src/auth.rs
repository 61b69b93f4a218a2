use secrecy::SecretString;

/// Where the HTTP client gets its bearer token from.
///
/// Read once per request, right before the request is built. The session
/// manager in `ipam-core` implements this; the client never stores a token
/// of its own.
pub trait TokenSource: Send + Sync {
    /// The token to send as `Authorization: Bearer <token>`, if any.
    fn bearer_token(&self) -> Option<SecretString>;

    /// Called when a request that carried `token` was answered with 401.
    ///
    /// `token` is the one actually sent, which may no longer be current.
    fn reject(&self, _token: &SecretString) {}
}

/// No credentials: requests go out without an `Authorization` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl TokenSource for Anonymous {
    fn bearer_token(&self) -> Option<SecretString> {
        None
    }
}

/// A fixed token, e.g. a service credential handed in from the environment.
#[derive(Debug, Clone)]
pub struct StaticToken(SecretString);

impl StaticToken {
    pub fn new(token: impl Into<SecretString>) -> Self {
        Self(token.into())
    }
}

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<SecretString> {
        Some(self.0.clone())
    }
}
