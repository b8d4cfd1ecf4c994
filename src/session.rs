// In-memory session state.

/// Holds the bearer token returned by register/login. The token lives for
/// the whole process and is never written to disk.
#[derive(Debug, Default, Clone)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current token. Called after every successful auth call
    /// that returned one.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = token.into();
    }

    /// The token to send as `Authorization: Bearer`, if we have one.
    pub fn token(&self) -> Option<&str> {
        if self.token.is_empty() {
            None
        } else {
            Some(&self.token)
        }
    }
}
