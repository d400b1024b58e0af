//! Outbound credential handling for the Airtable API.
//!
//! Airtable personal access tokens are long-lived and sent on every request, so
//! there is no login round trip here; this type only owns the token and keeps it
//! out of logs.

/// # Airtable Credential
///
/// Wraps the personal access token used for every outbound call.
///
/// ## Token Format
///
/// Airtable tokens look like `patXXXXXXXXXXXXXX.xxxxxxxx…`. They are sent with
/// `Bearer` authentication. Only a short prefix is ever written to logs.
#[derive(Clone)]
pub struct AirtableAuth {
    token: String,
}

impl AirtableAuth {
    pub fn new(token: String) -> Self {
        Self { token }
    }

    pub fn is_configured(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Value for the `Authorization` header.
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn token_preview(&self) -> String {
        format!("{}...", &self.token[..floor_char_boundary(&self.token, 10)])
    }
}

impl std::fmt::Debug for AirtableAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableAuth")
            .field("token", &self.token_preview())
            .finish()
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    let mut end = s.len().min(max);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}
