use serde::Deserialize;

/// Successful login response. The token is opaque to the client.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}
