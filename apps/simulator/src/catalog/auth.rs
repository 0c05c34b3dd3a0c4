use std::fmt;

/// Bearer credential attached to every backend call.
///
/// Both variants end up as `Authorization: Bearer <token>`; only one is ever
/// configured for a running host.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Token issued by the backend's own login flow.
    OpaqueToken(String),
    /// ID token from a third-party identity provider.
    FederatedIdentity { provider: String, id_token: String },
}

impl Credential {
    pub fn bearer_token(&self) -> &str {
        match self {
            Credential::OpaqueToken(token) => token,
            Credential::FederatedIdentity { id_token, .. } => id_token,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Credential::OpaqueToken(_) => "opaque_token",
            Credential::FederatedIdentity { .. } => "federated_identity",
        }
    }
}

// Never print token material.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::OpaqueToken(_) => f.write_str("OpaqueToken(<redacted>)"),
            Credential::FederatedIdentity { provider, .. } => f
                .debug_struct("FederatedIdentity")
                .field("provider", provider)
                .field("id_token", &"<redacted>")
                .finish(),
        }
    }
}
