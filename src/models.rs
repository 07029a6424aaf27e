use serde::{Deserialize, Serialize};

// --- Request-Scoped Identity Values ---
// Both values below live only for the duration of a single request's handling.
// Nothing here is persisted or mutated by this service.

/// SessionIdentity
///
/// The opaque per-user identifier established by the external identity provider
/// after authentication. This service never inspects its contents; it is only
/// carried as a lookup key for the provider's profile-fetch operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity(pub String);

impl SessionIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// UserProfile
///
/// The user record returned by the identity provider's profile-fetch operation.
/// Read-only from this service's perspective. The shape mirrors the provider's
/// wire format: the role classifier lives inside the profile's public metadata
/// and may be absent entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// The provider-side user identifier (matches the session identity).
    pub id: String,
    /// Free-form, provider-managed metadata. Only `role` is read here.
    #[serde(default)]
    pub public_metadata: ProfileMetadata,
}

/// ProfileMetadata
///
/// The slice of the provider's profile metadata this service cares about.
/// Unknown metadata fields are ignored during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileMetadata {
    /// The RBAC classifier (e.g. 'admin', 'editor'). Absent for users whose
    /// role has not been assigned yet.
    pub role: Option<String>,
}

impl UserProfile {
    /// role
    ///
    /// Extracts the role classifier, normalizing "present but empty" to `None`
    /// so downstream decision logic only has to branch on a single case.
    pub fn role(&self) -> Option<&str> {
        self.public_metadata
            .role
            .as_deref()
            .filter(|r| !r.is_empty())
    }
}

/// SessionInfo
///
/// Response body for the `/api/session` endpoint: the resolved identity and
/// role for the current request, as seen by the gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub identity: String,
    pub role: Option<String>,
}
