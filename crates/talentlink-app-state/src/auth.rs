use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Talent,
    Company,
    Admin,
}

impl UserRole {
    /// Wire roles are free-form strings; anything outside the closed set
    /// projects to `None` and downstream rules treat it as an unknown role.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "talent" => Some(Self::Talent),
            "company" => Some(Self::Company),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Talent => "talent",
            Self::Company => "company",
            Self::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    /// Session restore has not completed yet; redirect rules must not fire.
    #[default]
    Loading,
    Anonymous,
    Authenticated,
    ReauthRequired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub email_verified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionLifecycleStatus {
    Active,
    ReauthRequired,
    Revoked,
}

impl SessionLifecycleStatus {
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "reauth_required" => Self::ReauthRequired,
            "revoked" => Self::Revoked,
            _ => Self::Active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub user_id: String,
    pub status: SessionLifecycleStatus,
    #[serde(default)]
    pub reauth_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_expires_at: Option<String>,
}

/// Externally-populated authentication projection. The router reads it,
/// never writes it directly; all mutation flows through auth actions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthState {
    pub phase: AuthPhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Read-only input to the authorization gate and view dispatcher, projected
/// from `AuthState` on every evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub loading: bool,
    pub is_logged_in: bool,
    pub user_id: Option<String>,
    pub role: Option<UserRole>,
}

impl SessionView {
    pub fn project(auth: &AuthState) -> Self {
        let is_logged_in = auth.phase == AuthPhase::Authenticated && auth.user.is_some();
        Self {
            loading: auth.phase == AuthPhase::Loading,
            is_logged_in,
            user_id: if is_logged_in {
                auth.user.as_ref().map(|user| user.user_id.clone())
            } else {
                None
            },
            role: if is_logged_in {
                auth.user.as_ref().and_then(|user| user.role)
            } else {
                None
            },
        }
    }

    pub fn anonymous() -> Self {
        Self {
            loading: false,
            is_logged_in: false,
            user_id: None,
            role: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticated_state(role: Option<UserRole>) -> AuthState {
        AuthState {
            phase: AuthPhase::Authenticated,
            user: Some(AuthUser {
                user_id: "u-1".to_string(),
                email: "lena@example.com".to_string(),
                name: "Lena Novak".to_string(),
                role,
                email_verified: true,
            }),
            ..AuthState::default()
        }
    }

    #[test]
    fn role_projection_rejects_unknown_wire_roles() {
        assert_eq!(UserRole::from_wire(" Company "), Some(UserRole::Company));
        assert_eq!(UserRole::from_wire("superuser"), None);
        assert_eq!(UserRole::from_wire(""), None);
    }

    #[test]
    fn session_view_reports_loading_until_restore_completes() {
        let view = SessionView::project(&AuthState::default());
        assert!(view.loading);
        assert!(!view.is_logged_in);
    }

    #[test]
    fn session_view_projects_identity_when_authenticated() {
        let view = SessionView::project(&authenticated_state(Some(UserRole::Talent)));
        assert!(!view.loading);
        assert!(view.is_logged_in);
        assert_eq!(view.user_id.as_deref(), Some("u-1"));
        assert_eq!(view.role, Some(UserRole::Talent));
    }

    #[test]
    fn session_view_hides_identity_after_reauth_required() {
        let mut state = authenticated_state(Some(UserRole::Company));
        state.phase = AuthPhase::ReauthRequired;
        let view = SessionView::project(&state);
        assert!(!view.is_logged_in);
        assert_eq!(view.user_id, None);
        assert_eq!(view.role, None);
    }
}
