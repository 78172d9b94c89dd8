use crate::auth::{SessionView, UserRole};
use crate::nav::NavigationState;
use crate::route::{Route, RouteError};

/// Exactly one renderable screen. Variants carry the identity and payload
/// fields their guards validated; the shell renders them without re-checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Landing { logged_in: bool },
    Login,
    Register,
    Marketplace { preview: bool },
    TalentProfile { talent_id: String },
    CompanyProfile { company_id: String },
    Leads { user_id: String },
    Projects { user_id: String },
    ProjectDetail { user_id: String, project_id: String },
    ProjectCreate { user_id: String },
    Collaborations { user_id: String },
    CollaborationDetail { user_id: String, collaboration_id: String },
    Contracts { user_id: String },
    ContractDetail { user_id: String, contract_id: String },
    Payments { user_id: String },
    Finance { user_id: String, role: UserRole },
    Kyc { user_id: String },
    Analytics { user_id: String, role: UserRole },
    Messages { user_id: String },
    Chat {
        user_id: String,
        target_user_id: String,
        target_user_name: String,
    },
    Profile { user_id: String },
    ProfileEdit { user_id: String },
    Settings { user_id: String },
    Notifications { user_id: String },
    Admin { user_id: String },
    NotFound,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Landing { .. } => "TalentLink",
            Self::Login => "Sign In",
            Self::Register => "Create Account",
            Self::Marketplace { .. } => "Marketplace",
            Self::TalentProfile { .. } => "Talent Profile",
            Self::CompanyProfile { .. } => "Company Profile",
            Self::Leads { .. } => "Leads",
            Self::Projects { .. } => "Projects",
            Self::ProjectDetail { .. } => "Project",
            Self::ProjectCreate { .. } => "New Project",
            Self::Collaborations { .. } => "Collaborations",
            Self::CollaborationDetail { .. } => "Collaboration",
            Self::Contracts { .. } => "Contracts",
            Self::ContractDetail { .. } => "Contract",
            Self::Payments { .. } => "Payments",
            Self::Finance { .. } => "Finance",
            Self::Kyc { .. } => "Identity Verification",
            Self::Analytics { .. } => "Analytics",
            Self::Messages { .. } => "Messages",
            Self::Chat { .. } => "Chat",
            Self::Profile { .. } => "My Profile",
            Self::ProfileEdit { .. } => "Edit Profile",
            Self::Settings { .. } => "Settings",
            Self::Notifications { .. } => "Notifications",
            Self::Admin { .. } => "Admin",
            Self::NotFound => "Page Not Found",
        }
    }
}

/// Maps the current navigation plus the projected session onto exactly one
/// view. Total over all inputs: guard failures degrade to the landing view
/// (a soft fallback, logged for observability), unrecognized page keys
/// render the not-found view.
pub fn resolve_view(nav: &NavigationState, session: &SessionView) -> View {
    let route = match Route::from_nav(nav) {
        Ok(route) => route,
        Err(RouteError::UnknownPage { page }) => {
            tracing::warn!(page, "unrecognized page key; rendering not-found");
            return View::NotFound;
        }
        Err(error @ RouteError::MissingParam { .. }) => {
            tracing::warn!(%error, "navigation payload guard failed; falling back to landing");
            return landing_fallback(session);
        }
    };

    resolve_route_view(route, session)
}

fn resolve_route_view(route: Route, session: &SessionView) -> View {
    let logged_in = session.is_logged_in;

    // Per-branch identity guard. The gate has already redirected
    // anonymous sessions off protected pages; this keeps the dispatcher
    // total when it is evaluated before the redirect lands.
    let identity = |page: &'static str| -> Option<String> {
        let user_id = session.user_id.clone();
        if user_id.is_none() {
            tracing::warn!(page, "identity guard failed; falling back to landing");
        }
        user_id
    };

    match route {
        Route::Landing => View::Landing { logged_in },
        Route::Login => View::Login,
        Route::Register => View::Register,
        Route::Marketplace => View::Marketplace {
            preview: !logged_in,
        },
        Route::TalentProfile { talent_id } => View::TalentProfile { talent_id },
        Route::CompanyProfile { company_id } => View::CompanyProfile { company_id },
        Route::Leads => match identity("leads") {
            Some(user_id) => View::Leads { user_id },
            None => landing_fallback(session),
        },
        Route::Projects => match identity("projects") {
            Some(user_id) => View::Projects { user_id },
            None => landing_fallback(session),
        },
        Route::ProjectDetail { project_id } => match identity("project-detail") {
            Some(user_id) => View::ProjectDetail {
                user_id,
                project_id,
            },
            None => landing_fallback(session),
        },
        Route::ProjectCreate => match identity("project-create") {
            Some(user_id) => View::ProjectCreate { user_id },
            None => landing_fallback(session),
        },
        Route::Collaborations => match identity("collaborations") {
            Some(user_id) => View::Collaborations { user_id },
            None => landing_fallback(session),
        },
        Route::CollaborationDetail { collaboration_id } => {
            match identity("collaboration-detail") {
                Some(user_id) => View::CollaborationDetail {
                    user_id,
                    collaboration_id,
                },
                None => landing_fallback(session),
            }
        }
        Route::Contracts => match identity("contracts") {
            Some(user_id) => View::Contracts { user_id },
            None => landing_fallback(session),
        },
        Route::ContractDetail { contract_id } => match identity("contract-detail") {
            Some(user_id) => View::ContractDetail {
                user_id,
                contract_id,
            },
            None => landing_fallback(session),
        },
        Route::Payments => match identity("payments") {
            Some(user_id) => View::Payments { user_id },
            None => landing_fallback(session),
        },
        Route::Finance => {
            // Finance is a talent/company surface; admins get the fallback.
            match (session.user_id.clone(), session.role) {
                (Some(user_id), Some(role)) if role != UserRole::Admin => {
                    View::Finance { user_id, role }
                }
                _ => {
                    tracing::warn!("finance role guard failed; falling back to landing");
                    landing_fallback(session)
                }
            }
        }
        Route::Kyc => match identity("kyc") {
            Some(user_id) => View::Kyc { user_id },
            None => landing_fallback(session),
        },
        Route::Analytics => match (session.user_id.clone(), session.role) {
            (Some(user_id), Some(role)) => View::Analytics { user_id, role },
            _ => {
                tracing::warn!("analytics role guard failed; falling back to landing");
                landing_fallback(session)
            }
        },
        Route::Messages => match identity("messages") {
            Some(user_id) => View::Messages { user_id },
            None => landing_fallback(session),
        },
        Route::Chat {
            target_user_id,
            target_user_name,
        } => match identity("chat") {
            Some(user_id) => View::Chat {
                user_id,
                target_user_id,
                target_user_name,
            },
            None => landing_fallback(session),
        },
        Route::Profile => match identity("profile") {
            Some(user_id) => View::Profile { user_id },
            None => landing_fallback(session),
        },
        Route::ProfileEdit => match identity("profile-edit") {
            Some(user_id) => View::ProfileEdit { user_id },
            None => landing_fallback(session),
        },
        Route::Settings => match identity("settings") {
            Some(user_id) => View::Settings { user_id },
            None => landing_fallback(session),
        },
        Route::Notifications => match identity("notifications") {
            Some(user_id) => View::Notifications { user_id },
            None => landing_fallback(session),
        },
        Route::Admin => match (session.user_id.clone(), session.role) {
            (Some(user_id), Some(UserRole::Admin)) => View::Admin { user_id },
            _ => {
                tracing::warn!("admin role guard failed; falling back to landing");
                landing_fallback(session)
            }
        },
        Route::NotFound => View::NotFound,
    }
}

fn landing_fallback(session: &SessionView) -> View {
    View::Landing {
        logged_in: session.is_logged_in,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn talent_session() -> SessionView {
        SessionView {
            loading: false,
            is_logged_in: true,
            user_id: Some("u-7".to_string()),
            role: Some(UserRole::Talent),
        }
    }

    fn admin_session() -> SessionView {
        SessionView {
            loading: false,
            is_logged_in: true,
            user_id: Some("u-admin".to_string()),
            role: Some(UserRole::Admin),
        }
    }

    #[test]
    fn anonymous_marketplace_renders_in_preview_mode() {
        let nav = NavigationState::page_only("marketplace");
        let view = resolve_view(&nav, &SessionView::anonymous());
        assert_eq!(view, View::Marketplace { preview: true });
    }

    #[test]
    fn authenticated_marketplace_renders_full_mode() {
        let nav = NavigationState::page_only("marketplace");
        let view = resolve_view(&nav, &talent_session());
        assert_eq!(view, View::Marketplace { preview: false });
    }

    #[test]
    fn missing_payload_renders_same_view_as_landing() {
        let session = talent_session();
        let nav = NavigationState::page_only("project-detail");
        let landing = resolve_view(&NavigationState::page_only("landing"), &session);
        assert_eq!(resolve_view(&nav, &session), landing);
    }

    #[test]
    fn unknown_page_key_renders_not_found() {
        let nav = NavigationState::page_only("markeplace");
        assert_eq!(resolve_view(&nav, &SessionView::anonymous()), View::NotFound);
        assert_eq!(
            resolve_view(&NavigationState::page_only("not-found"), &talent_session()),
            View::NotFound
        );
    }

    #[test]
    fn finance_renders_for_talent_but_falls_back_for_admin() {
        let nav = NavigationState::page_only("finance");
        assert_eq!(
            resolve_view(&nav, &talent_session()),
            View::Finance {
                user_id: "u-7".to_string(),
                role: UserRole::Talent,
            }
        );
        assert_eq!(
            resolve_view(&nav, &admin_session()),
            View::Landing { logged_in: true }
        );
    }

    #[test]
    fn admin_page_requires_admin_role() {
        let nav = NavigationState::page_only("admin");
        assert_eq!(
            resolve_view(&nav, &admin_session()),
            View::Admin {
                user_id: "u-admin".to_string()
            }
        );
        assert_eq!(
            resolve_view(&nav, &talent_session()),
            View::Landing { logged_in: true }
        );
    }

    #[test]
    fn chat_view_carries_both_target_fields() {
        let nav = NavigationState::with_data(
            "chat",
            [("targetUserId", "u-2"), ("targetUserName", "Jon Reyes")],
        );
        assert_eq!(
            resolve_view(&nav, &talent_session()),
            View::Chat {
                user_id: "u-7".to_string(),
                target_user_id: "u-2".to_string(),
                target_user_name: "Jon Reyes".to_string(),
            }
        );
    }

    #[test]
    fn public_profiles_render_without_a_session() {
        let nav = NavigationState::with_data("talent-profile", [("talentId", "t-1")]);
        assert_eq!(
            resolve_view(&nav, &SessionView::anonymous()),
            View::TalentProfile {
                talent_id: "t-1".to_string()
            }
        );
    }
}
