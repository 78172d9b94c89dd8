use crate::auth::{SessionView, UserRole};
use crate::nav::NavigationState;
use crate::route::Route;

/// Page keys that require an authenticated session. Consulted on every
/// navigation and on every session change.
const PROTECTED_PAGES: [&str; 19] = [
    "leads",
    "projects",
    "project-detail",
    "project-create",
    "collaborations",
    "collaboration-detail",
    "contracts",
    "contract-detail",
    "payments",
    "finance",
    "kyc",
    "analytics",
    "messages",
    "chat",
    "profile",
    "profile-edit",
    "settings",
    "notifications",
    "admin",
];

pub fn protected_page(page: &str) -> bool {
    PROTECTED_PAGES.contains(&page)
}

pub fn protected_pages() -> &'static [&'static str] {
    &PROTECTED_PAGES
}

/// The landing page an authenticated user is normalized onto when sitting on
/// an auth-entry page. Unknown roles fall through to the public landing.
pub fn role_landing(role: Option<UserRole>) -> Route {
    match role {
        Some(UserRole::Admin) => Route::Admin,
        Some(UserRole::Company) | Some(UserRole::Talent) => Route::Leads,
        None => Route::Landing,
    }
}

/// The two URL-redirect rules of the authorization gate, evaluated against
/// the raw navigation position so they also cover pages whose payload guard
/// would fail at dispatch.
///
/// Rule 1: a protected page with no authenticated session (and auth loading
/// complete) redirects to login. Rule 2: an authenticated session sitting on
/// an auth-entry page is normalized onto its role landing. Per-page payload
/// and role guards are a separate mechanism in the dispatcher and render an
/// in-place fallback instead of redirecting.
pub fn redirect_for(nav: &NavigationState, session: &SessionView) -> Option<Route> {
    if session.loading {
        return None;
    }
    if !session.is_logged_in && protected_page(&nav.page) {
        return Some(Route::Login);
    }
    if session.is_logged_in && (nav.page == "login" || nav.page == "register") {
        return Some(role_landing(session.role));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logged_in(role: Option<UserRole>) -> SessionView {
        SessionView {
            loading: false,
            is_logged_in: true,
            user_id: Some("u-1".to_string()),
            role,
        }
    }

    #[test]
    fn every_protected_page_redirects_anonymous_sessions_to_login() {
        let session = SessionView::anonymous();
        for page in protected_pages() {
            let nav = NavigationState::page_only(*page);
            assert_eq!(
                redirect_for(&nav, &session),
                Some(Route::Login),
                "page `{page}` should require login"
            );
        }
    }

    #[test]
    fn no_redirect_fires_while_auth_is_still_loading() {
        let session = SessionView {
            loading: true,
            is_logged_in: false,
            user_id: None,
            role: None,
        };
        let nav = NavigationState::page_only("finance");
        assert_eq!(redirect_for(&nav, &session), None);
    }

    #[test]
    fn public_pages_never_redirect_anonymous_sessions() {
        let session = SessionView::anonymous();
        for page in ["landing", "marketplace", "talent-profile", "not-found"] {
            let nav = NavigationState::page_only(page);
            assert_eq!(redirect_for(&nav, &session), None, "page `{page}`");
        }
    }

    #[test]
    fn auth_entry_pages_redirect_by_role_once_authenticated() {
        for page in ["login", "register"] {
            let nav = NavigationState::page_only(page);
            assert_eq!(
                redirect_for(&nav, &logged_in(Some(UserRole::Company))),
                Some(Route::Leads)
            );
            assert_eq!(
                redirect_for(&nav, &logged_in(Some(UserRole::Talent))),
                Some(Route::Leads)
            );
            assert_eq!(
                redirect_for(&nav, &logged_in(Some(UserRole::Admin))),
                Some(Route::Admin)
            );
            assert_eq!(redirect_for(&nav, &logged_in(None)), Some(Route::Landing));
        }
    }

    #[test]
    fn authenticated_sessions_stay_on_regular_pages() {
        let nav = NavigationState::page_only("marketplace");
        assert_eq!(redirect_for(&nav, &logged_in(Some(UserRole::Talent))), None);
    }

    #[test]
    fn protected_page_with_missing_payload_still_redirects_anonymous() {
        // The gate runs on the raw page key, before payload guards.
        let nav = NavigationState::page_only("project-detail");
        assert_eq!(
            redirect_for(&nav, &SessionView::anonymous()),
            Some(Route::Login)
        );
    }
}
