use serde::{Deserialize, Serialize};

use crate::access;
use crate::auth::{AuthPhase, AuthState, AuthUser, SessionSnapshot, SessionView};
use crate::command::CommandIntent;
use crate::nav::NavigationState;
use crate::route::Route;
use crate::view::{View, resolve_view};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedIntent {
    pub id: u64,
    pub intent: CommandIntent,
}

/// The whole client-side application state. Owned by a single cell in the
/// shell; replaced atomically by `apply_action` and never partially mutated
/// from outside.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppState {
    pub nav: NavigationState,
    pub auth: AuthState,
    #[serde(default)]
    pub intent_queue: Vec<QueuedIntent>,
    #[serde(default)]
    pub next_intent_id: u64,
    #[serde(default)]
    pub guard_fallbacks: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_intent_error: Option<String>,
}

impl AppState {
    pub fn session_view(&self) -> SessionView {
        SessionView::project(&self.auth)
    }

    /// Evaluates the dispatcher against the current state. Stateless apart
    /// from the fallback counter kept for diagnostics.
    pub fn current_view(&self) -> View {
        resolve_view(&self.nav, &self.session_view())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Decode the URL at application mount.
    BootstrapFromQuery { search: String },
    /// In-app forward navigation with a typed payload.
    Navigate { route: Route },
    /// Back/forward browser event; overwrite in-memory state from the URL.
    HistoryPopped { search: String },
    QueueIntent { intent: CommandIntent },
    DrainIntents,
    IntentCompleted { id: u64 },
    IntentFailed { id: u64, message: String },
    AuthChallengeRequested { email: String },
    AuthChallengeAccepted { email: String, challenge_id: String },
    AuthVerifyRequested,
    AuthSessionRestoreRequested,
    AuthSessionRefreshRequested,
    AuthSessionEstablished {
        user: AuthUser,
        session: SessionSnapshot,
        token_type: String,
        access_token: String,
        refresh_token: String,
    },
    AuthReauthRequired { message: String },
    AuthFailed { message: String },
    AuthSignedOut,
    GuardFallbackObserved,
}

/// What the shell must do after an action beyond holding the new state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionEffects {
    pub drained_intents: Vec<QueuedIntent>,
    /// Set when the authorization gate rewrote the navigation; the shell
    /// mirrors it into the address bar (replace, not push).
    pub redirected_to: Option<Route>,
}

/// The single mutator of `AppState`. Navigation and session changes re-run
/// the authorization gate before returning, so redirect rules hold after
/// every transition.
pub fn apply_action(state: &mut AppState, action: AppAction) -> ActionEffects {
    let mut effects = ActionEffects::default();

    match action {
        AppAction::BootstrapFromQuery { search } | AppAction::HistoryPopped { search } => {
            state.nav = NavigationState::decode(&search);
            apply_gate(state, &mut effects);
        }
        AppAction::Navigate { route } => {
            state.nav = route.to_nav();
            apply_gate(state, &mut effects);
        }
        AppAction::QueueIntent { intent } => {
            let id = state.next_intent_id;
            state.next_intent_id = state.next_intent_id.wrapping_add(1);
            state.intent_queue.push(QueuedIntent { id, intent });
        }
        AppAction::DrainIntents => {
            effects.drained_intents = std::mem::take(&mut state.intent_queue);
        }
        AppAction::IntentCompleted { id } => {
            state.intent_queue.retain(|queued| queued.id != id);
        }
        AppAction::IntentFailed { id, message } => {
            state.intent_queue.retain(|queued| queued.id != id);
            state.last_intent_error = Some(message);
        }
        AppAction::AuthChallengeRequested { email } => {
            state.auth.pending_email = Some(email);
            state.auth.challenge_id = None;
            state.auth.last_error = None;
        }
        AppAction::AuthChallengeAccepted {
            email,
            challenge_id,
        } => {
            state.auth.pending_email = Some(email);
            state.auth.challenge_id = Some(challenge_id);
        }
        AppAction::AuthVerifyRequested => {
            state.auth.last_error = None;
        }
        AppAction::AuthSessionRestoreRequested => {
            state.auth.phase = AuthPhase::Loading;
        }
        AppAction::AuthSessionRefreshRequested => {
            state.auth.last_error = None;
        }
        AppAction::AuthSessionEstablished {
            user,
            session,
            token_type,
            access_token,
            refresh_token,
        } => {
            state.auth.phase = AuthPhase::Authenticated;
            state.auth.user = Some(user);
            state.auth.session = Some(session);
            state.auth.token_type = Some(token_type);
            state.auth.access_token = Some(access_token);
            state.auth.refresh_token = Some(refresh_token);
            state.auth.pending_email = None;
            state.auth.challenge_id = None;
            state.auth.last_error = None;
            apply_gate(state, &mut effects);
        }
        AppAction::AuthReauthRequired { message } => {
            state.auth.phase = AuthPhase::ReauthRequired;
            state.auth.user = None;
            state.auth.session = None;
            state.auth.access_token = None;
            state.auth.refresh_token = None;
            state.auth.last_error = Some(message);
            apply_gate(state, &mut effects);
        }
        AppAction::AuthFailed { message } => {
            state.auth.last_error = Some(message);
        }
        AppAction::AuthSignedOut => {
            state.auth = AuthState {
                phase: AuthPhase::Anonymous,
                ..AuthState::default()
            };
            apply_gate(state, &mut effects);
        }
        AppAction::GuardFallbackObserved => {
            state.guard_fallbacks = state.guard_fallbacks.saturating_add(1);
        }
    }

    effects
}

fn apply_gate(state: &mut AppState, effects: &mut ActionEffects) {
    let session = state.session_view();
    if let Some(target) = access::redirect_for(&state.nav, &session) {
        state.nav = target.to_nav();
        effects.redirected_to = Some(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{SessionLifecycleStatus, UserRole};
    use crate::view::View;

    fn established(role: &str) -> AppAction {
        AppAction::AuthSessionEstablished {
            user: AuthUser {
                user_id: "u-1".to_string(),
                email: "kai@example.com".to_string(),
                name: "Kai Moreno".to_string(),
                role: UserRole::from_wire(role),
                email_verified: true,
            },
            session: SessionSnapshot {
                session_id: "s-1".to_string(),
                user_id: "u-1".to_string(),
                status: SessionLifecycleStatus::Active,
                reauth_required: false,
                issued_at: None,
                access_expires_at: None,
                refresh_expires_at: None,
            },
            token_type: "Bearer".to_string(),
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        }
    }

    fn signed_out_state() -> AppState {
        let mut state = AppState::default();
        let _ = apply_action(&mut state, AppAction::AuthSignedOut);
        state
    }

    #[test]
    fn bootstrap_decodes_the_query_without_redirecting_while_loading() {
        let mut state = AppState::default();
        let effects = apply_action(
            &mut state,
            AppAction::BootstrapFromQuery {
                search: "?page=finance".to_string(),
            },
        );
        // Auth restore has not completed; Rule 1 must hold fire.
        assert_eq!(state.nav.page, "finance");
        assert_eq!(effects.redirected_to, None);
    }

    #[test]
    fn protected_navigation_redirects_anonymous_sessions_to_login() {
        let mut state = signed_out_state();
        let effects = apply_action(
            &mut state,
            AppAction::Navigate {
                route: Route::Finance,
            },
        );
        assert_eq!(state.nav.page, "login");
        assert_eq!(effects.redirected_to, Some(Route::Login));
    }

    #[test]
    fn sign_out_while_on_protected_page_redirects_to_login() {
        let mut state = AppState::default();
        let _ = apply_action(&mut state, established("talent"));
        let _ = apply_action(
            &mut state,
            AppAction::Navigate {
                route: Route::Messages,
            },
        );
        assert_eq!(state.nav.page, "messages");

        let effects = apply_action(&mut state, AppAction::AuthSignedOut);
        assert_eq!(state.nav.page, "login");
        assert_eq!(effects.redirected_to, Some(Route::Login));
    }

    #[test]
    fn login_completion_redirects_by_role() {
        for (role, expected_page) in [
            ("company", "leads"),
            ("talent", "leads"),
            ("admin", "admin"),
            ("superuser", "landing"),
        ] {
            let mut state = signed_out_state();
            let _ = apply_action(
                &mut state,
                AppAction::Navigate {
                    route: Route::Login,
                },
            );
            let effects = apply_action(&mut state, established(role));
            assert_eq!(state.nav.page, expected_page, "role `{role}`");
            assert!(effects.redirected_to.is_some(), "role `{role}`");
        }
    }

    #[test]
    fn post_auth_redirect_fires_once_per_transition() {
        let mut state = signed_out_state();
        let _ = apply_action(
            &mut state,
            AppAction::Navigate {
                route: Route::Register,
            },
        );
        let effects = apply_action(&mut state, established("company"));
        assert_eq!(effects.redirected_to, Some(Route::Leads));

        // Re-running the gate on an unrelated action must not redirect again.
        let effects = apply_action(
            &mut state,
            AppAction::Navigate {
                route: Route::Marketplace,
            },
        );
        assert_eq!(effects.redirected_to, None);
        assert_eq!(state.nav.page, "marketplace");
    }

    #[test]
    fn back_button_restores_the_exact_prior_state() {
        let mut state = AppState::default();
        let _ = apply_action(&mut state, established("talent"));

        let a = Route::Marketplace;
        let b = Route::ProjectDetail {
            project_id: "p-5".to_string(),
        };
        let c = Route::Contracts;
        for route in [a, b.clone(), c] {
            let _ = apply_action(&mut state, AppAction::Navigate { route });
        }

        // popstate hands back B's query; in-memory state must match an
        // independent decode of it.
        let query_b = b.to_query();
        let _ = apply_action(
            &mut state,
            AppAction::HistoryPopped {
                search: query_b.clone(),
            },
        );
        assert_eq!(state.nav, NavigationState::decode(&query_b));
        assert_eq!(state.nav.data_value("projectId"), Some("p-5"));
    }

    #[test]
    fn intent_queue_assigns_monotonic_ids_and_drains_wholesale() {
        let mut state = AppState::default();
        let _ = apply_action(
            &mut state,
            AppAction::QueueIntent {
                intent: CommandIntent::Bootstrap,
            },
        );
        let _ = apply_action(
            &mut state,
            AppAction::QueueIntent {
                intent: CommandIntent::RestoreSession,
            },
        );
        assert_eq!(state.intent_queue.len(), 2);
        assert_eq!(state.intent_queue[0].id, 0);
        assert_eq!(state.intent_queue[1].id, 1);

        let effects = apply_action(&mut state, AppAction::DrainIntents);
        assert_eq!(effects.drained_intents.len(), 2);
        assert!(state.intent_queue.is_empty());
    }

    #[test]
    fn failed_intents_record_the_error_message() {
        let mut state = AppState::default();
        let _ = apply_action(
            &mut state,
            AppAction::IntentFailed {
                id: 9,
                message: "network unreachable".to_string(),
            },
        );
        assert_eq!(
            state.last_intent_error.as_deref(),
            Some("network unreachable")
        );
    }

    #[test]
    fn current_view_follows_the_session() {
        let mut state = signed_out_state();
        let _ = apply_action(
            &mut state,
            AppAction::Navigate {
                route: Route::Marketplace,
            },
        );
        assert_eq!(state.current_view(), View::Marketplace { preview: true });

        let _ = apply_action(&mut state, established("talent"));
        assert_eq!(state.current_view(), View::Marketplace { preview: false });
    }
}
