#![allow(clippy::needless_pass_by_value)]

#[cfg(any(target_arch = "wasm32", test))]
mod chat_thread;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;
#[cfg(target_arch = "wasm32")]
mod wasm_state;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::{Cell, RefCell};
    use web_time::{Duration, Instant};

    use gloo_net::http::Request;
    use gloo_timers::future::sleep;
    use serde::{Deserialize, Serialize};
    use talentlink_app_state::{
        AppAction, AppState, AuthRequirement, AuthUser, CommandError, CommandErrorKind,
        CommandIntent, HttpCommandRequest, HttpMethod, SessionLifecycleStatus, SessionSnapshot,
        UserRole, View, apply_action, classify_http_error, command_error_code,
        command_latency_metric, map_intent_to_http,
    };
    use talentlink_client_core::auth::{normalize_email, normalize_verification_code};
    use talentlink_client_core::message::normalize_chat_message_text;
    use talentlink_client_core::profile::{
        normalize_display_name, normalize_tagline, validate_kyc_document,
    };
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{HtmlAnchorElement, HtmlElement, HtmlInputElement, MouseEvent};

    use crate::chat_thread::ChatThreadState;
    use crate::wasm_constants::*;
    use crate::wasm_state::{
        AnalyticsSurfaceState, FinanceSurfaceState, KycSurfaceState, LeadsSurfaceState,
        MarketplaceSurfaceState,
    };

    mod dom;
    mod lifecycle;
    mod network;
    mod routing;

    use dom::*;
    use lifecycle::*;
    use network::*;
    use routing::*;

    thread_local! {
        static APP_STATE: RefCell<AppState> = RefCell::new(AppState::default());
        static DIAGNOSTICS: RefCell<BootDiagnostics> = RefCell::new(BootDiagnostics::default());
        static COMMAND_LOOP_ACTIVE: Cell<bool> = const { Cell::new(false) };
        static CHAT_THREAD_STATE: RefCell<ChatThreadState> = RefCell::new(ChatThreadState::default());
        static CHAT_THREAD_LOADING: Cell<bool> = const { Cell::new(false) };
        static MARKETPLACE_SURFACE_STATE: RefCell<MarketplaceSurfaceState> = RefCell::new(MarketplaceSurfaceState::default());
        static MARKETPLACE_SURFACE_LOADING: Cell<bool> = const { Cell::new(false) };
        static LEADS_SURFACE_STATE: RefCell<LeadsSurfaceState> = RefCell::new(LeadsSurfaceState::default());
        static LEADS_SURFACE_LOADING: Cell<bool> = const { Cell::new(false) };
        static FINANCE_SURFACE_STATE: RefCell<FinanceSurfaceState> = RefCell::new(FinanceSurfaceState::default());
        static FINANCE_SURFACE_LOADING: Cell<bool> = const { Cell::new(false) };
        static KYC_SURFACE_STATE: RefCell<KycSurfaceState> = RefCell::new(KycSurfaceState::default());
        static KYC_SURFACE_LOADING: Cell<bool> = const { Cell::new(false) };
        static ANALYTICS_SURFACE_STATE: RefCell<AnalyticsSurfaceState> = RefCell::new(AnalyticsSurfaceState::default());
        static ANALYTICS_SURFACE_LOADING: Cell<bool> = const { Cell::new(false) };
        static ROUTE_POPSTATE_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static ROUTE_LINK_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static AUTH_SEND_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static AUTH_VERIFY_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static AUTH_LOGOUT_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static CHAT_SEND_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static CONTENT_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static CHAT_INPUT_KEYDOWN_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::KeyboardEvent)>>> = const { RefCell::new(None) };
    }

    #[derive(Debug, Clone, Deserialize)]
    struct TalentListingEnvelope {
        data: TalentListingPayload,
    }

    #[derive(Debug, Clone, Deserialize)]
    struct TalentListingPayload {
        #[serde(default)]
        talents: Vec<TalentListingRecord>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub(super) struct TalentListingRecord {
        #[serde(rename = "talentId")]
        pub(super) talent_id: String,
        #[serde(rename = "displayName")]
        pub(super) display_name: String,
        #[serde(default)]
        pub(super) discipline: String,
        #[serde(default)]
        pub(super) verified: bool,
    }

    #[derive(Debug, Clone, Deserialize)]
    struct LeadsEnvelope {
        data: LeadsPayload,
    }

    #[derive(Debug, Clone, Deserialize)]
    struct LeadsPayload {
        #[serde(default)]
        leads: Vec<LeadRecord>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub(super) struct LeadRecord {
        #[serde(rename = "leadId")]
        pub(super) lead_id: String,
        pub(super) title: String,
        #[serde(default)]
        pub(super) status: String,
        #[serde(default, rename = "counterpartName")]
        pub(super) counterpart_name: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    struct EscrowPaymentsEnvelope {
        data: EscrowPaymentsPayload,
    }

    #[derive(Debug, Clone, Deserialize)]
    struct EscrowPaymentsPayload {
        #[serde(default)]
        payments: Vec<EscrowPaymentRecord>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub(super) struct EscrowPaymentRecord {
        #[serde(rename = "paymentId")]
        pub(super) payment_id: String,
        #[serde(rename = "projectTitle")]
        pub(super) project_title: String,
        #[serde(rename = "amountCents")]
        pub(super) amount_cents: i64,
        #[serde(default)]
        pub(super) currency: String,
        #[serde(default)]
        pub(super) status: String,
        #[serde(default, rename = "milestone")]
        pub(super) milestone: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    struct KycStatusEnvelope {
        data: KycStatusRecord,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub(super) struct KycStatusRecord {
        pub(super) status: String,
        #[serde(default, rename = "submittedAt")]
        pub(super) submitted_at: Option<String>,
        #[serde(default, rename = "reviewedAt")]
        pub(super) reviewed_at: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    struct AnalyticsSummaryEnvelope {
        data: AnalyticsSummaryRecord,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub(super) struct AnalyticsSummaryRecord {
        #[serde(default, rename = "profileViews")]
        pub(super) profile_views: u64,
        #[serde(default, rename = "activeCollaborations")]
        pub(super) active_collaborations: u64,
        #[serde(default, rename = "completedProjects")]
        pub(super) completed_projects: u64,
        #[serde(default, rename = "unreadMessages")]
        pub(super) unread_messages: u64,
    }

    #[derive(Debug, Clone, Serialize)]
    struct BootDiagnostics {
        phase: String,
        detail: String,
        boot_started_at_unix_ms: Option<u64>,
        dom_ready_latency_ms: Option<u64>,
        boot_total_latency_ms: Option<u64>,
        budget_breaches: Vec<String>,
        route_query: String,
        pending_intents: usize,
        guard_fallbacks: u64,
        command_total: u64,
        command_failures: u64,
        last_command: Option<String>,
        last_command_latency_ms: Option<u64>,
        last_command_error_kind: Option<String>,
        last_error: Option<String>,
    }

    impl Default for BootDiagnostics {
        fn default() -> Self {
            Self {
                phase: "idle".to_string(),
                detail: "web shell not started".to_string(),
                boot_started_at_unix_ms: None,
                dom_ready_latency_ms: None,
                boot_total_latency_ms: None,
                budget_breaches: Vec::new(),
                route_query: "?page=landing".to_string(),
                pending_intents: 0,
                guard_fallbacks: 0,
                command_total: 0,
                command_failures: 0,
                last_command: None,
                last_command_latency_ms: None,
                last_command_error_kind: None,
                last_error: None,
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct StoredAuthTokens {
        token_type: String,
        access_token: String,
        refresh_token: String,
    }

    #[derive(Debug, Clone)]
    struct ControlApiError {
        status_code: u16,
        code: Option<String>,
        message: String,
        kind: CommandErrorKind,
        retryable: bool,
    }

    impl ControlApiError {
        fn unauthorized(message: impl Into<String>) -> Self {
            Self {
                status_code: 401,
                code: Some("unauthorized".to_string()),
                message: message.into(),
                kind: CommandErrorKind::Unauthorized,
                retryable: false,
            }
        }

        fn is_unauthorized(&self) -> bool {
            self.status_code == 401
        }

        fn from_command_error(error: CommandError) -> Self {
            Self {
                status_code: 0,
                code: Some(command_error_code(&error.kind).to_string()),
                message: error.message,
                kind: error.kind,
                retryable: error.retryable,
            }
        }

        fn to_command_error(&self) -> CommandError {
            CommandError {
                kind: self.kind,
                message: self.message.clone(),
                retryable: self.retryable,
            }
        }
    }

    impl std::fmt::Display for ControlApiError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            if let Some(code) = &self.code {
                write!(
                    f,
                    "{} ({code}, status={}, kind={:?}, retryable={})",
                    self.message, self.status_code, self.kind, self.retryable
                )
            } else {
                write!(
                    f,
                    "{} (status={}, kind={:?}, retryable={})",
                    self.message, self.status_code, self.kind, self.retryable
                )
            }
        }
    }

    #[derive(Debug, Deserialize)]
    struct ApiErrorBody {
        message: Option<String>,
        error: Option<ApiErrorDetail>,
    }

    #[derive(Debug, Deserialize)]
    struct ApiErrorDetail {
        code: Option<String>,
        message: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    struct SendCodeResponse {
        email: String,
        #[serde(rename = "challengeId")]
        challenge_id: String,
    }

    #[derive(Debug, Deserialize)]
    struct VerifyCodeResponse {
        #[serde(rename = "tokenType")]
        token_type: String,
        token: String,
        #[serde(rename = "refreshToken")]
        refresh_token: String,
    }

    #[derive(Debug, Deserialize)]
    struct RefreshResponse {
        #[serde(rename = "tokenType")]
        token_type: String,
        token: String,
        #[serde(rename = "refreshToken")]
        refresh_token: String,
    }

    #[derive(Debug, Deserialize)]
    struct SessionResponse {
        data: SessionResponseData,
    }

    #[derive(Debug, Deserialize)]
    struct SessionResponseData {
        session: SessionData,
        user: SessionUserData,
    }

    #[derive(Debug, Deserialize)]
    struct SessionData {
        #[serde(rename = "sessionId")]
        session_id: String,
        #[serde(rename = "userId")]
        user_id: String,
        status: String,
        #[serde(rename = "reauthRequired", default)]
        reauth_required: bool,
        #[serde(rename = "issuedAt")]
        issued_at: Option<String>,
        #[serde(rename = "accessExpiresAt")]
        access_expires_at: Option<String>,
        #[serde(rename = "refreshExpiresAt")]
        refresh_expires_at: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    struct SessionUserData {
        id: String,
        email: String,
        name: String,
        #[serde(default)]
        role: String,
        #[serde(rename = "emailVerified", default)]
        email_verified: bool,
    }

    #[derive(Debug, Clone)]
    struct SessionSnapshotWithUser {
        session: SessionSnapshot,
        user: AuthUser,
    }

    #[derive(Debug)]
    struct HydratedSessionWithTokens {
        user: AuthUser,
        session: SessionSnapshot,
        token_type: String,
        access_token: String,
        refresh_token: String,
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        set_boot_phase("booting", "initializing TalentLink web shell runtime");
        spawn_local(async {
            if let Err(error) = boot().await {
                set_boot_error(&error);
            }
        });
    }

    #[wasm_bindgen]
    pub fn boot_diagnostics_json() -> String {
        DIAGNOSTICS.with(|state| {
            serde_json::to_string(&*state.borrow()).unwrap_or_else(|_| {
                "{\"phase\":\"error\",\"detail\":\"diagnostics serialization failed\"}".to_string()
            })
        })
    }

    #[wasm_bindgen]
    pub fn app_state_json() -> String {
        APP_STATE.with(|state| {
            serde_json::to_string(&*state.borrow()).unwrap_or_else(|_| "{}".to_string())
        })
    }

    #[wasm_bindgen]
    pub fn auth_state_json() -> String {
        APP_STATE.with(|state| {
            serde_json::to_string(&state.borrow().auth).unwrap_or_else(|_| "{}".to_string())
        })
    }

    #[wasm_bindgen]
    pub fn chat_thread_state_json() -> String {
        CHAT_THREAD_STATE.with(|state| {
            serde_json::to_string(&*state.borrow()).unwrap_or_else(|_| "{}".to_string())
        })
    }

    #[wasm_bindgen]
    pub fn auth_send_code(email: String) {
        queue_intent(CommandIntent::StartAuthChallenge { email });
    }

    #[wasm_bindgen]
    pub fn auth_verify_code(code: String) {
        queue_intent(CommandIntent::VerifyAuthCode { code });
    }

    #[wasm_bindgen]
    pub fn auth_restore_session() {
        queue_intent(CommandIntent::RestoreSession);
    }

    #[wasm_bindgen]
    pub fn auth_logout() {
        queue_intent(CommandIntent::LogoutSession);
    }

    /// Programmatic navigation entry point. Accepts a query string of the
    /// form `?page=…&…`, the same shape the address bar carries. Typed
    /// routes travel through the intent queue; queries that do not resolve
    /// to one transition directly so the soft fallback keeps the raw URL.
    #[wasm_bindgen]
    pub fn navigate(query: String) {
        let nav = talentlink_app_state::NavigationState::decode(&query);
        match talentlink_app_state::Route::from_nav(&nav) {
            Ok(route) => queue_intent(CommandIntent::Navigate { route }),
            Err(_) => apply_search_transition(&query, true),
        }
    }

    #[wasm_bindgen]
    pub fn chat_send_message(text: String) {
        let target = CHAT_THREAD_STATE.with(|state| state.borrow().target_user_id.clone());
        let Some(target_user_id) = target else {
            CHAT_THREAD_STATE.with(|state| {
                state
                    .borrow_mut()
                    .append_system("Open a conversation before sending a message.");
            });
            render_chat_dom();
            return;
        };
        CHAT_THREAD_STATE.with(|state| {
            state.borrow_mut().append_local_outbound(&text);
        });
        render_chat_dom();
        queue_intent(CommandIntent::SendChatMessage {
            target_user_id,
            text,
        });
    }

    #[wasm_bindgen]
    pub fn kyc_submit_document(file_name: String, size_bytes: f64) {
        let size_bytes = if size_bytes.is_finite() && size_bytes.is_sign_positive() {
            size_bytes as u64
        } else {
            0
        };
        spawn_local(async move {
            submit_kyc_document_flow(file_name, size_bytes).await;
        });
    }

    #[wasm_bindgen]
    pub fn profile_save(display_name: String, tagline: String) {
        spawn_local(async move {
            save_profile_flow(display_name, tagline).await;
        });
    }

    async fn boot() -> Result<(), String> {
        let boot_started_at = Instant::now();
        let boot_started_at_unix_ms = now_unix_ms();
        DIAGNOSTICS.with(|state| {
            let mut state = state.borrow_mut();
            state.boot_started_at_unix_ms = Some(boot_started_at_unix_ms);
            state.dom_ready_latency_ms = None;
            state.boot_total_latency_ms = None;
            state.budget_breaches.clear();
        });

        ensure_app_dom()?;
        install_browser_navigation_handlers();
        install_panel_handlers();

        let current_search = current_search();
        APP_STATE.with(|state| {
            let mut state = state.borrow_mut();
            let _ = apply_action(
                &mut state,
                AppAction::BootstrapFromQuery {
                    search: current_search.clone(),
                },
            );
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
            update_diagnostics_from_state(state.nav.to_query(), state.intent_queue.len());
        });
        APP_STATE.with(|state| replace_nav_in_browser_history(&state.borrow().nav));
        sync_chat_target_from_state();
        schedule_surface_refreshes();
        render_view_dom();

        let dom_ready_latency_ms =
            u64::try_from(boot_started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        record_boot_milestone(
            "dom_ready_latency_ms",
            dom_ready_latency_ms,
            DOM_READY_BUDGET_MS,
        );

        set_boot_phase("ready", "shell interactive");
        let boot_total_latency_ms =
            u64::try_from(boot_started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        record_boot_milestone(
            "boot_total_latency_ms",
            boot_total_latency_ms,
            BOOT_TOTAL_BUDGET_MS,
        );

        schedule_command_processing();

        Ok(())
    }

    fn queue_intent(intent: CommandIntent) {
        APP_STATE.with(|state| {
            let mut state = state.borrow_mut();
            let _ = apply_action(&mut state, AppAction::QueueIntent { intent });
            update_diagnostics_from_state(state.nav.to_query(), state.intent_queue.len());
        });
        schedule_command_processing();
    }

    fn schedule_command_processing() {
        let already_active = COMMAND_LOOP_ACTIVE.with(|active| {
            if active.get() {
                true
            } else {
                active.set(true);
                false
            }
        });

        if already_active {
            return;
        }

        spawn_local(async {
            loop {
                let intents = APP_STATE.with(|state| {
                    let mut state = state.borrow_mut();
                    let drained = apply_action(&mut state, AppAction::DrainIntents).drained_intents;
                    update_diagnostics_from_state(state.nav.to_query(), state.intent_queue.len());
                    drained
                });

                if intents.is_empty() {
                    break;
                }

                for queued_intent in intents {
                    let intent = queued_intent.intent;
                    let started_at = Instant::now();
                    let outcome = handle_intent(intent.clone()).await;
                    let latency_ms =
                        u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let metric = match &outcome {
                        Ok(()) => command_latency_metric(&intent, latency_ms, Ok(())),
                        Err(error) => {
                            let command_error = error.to_command_error();
                            command_latency_metric(&intent, latency_ms, Err(&command_error))
                        }
                    };
                    record_command_metric(&metric);

                    APP_STATE.with(|state| {
                        let mut state = state.borrow_mut();
                        match outcome {
                            Ok(()) => {
                                let _ = apply_action(
                                    &mut state,
                                    AppAction::IntentCompleted {
                                        id: queued_intent.id,
                                    },
                                );
                            }
                            Err(error) => {
                                let _ = apply_action(
                                    &mut state,
                                    AppAction::IntentFailed {
                                        id: queued_intent.id,
                                        message: error.to_string(),
                                    },
                                );
                            }
                        }
                        update_diagnostics_from_state(
                            state.nav.to_query(),
                            state.intent_queue.len(),
                        );
                    });
                }
            }

            COMMAND_LOOP_ACTIVE.with(|active| active.set(false));

            let has_pending = APP_STATE.with(|state| !state.borrow().intent_queue.is_empty());
            if has_pending {
                schedule_command_processing();
            }
        });
    }

    fn record_command_metric(metric: &talentlink_app_state::CommandLatencyMetric) {
        DIAGNOSTICS.with(|diagnostics| {
            let mut diagnostics = diagnostics.borrow_mut();
            diagnostics.command_total = diagnostics.command_total.saturating_add(1);
            diagnostics.last_command = Some(metric.intent.clone());
            diagnostics.last_command_latency_ms = Some(metric.latency_ms);
            diagnostics.last_command_error_kind = metric
                .error_kind
                .as_ref()
                .map(|kind| command_error_code(kind).to_string());
            if !metric.success {
                diagnostics.command_failures = diagnostics.command_failures.saturating_add(1);
            }
        });
    }

    async fn handle_intent(intent: CommandIntent) -> Result<(), ControlApiError> {
        match intent {
            CommandIntent::Bootstrap => Ok(()),
            CommandIntent::StartAuthChallenge { email } => {
                apply_auth_action(AppAction::AuthChallengeRequested {
                    email: email.clone(),
                });
                let response = post_send_code(&email).await?;
                apply_auth_action(AppAction::AuthChallengeAccepted {
                    email: response.email,
                    challenge_id: response.challenge_id,
                });
                Ok(())
            }
            CommandIntent::VerifyAuthCode { code } => {
                apply_auth_action(AppAction::AuthVerifyRequested);
                verify_code_flow(code).await
            }
            CommandIntent::RestoreSession => restore_session_flow().await,
            CommandIntent::RefreshSession => refresh_session_flow().await,
            CommandIntent::LogoutSession => logout_flow().await,
            CommandIntent::SendChatMessage {
                target_user_id,
                text,
            } => send_chat_message_flow(target_user_id, text).await,
            CommandIntent::Navigate { route } => {
                apply_route_transition(route, true);
                Ok(())
            }
        }
    }

    async fn verify_code_flow(code: String) -> Result<(), ControlApiError> {
        let challenge_id = APP_STATE.with(|state| state.borrow().auth.challenge_id.clone());
        let verified = post_verify_code(&code, challenge_id.as_deref()).await?;

        let tokens = StoredAuthTokens {
            token_type: verified.token_type,
            access_token: verified.token,
            refresh_token: verified.refresh_token,
        };
        persist_tokens(&tokens).map_err(storage_error)?;

        match get_current_session(&tokens.access_token).await {
            Ok(hydrated) => {
                establish_session(hydrated, tokens);
                Ok(())
            }
            Err(error) if error.is_unauthorized() => match refresh_then_hydrate(tokens).await {
                Ok(hydrated) => {
                    let tokens = StoredAuthTokens {
                        token_type: hydrated.token_type.clone(),
                        access_token: hydrated.access_token.clone(),
                        refresh_token: hydrated.refresh_token.clone(),
                    };
                    establish_session(
                        SessionSnapshotWithUser {
                            session: hydrated.session,
                            user: hydrated.user,
                        },
                        tokens,
                    );
                    Ok(())
                }
                Err(refresh_error) => {
                    drop_session_state("Reauthentication required.");
                    Err(refresh_error)
                }
            },
            Err(error) => Err(error),
        }
    }

    async fn restore_session_flow() -> Result<(), ControlApiError> {
        apply_auth_action(AppAction::AuthSessionRestoreRequested);

        let Some(tokens) = load_tokens() else {
            reset_surface_states();
            apply_auth_action(AppAction::AuthSignedOut);
            mirror_gate_redirect_into_history();
            return Ok(());
        };

        match get_current_session(&tokens.access_token).await {
            Ok(snapshot) => {
                persist_tokens(&tokens).map_err(storage_error)?;
                establish_session(snapshot, tokens);
                Ok(())
            }
            Err(error) if error.is_unauthorized() => match refresh_then_hydrate(tokens).await {
                Ok(hydrated) => {
                    let tokens = StoredAuthTokens {
                        token_type: hydrated.token_type.clone(),
                        access_token: hydrated.access_token.clone(),
                        refresh_token: hydrated.refresh_token.clone(),
                    };
                    establish_session(
                        SessionSnapshotWithUser {
                            session: hydrated.session,
                            user: hydrated.user,
                        },
                        tokens,
                    );
                    Ok(())
                }
                Err(refresh_error) => {
                    drop_session_state("Session expired. Sign in again.");
                    Err(refresh_error)
                }
            },
            Err(error) => Err(error),
        }
    }

    async fn refresh_session_flow() -> Result<(), ControlApiError> {
        apply_auth_action(AppAction::AuthSessionRefreshRequested);

        let tokens = load_tokens().ok_or_else(|| {
            ControlApiError::from_command_error(CommandError::missing_credential(
                "refresh token is unavailable",
            ))
        })?;

        let hydrated = refresh_then_hydrate(tokens).await?;
        let tokens = StoredAuthTokens {
            token_type: hydrated.token_type.clone(),
            access_token: hydrated.access_token.clone(),
            refresh_token: hydrated.refresh_token.clone(),
        };
        establish_session(
            SessionSnapshotWithUser {
                session: hydrated.session,
                user: hydrated.user,
            },
            tokens,
        );
        Ok(())
    }

    async fn logout_flow() -> Result<(), ControlApiError> {
        let access_token = APP_STATE
            .with(|state| state.borrow().auth.access_token.clone())
            .unwrap_or_default();

        if !access_token.is_empty() {
            post_logout(&access_token).await?;
        }

        clear_persisted_tokens();
        reset_surface_states();
        apply_auth_action(AppAction::AuthSignedOut);
        mirror_gate_redirect_into_history();
        Ok(())
    }

    async fn send_chat_message_flow(
        target_user_id: String,
        text: String,
    ) -> Result<(), ControlApiError> {
        let normalized =
            normalize_chat_message_text(&text).map_err(message_input_validation_error)?;

        let response = post_chat_message(&target_user_id, &normalized).await;
        match response {
            Ok(payload) => {
                CHAT_THREAD_STATE.with(|state| {
                    state.borrow_mut().ingest_history_payload(&payload);
                });
                render_chat_dom();
                Ok(())
            }
            Err(error) => {
                CHAT_THREAD_STATE.with(|state| {
                    state
                        .borrow_mut()
                        .append_system(&format!("Send failed: {}", error.message));
                });
                render_chat_dom();
                Err(error)
            }
        }
    }

    fn establish_session(snapshot: SessionSnapshotWithUser, tokens: StoredAuthTokens) {
        apply_auth_action(AppAction::AuthSessionEstablished {
            user: snapshot.user,
            session: snapshot.session,
            token_type: tokens.token_type,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        });
        mirror_gate_redirect_into_history();
        sync_chat_target_from_state();
        schedule_surface_refreshes();
    }

    fn drop_session_state(message: &str) {
        clear_persisted_tokens();
        reset_surface_states();
        apply_auth_action(AppAction::AuthReauthRequired {
            message: message.to_string(),
        });
        mirror_gate_redirect_into_history();
    }

    fn apply_auth_action(action: AppAction) {
        APP_STATE.with(|state| {
            let mut state = state.borrow_mut();
            let _ = apply_action(&mut state, action);
            update_diagnostics_from_state(state.nav.to_query(), state.intent_queue.len());
        });
        render_view_dom();
    }

    /// Auth actions can trigger gate redirects (rules 1 and 2). The reducer
    /// already rewrote the navigation state; this mirrors it into the
    /// address bar without creating a history entry.
    fn mirror_gate_redirect_into_history() {
        APP_STATE.with(|state| {
            let state = state.borrow();
            replace_nav_in_browser_history(&state.nav);
        });
        sync_chat_target_from_state();
        schedule_surface_refreshes();
        render_view_dom();
    }

    async fn refresh_then_hydrate(
        tokens: StoredAuthTokens,
    ) -> Result<HydratedSessionWithTokens, ControlApiError> {
        let refreshed = post_refresh_session(&tokens.refresh_token).await?;
        let next_tokens = StoredAuthTokens {
            token_type: refreshed.token_type,
            access_token: refreshed.token,
            refresh_token: refreshed.refresh_token,
        };
        persist_tokens(&next_tokens).map_err(storage_error)?;
        let hydrated = get_current_session(&next_tokens.access_token).await?;
        Ok(HydratedSessionWithTokens {
            user: hydrated.user,
            session: hydrated.session,
            token_type: next_tokens.token_type,
            access_token: next_tokens.access_token,
            refresh_token: next_tokens.refresh_token,
        })
    }

    fn reset_surface_states() {
        LEADS_SURFACE_STATE.with(|state| *state.borrow_mut() = LeadsSurfaceState::default());
        FINANCE_SURFACE_STATE.with(|state| *state.borrow_mut() = FinanceSurfaceState::default());
        KYC_SURFACE_STATE.with(|state| *state.borrow_mut() = KycSurfaceState::default());
        ANALYTICS_SURFACE_STATE
            .with(|state| *state.borrow_mut() = AnalyticsSurfaceState::default());
        CHAT_THREAD_STATE.with(|state| *state.borrow_mut() = ChatThreadState::default());
    }

    fn snapshot_state() -> AppState {
        APP_STATE.with(|state| state.borrow().clone())
    }

    fn current_session_id() -> Option<String> {
        APP_STATE.with(|state| {
            state
                .borrow()
                .auth
                .session
                .as_ref()
                .map(|session| session.session_id.clone())
        })
    }

    fn current_view() -> View {
        APP_STATE.with(|state| state.borrow().current_view())
    }

    fn auth_input_validation_error(
        error: talentlink_client_core::auth::AuthInputError,
    ) -> ControlApiError {
        ControlApiError::from_command_error(CommandError::validation(error.to_string()))
    }

    fn message_input_validation_error(
        error: talentlink_client_core::message::MessageInputError,
    ) -> ControlApiError {
        ControlApiError::from_command_error(CommandError::validation(error.to_string()))
    }

    fn storage_error(message: String) -> ControlApiError {
        ControlApiError {
            status_code: 0,
            code: Some("storage_error".to_string()),
            message,
            kind: CommandErrorKind::Unknown,
            retryable: false,
        }
    }
}
