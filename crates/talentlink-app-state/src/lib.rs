//! Platform-neutral state core for the TalentLink web shell.
//!
//! Holds the navigation state machine (URL codec, typed routes, the
//! authorization gate, the view dispatcher), the auth projection, and the
//! command-intent pipeline. No `web-sys` here; everything is testable on
//! the host and the wasm shell is a thin adapter over `apply_action`.

mod access;
mod auth;
mod command;
mod nav;
mod route;
mod state;
mod view;

pub use access::{protected_page, protected_pages, redirect_for, role_landing};
pub use auth::{
    AuthPhase, AuthState, AuthUser, SessionLifecycleStatus, SessionSnapshot, SessionView, UserRole,
};
pub use command::{
    AuthRequirement, CommandError, CommandErrorKind, CommandIntent, CommandLatencyMetric,
    HttpCommandRequest, HttpMethod, classify_http_error, command_error_code,
    command_latency_metric, encode_path_component, map_intent_to_http,
};
pub use nav::{DEFAULT_PAGE_KEY, NavigationState};
pub use route::{Route, RouteError};
pub use state::{ActionEffects, AppAction, AppState, QueuedIntent, apply_action};
pub use view::{View, resolve_view};
