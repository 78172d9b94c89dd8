use super::*;

    pub(super) fn set_boot_phase(phase: &str, detail: &str) {
        DIAGNOSTICS.with(|state| {
            let mut state = state.borrow_mut();
            state.phase = phase.to_string();
            state.detail = detail.to_string();
            if phase != "error" {
                state.last_error = None;
            }
        });
        update_status_dom(phase, detail, false);
    }

    pub(super) fn set_boot_error(message: &str) {
        DIAGNOSTICS.with(|state| {
            let mut state = state.borrow_mut();
            state.phase = "error".to_string();
            state.detail = "startup failed".to_string();
            state.last_error = Some(message.to_string());
        });
        update_status_dom("error", message, true);
    }

    pub(super) fn update_status_dom(phase: &str, detail: &str, is_error: bool) {
        if let Some(window) = web_sys::window() {
            if let Some(document) = window.document() {
                if let Some(status) = document.get_element_by_id(SHELL_STATUS_ID) {
                    if let Ok(status) = status.dyn_into::<HtmlElement>() {
                        let label = if is_error { "Boot error" } else { "Boot" };
                        status.set_inner_text(&format!("{label}: {phase} ({detail})"));
                        let color = if is_error { "#f87171" } else { "#94a3b8" };
                        let _ = status.style().set_property("color", color);
                    }
                }
            }
        }
    }

    pub(super) fn record_boot_milestone(metric_name: &str, actual_ms: u64, budget_ms: u64) {
        DIAGNOSTICS.with(|state| {
            let mut state = state.borrow_mut();
            match metric_name {
                "dom_ready_latency_ms" => state.dom_ready_latency_ms = Some(actual_ms),
                "boot_total_latency_ms" => state.boot_total_latency_ms = Some(actual_ms),
                _ => {}
            }
            if actual_ms > budget_ms {
                state
                    .budget_breaches
                    .push(format!("{metric_name}>{budget_ms} (actual={actual_ms})"));
            }
        });
    }

    pub(super) fn now_unix_ms() -> u64 {
        let now = js_sys::Date::now();
        if !now.is_finite() || now.is_sign_negative() {
            return 0;
        }
        now.floor().min(u64::MAX as f64) as u64
    }

    pub(super) fn current_search() -> String {
        let Some(window) = web_sys::window() else {
            return String::new();
        };
        let Ok(search) = window.location().search() else {
            return String::new();
        };
        search
    }

    pub(super) fn update_diagnostics_from_state(route_query: String, pending_intents: usize) {
        DIAGNOSTICS.with(|state| {
            let mut state = state.borrow_mut();
            state.route_query = route_query;
            state.pending_intents = pending_intents;
        });
    }
