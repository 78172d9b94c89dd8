use super::*;
use talentlink_app_state::{ActionEffects, NavigationState, Route};

    /// Forward navigation with a typed payload. Pushes a history entry
    /// unless the transition came from popstate.
    pub(super) fn apply_route_transition(route: Route, push_history: bool) {
        let effects = APP_STATE.with(|state| {
            let mut state = state.borrow_mut();
            let effects = apply_action(&mut state, AppAction::Navigate { route });
            update_diagnostics_from_state(state.nav.to_query(), state.intent_queue.len());
            effects
        });
        finish_transition(&effects, push_history);
    }

    /// Navigation from a raw query string (address bar, intercepted link,
    /// or the exported `navigate` binding). Typed routes go through the
    /// `Navigate` action; unknown or payload-incomplete queries keep the
    /// raw navigation state so the soft fallback and the address bar agree.
    pub(super) fn apply_search_transition(search: &str, push_history: bool) {
        let nav = NavigationState::decode(search);
        match Route::from_nav(&nav) {
            Ok(route) => apply_route_transition(route, push_history),
            Err(_) => {
                let effects = APP_STATE.with(|state| {
                    let mut state = state.borrow_mut();
                    let effects = apply_action(
                        &mut state,
                        AppAction::HistoryPopped {
                            search: search.to_string(),
                        },
                    );
                    update_diagnostics_from_state(state.nav.to_query(), state.intent_queue.len());
                    effects
                });
                finish_transition(&effects, push_history);
            }
        }
    }

    fn finish_transition(effects: &ActionEffects, push_history: bool) {
        if push_history {
            scroll_to_top();
            APP_STATE.with(|state| push_nav_to_browser_history(&state.borrow().nav));
        } else if effects.redirected_to.is_some() {
            // Gate redirects on popstate replace the blocked entry so the
            // back button does not bounce between it and the redirect.
            APP_STATE.with(|state| replace_nav_in_browser_history(&state.borrow().nav));
        }
        observe_guard_fallback();
        sync_chat_target_from_state();
        schedule_surface_refreshes();
        render_view_dom();
    }

    /// A landing render while the address bar points elsewhere means a
    /// per-branch guard degraded the view. Counted for observability;
    /// unknown pages render not-found and are excluded by construction.
    fn observe_guard_fallback() {
        let fell_back = APP_STATE.with(|state| {
            let state = state.borrow();
            matches!(state.current_view(), View::Landing { .. }) && state.nav.page != "landing"
        });
        if fell_back {
            APP_STATE.with(|state| {
                let mut state = state.borrow_mut();
                let _ = apply_action(&mut state, AppAction::GuardFallbackObserved);
            });
            DIAGNOSTICS.with(|diagnostics| {
                diagnostics.borrow_mut().guard_fallbacks = APP_STATE
                    .with(|state| state.borrow().guard_fallbacks);
            });
        }
    }

    pub(super) fn sync_chat_target_from_state() {
        let target = match current_view() {
            View::Chat {
                target_user_id,
                target_user_name,
                ..
            } => Some((target_user_id, target_user_name)),
            _ => None,
        };
        CHAT_THREAD_STATE.with(|state| {
            let mut state = state.borrow_mut();
            match target {
                Some((target_user_id, target_user_name)) => {
                    state.set_target(Some(target_user_id), Some(target_user_name));
                }
                None => state.set_target(None, None),
            }
        });
        schedule_chat_history_refresh();
    }

    pub(super) fn install_browser_navigation_handlers() {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        ROUTE_POPSTATE_HANDLER.with(|slot| {
            if slot.borrow().is_some() {
                return;
            }
            let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
                apply_search_transition(&current_search(), false);
            }));
            let _ = window
                .add_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref());
            *slot.borrow_mut() = Some(callback);
        });

        ROUTE_LINK_CLICK_HANDLER.with(|slot| {
            if slot.borrow().is_some() {
                return;
            }
            let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event| {
                intercept_internal_link_click(event);
            }));
            let _ = document.add_event_listener_with_callback_and_bool(
                "click",
                callback.as_ref().unchecked_ref(),
                true,
            );
            *slot.borrow_mut() = Some(callback);
        });
    }

    pub(super) fn intercept_internal_link_click(event: web_sys::Event) {
        if event.default_prevented() {
            return;
        }
        let Some(mouse_event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        if mouse_event.button() != 0
            || mouse_event.meta_key()
            || mouse_event.ctrl_key()
            || mouse_event.shift_key()
            || mouse_event.alt_key()
        {
            return;
        }

        let Some(anchor) = anchor_from_event(&event) else {
            return;
        };
        let href_attribute = anchor.get_attribute("href").unwrap_or_default();
        if href_attribute.trim().is_empty() || href_attribute.starts_with('#') {
            return;
        }
        if anchor.has_attribute("download") {
            return;
        }
        let target = anchor.target();
        if !target.is_empty() && target != "_self" {
            return;
        }

        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(origin) = window.location().origin() else {
            return;
        };

        let href = anchor.href();
        if href.is_empty() {
            return;
        }

        let path_with_query = if href.starts_with(&origin) {
            href.strip_prefix(&origin).unwrap_or_default().to_string()
        } else if href.starts_with('/') {
            href
        } else {
            return;
        };

        // Internal shell links live at the root path; navigation position
        // is carried entirely by the query string.
        let (path, search) = match path_with_query.split_once('?') {
            Some((path, search)) => (path, search),
            None => (path_with_query.as_str(), ""),
        };
        let path = path.split('#').next().unwrap_or(path);
        if !(path.is_empty() || path == "/") {
            return;
        }
        let search = search.split('#').next().unwrap_or(search);

        event.prevent_default();
        apply_search_transition(search, true);
    }

    pub(super) fn anchor_from_event(event: &web_sys::Event) -> Option<HtmlAnchorElement> {
        let composed_path = event.composed_path();
        for index in 0..composed_path.length() {
            let value = composed_path.get(index);
            if let Ok(anchor) = value.dyn_into::<HtmlAnchorElement>() {
                return Some(anchor);
            }
        }
        None
    }

    pub(super) fn push_nav_to_browser_history(nav: &NavigationState) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(history) = window.history() else {
            return;
        };
        let url = format!("/{}", nav.to_query());
        if current_search() == nav.to_query() {
            return;
        }
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&url));
    }

    pub(super) fn replace_nav_in_browser_history(nav: &NavigationState) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(history) = window.history() else {
            return;
        };
        let url = format!("/{}", nav.to_query());
        if current_search() == nav.to_query() {
            return;
        }
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&url));
    }

    pub(super) fn scroll_to_top() {
        if let Some(window) = web_sys::window() {
            window.scroll_to_with_x_and_y(0.0, 0.0);
        }
    }
