use super::*;
use talentlink_client_core::message::ChatMessageDirection;

    pub(super) fn ensure_app_dom() -> Result<(), String> {
        let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
        let document = window
            .document()
            .ok_or_else(|| "document is unavailable".to_string())?;
        let body = document
            .body()
            .ok_or_else(|| "document body is unavailable".to_string())?;

        if document.get_element_by_id(SHELL_STATUS_ID).is_none() {
            let status = create_styled_element(
                &document,
                "div",
                SHELL_STATUS_ID,
                &[
                    ("position", "fixed"),
                    ("bottom", "12px"),
                    ("left", "12px"),
                    ("font-family", "monospace"),
                    ("font-size", "12px"),
                    ("color", "#94a3b8"),
                    ("z-index", "40"),
                ],
            )?;
            status.set_inner_text("Boot: starting");
            body.append_child(&status)
                .map_err(|_| "failed to append status element".to_string())?;
        }

        if document.get_element_by_id(SHELL_ROOT_ID).is_none() {
            let root = create_styled_element(
                &document,
                "main",
                SHELL_ROOT_ID,
                &[
                    ("max-width", "960px"),
                    ("margin", "0 auto"),
                    ("padding", "24px 16px 96px"),
                    ("font-family", "system-ui, sans-serif"),
                    ("color", "#e2e8f0"),
                ],
            )?;

            let header = create_styled_element(
                &document,
                "header",
                SHELL_HEADER_ID,
                &[
                    ("display", "flex"),
                    ("align-items", "baseline"),
                    ("justify-content", "space-between"),
                    ("gap", "16px"),
                    ("border-bottom", "1px solid #334155"),
                    ("padding-bottom", "12px"),
                ],
            )?;

            let title = create_styled_element(
                &document,
                "h1",
                SHELL_TITLE_ID,
                &[("font-size", "20px"), ("margin", "0")],
            )?;
            title.set_inner_text("TalentLink");
            let _ = header.append_child(&title);

            let nav = create_styled_element(
                &document,
                "nav",
                SHELL_NAV_ID,
                &[("display", "flex"), ("gap", "12px"), ("flex-wrap", "wrap")],
            )?;
            for (label, href) in NAV_LINKS {
                let link = document
                    .create_element("a")
                    .map_err(|_| "failed to create nav link".to_string())?
                    .dyn_into::<HtmlElement>()
                    .map_err(|_| "nav link is not HtmlElement".to_string())?;
                let _ = link.set_attribute("href", href);
                link.set_inner_text(label);
                link.style()
                    .set_property("color", "#7dd3fc")
                    .map_err(|_| "failed to style nav link".to_string())?;
                let _ = nav.append_child(&link);
            }
            let _ = header.append_child(&nav);
            let _ = root.append_child(&header);

            let content = create_styled_element(
                &document,
                "section",
                SHELL_CONTENT_ID,
                &[("padding-top", "16px")],
            )?;
            let _ = root.append_child(&content);

            let auth_panel = build_auth_panel(&document)?;
            let _ = root.append_child(&auth_panel);

            let chat_panel = build_chat_panel(&document)?;
            let _ = root.append_child(&chat_panel);

            body.append_child(&root)
                .map_err(|_| "failed to append shell root".to_string())?;
        }

        Ok(())
    }

    fn build_auth_panel(document: &web_sys::Document) -> Result<HtmlElement, String> {
        let panel = create_styled_element(
            document,
            "section",
            AUTH_PANEL_ID,
            &[
                ("display", "none"),
                ("flex-direction", "column"),
                ("gap", "8px"),
                ("max-width", "360px"),
                ("margin-top", "16px"),
            ],
        )?;

        let email = create_input(document, AUTH_EMAIL_INPUT_ID, "email address")?;
        let _ = panel.append_child(&email);
        let code = create_input(document, AUTH_CODE_INPUT_ID, "verification code")?;
        let _ = panel.append_child(&code);

        for (id, label) in [
            (AUTH_SEND_ID, "Send code"),
            (AUTH_VERIFY_ID, "Verify"),
            (AUTH_LOGOUT_ID, "Sign out"),
        ] {
            let button = create_styled_element(
                document,
                "button",
                id,
                &[("padding", "6px 12px"), ("cursor", "pointer")],
            )?;
            button.set_inner_text(label);
            let _ = panel.append_child(&button);
        }

        Ok(panel)
    }

    fn build_chat_panel(document: &web_sys::Document) -> Result<HtmlElement, String> {
        let panel = create_styled_element(
            document,
            "section",
            CHAT_PANEL_ID,
            &[
                ("display", "none"),
                ("flex-direction", "column"),
                ("gap", "10px"),
                ("margin-top", "16px"),
            ],
        )?;

        let messages = create_styled_element(
            document,
            "div",
            CHAT_MESSAGES_ID,
            &[
                ("display", "flex"),
                ("flex-direction", "column"),
                ("gap", "8px"),
                ("max-height", "50vh"),
                ("overflow-y", "auto"),
            ],
        )?;
        let _ = panel.append_child(&messages);

        let composer_row = create_styled_element(
            document,
            "div",
            "",
            &[("display", "flex"), ("gap", "8px")],
        )?;
        let input = create_input(document, CHAT_INPUT_ID, "write a message")?;
        input
            .style()
            .set_property("flex", "1")
            .map_err(|_| "failed to style chat input".to_string())?;
        let _ = composer_row.append_child(&input);
        let send = create_styled_element(
            document,
            "button",
            CHAT_SEND_ID,
            &[("padding", "6px 16px"), ("cursor", "pointer")],
        )?;
        send.set_inner_text("Send");
        let _ = composer_row.append_child(&send);
        let _ = panel.append_child(&composer_row);

        Ok(panel)
    }

    fn create_styled_element(
        document: &web_sys::Document,
        tag: &str,
        id: &str,
        styles: &[(&str, &str)],
    ) -> Result<HtmlElement, String> {
        let element = document
            .create_element(tag)
            .map_err(|_| format!("failed to create `{tag}` element"))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| format!("`{tag}` element is not HtmlElement"))?;
        if !id.is_empty() {
            element.set_id(id);
        }
        for (property, value) in styles {
            element
                .style()
                .set_property(property, value)
                .map_err(|_| format!("failed to style `{tag}` element"))?;
        }
        Ok(element)
    }

    fn create_input(
        document: &web_sys::Document,
        id: &str,
        placeholder: &str,
    ) -> Result<HtmlElement, String> {
        let input = create_styled_element(
            document,
            "input",
            id,
            &[("padding", "6px 8px"), ("font-size", "14px")],
        )?;
        let _ = input.set_attribute("placeholder", placeholder);
        Ok(input)
    }

    pub(super) fn install_panel_handlers() {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        install_click_handler(&document, AUTH_SEND_ID, &AUTH_SEND_CLICK_HANDLER, || {
            let email = input_value(AUTH_EMAIL_INPUT_ID);
            queue_intent(CommandIntent::StartAuthChallenge { email });
        });
        install_click_handler(&document, AUTH_VERIFY_ID, &AUTH_VERIFY_CLICK_HANDLER, || {
            let code = input_value(AUTH_CODE_INPUT_ID);
            queue_intent(CommandIntent::VerifyAuthCode { code });
        });
        install_click_handler(&document, AUTH_LOGOUT_ID, &AUTH_LOGOUT_CLICK_HANDLER, || {
            queue_intent(CommandIntent::LogoutSession);
        });
        install_click_handler(&document, CHAT_SEND_ID, &CHAT_SEND_CLICK_HANDLER, || {
            submit_chat_composer();
        });

        CHAT_INPUT_KEYDOWN_HANDLER.with(|slot| {
            if slot.borrow().is_some() {
                return;
            }
            let Some(input) = document.get_element_by_id(CHAT_INPUT_ID) else {
                return;
            };
            let callback =
                Closure::<dyn FnMut(web_sys::KeyboardEvent)>::wrap(Box::new(move |event| {
                    if event.key() == "Enter" && !event.shift_key() {
                        event.prevent_default();
                        submit_chat_composer();
                    }
                }));
            let _ = input
                .add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref());
            *slot.borrow_mut() = Some(callback);
        });

        // View content is re-rendered wholesale, so its form buttons are
        // handled through one delegated listener instead of per-element
        // closures that would be dropped on the next render.
        CONTENT_CLICK_HANDLER.with(|slot| {
            if slot.borrow().is_some() {
                return;
            }
            let Some(content) = document.get_element_by_id(SHELL_CONTENT_ID) else {
                return;
            };
            let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event| {
                let Some(target) = event.target() else {
                    return;
                };
                let Ok(element) = target.dyn_into::<web_sys::Element>() else {
                    return;
                };
                match element.id().as_str() {
                    id if id == KYC_SUBMIT_ID => {
                        let file_name = input_value(KYC_FILE_INPUT_ID);
                        let size_bytes = input_value(KYC_SIZE_INPUT_ID)
                            .trim()
                            .parse::<u64>()
                            .unwrap_or(0);
                        spawn_local(async move {
                            submit_kyc_document_flow(file_name, size_bytes).await;
                        });
                    }
                    id if id == PROFILE_SAVE_ID => {
                        let display_name = input_value(PROFILE_NAME_INPUT_ID);
                        let tagline = input_value(PROFILE_TAGLINE_INPUT_ID);
                        spawn_local(async move {
                            save_profile_flow(display_name, tagline).await;
                        });
                    }
                    _ => {}
                }
            }));
            let _ = content
                .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
            *slot.borrow_mut() = Some(callback);
        });
    }

    fn install_click_handler(
        document: &web_sys::Document,
        element_id: &str,
        slot: &'static std::thread::LocalKey<RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>>>,
        action: impl Fn() + 'static,
    ) {
        slot.with(|slot| {
            if slot.borrow().is_some() {
                return;
            }
            let Some(element) = document.get_element_by_id(element_id) else {
                return;
            };
            let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
                action();
            }));
            let _ =
                element.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
            *slot.borrow_mut() = Some(callback);
        });
    }

    fn submit_chat_composer() {
        let text = input_value(CHAT_INPUT_ID);
        if text.trim().is_empty() {
            return;
        }
        set_input_value(CHAT_INPUT_ID, "");
        crate::wasm::chat_send_message(text);
    }

    pub(super) fn input_value(id: &str) -> String {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(id))
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn set_input_value(id: &str, value: &str) {
        if let Some(input) = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(id))
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(value);
        }
    }

    fn set_panel_display(id: &str, visible: bool) {
        if let Some(panel) = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(id))
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        {
            let display = if visible { "flex" } else { "none" };
            let _ = panel.style().set_property("display", display);
        }
    }

    pub(super) fn set_profile_status(message: &str, is_error: bool) {
        if let Some(status) = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(PROFILE_STATUS_ID))
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        {
            status.set_inner_text(message);
            let color = if is_error { "#f87171" } else { "#4ade80" };
            let _ = status.style().set_property("color", color);
        }
    }

    pub(super) fn render_view_dom() {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        let view = current_view();

        if let Some(title) = document
            .get_element_by_id(SHELL_TITLE_ID)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        {
            title.set_inner_text(view.title());
        }
        document.set_title(&format!("{} · TalentLink", view.title()));

        set_panel_display(
            AUTH_PANEL_ID,
            matches!(view, View::Login | View::Register),
        );
        set_panel_display(CHAT_PANEL_ID, matches!(view, View::Chat { .. }));

        if let Some(content) = document.get_element_by_id(SHELL_CONTENT_ID) {
            content.set_inner_html(&build_view_content(&view));
        }

        render_chat_dom();
    }

    fn build_view_content(view: &View) -> String {
        match view {
            View::Landing { logged_in } => {
                let call_to_action = if *logged_in {
                    "<p>Jump back in from the navigation above.</p>"
                } else {
                    "<p>Connect athletes, artists, and creators with sponsors. \
                     <a href=\"/?page=marketplace\">Browse the marketplace</a> or \
                     <a href=\"/?page=login\">sign in</a>.</p>"
                };
                format!("<h2>Where talent meets sponsors</h2>{call_to_action}")
            }
            View::Login => "<h2>Sign in</h2>\
                 <p>Enter your email to receive a one-time code.</p>"
                .to_string(),
            View::Register => "<h2>Create your account</h2>\
                 <p>Registration uses the same email-code flow; verify a code to get started.</p>"
                .to_string(),
            View::Marketplace { preview } => {
                let mut html = String::from("<h2>Marketplace</h2>");
                if *preview {
                    html.push_str(
                        "<p><em>Preview mode. <a href=\"/?page=login\">Sign in</a> to contact \
                         talents.</em></p>",
                    );
                }
                MARKETPLACE_SURFACE_STATE.with(|state| {
                    let state = state.borrow();
                    if let Some(error) = state.last_error.as_ref() {
                        html.push_str(&format!(
                            "<p>Could not load talents: {}</p>",
                            html_escape(error)
                        ));
                    } else if !state.loaded {
                        html.push_str("<p>Loading talents…</p>");
                    } else if state.talents.is_empty() {
                        html.push_str("<p>No talents listed yet.</p>");
                    } else {
                        html.push_str("<ul>");
                        for talent in &state.talents {
                            let badge = if talent.verified { " ✓" } else { "" };
                            html.push_str(&format!(
                                "<li><a href=\"/?page=talent-profile&talentId={}\">{}</a> — {}{}</li>",
                                html_escape(&talent.talent_id),
                                html_escape(&talent.display_name),
                                html_escape(&talent.discipline),
                                badge,
                            ));
                        }
                        html.push_str("</ul>");
                    }
                });
                html
            }
            View::TalentProfile { talent_id } => format!(
                "<h2>Talent profile</h2><p>Profile <code>{}</code> is loaded from the talent \
                 directory.</p>",
                html_escape(talent_id)
            ),
            View::CompanyProfile { company_id } => format!(
                "<h2>Company profile</h2><p>Company <code>{}</code> is loaded from the company \
                 directory.</p>",
                html_escape(company_id)
            ),
            View::Leads { .. } => {
                let mut html = String::from("<h2>Leads</h2>");
                LEADS_SURFACE_STATE.with(|state| {
                    let state = state.borrow();
                    if let Some(error) = state.last_error.as_ref() {
                        html.push_str(&format!(
                            "<p>Could not load leads: {}</p>",
                            html_escape(error)
                        ));
                    } else if state.loaded_session_id.is_none() {
                        html.push_str("<p>Loading leads…</p>");
                    } else if state.leads.is_empty() {
                        html.push_str("<p>No open leads.</p>");
                    } else {
                        html.push_str("<ul>");
                        for lead in &state.leads {
                            html.push_str(&format!(
                                "<li><strong>{}</strong> with {} — {} \
                                 (<code>{}</code>)</li>",
                                html_escape(&lead.title),
                                html_escape(&lead.counterpart_name),
                                html_escape(&lead.status),
                                html_escape(&lead.lead_id),
                            ));
                        }
                        html.push_str("</ul>");
                    }
                });
                html
            }
            View::Projects { .. } => "<h2>Projects</h2>\
                 <p>Your sponsorship projects, newest first. Open one for milestones and \
                 escrow status.</p>"
                .to_string(),
            View::ProjectDetail { project_id, .. } => format!(
                "<h2>Project</h2><p>Project <code>{}</code>: brief, milestones, deliverables, \
                 and the linked escrow ledger.</p>\
                 <p><a href=\"/?page=finance\">Open finance</a> · \
                 <a href=\"/?page=contracts\">contracts</a></p>",
                html_escape(project_id)
            ),
            View::ProjectCreate { .. } => "<h2>New project</h2>\
                 <p>Describe the campaign, set a budget, and invite a talent to collaborate.</p>"
                .to_string(),
            View::Collaborations { .. } => "<h2>Collaborations</h2>\
                 <p>Active and past collaborations with their current milestone.</p>"
                .to_string(),
            View::CollaborationDetail {
                collaboration_id, ..
            } => format!(
                "<h2>Collaboration</h2><p>Collaboration <code>{}</code>: timeline, deliverables, \
                 and payout schedule.</p>",
                html_escape(collaboration_id)
            ),
            View::Contracts { .. } => "<h2>Contracts</h2>\
                 <p>Generated agreements for your collaborations. Open one to review or \
                 download the text.</p>"
                .to_string(),
            View::ContractDetail { contract_id, .. } => format!(
                "<h2>Contract</h2><p>Contract <code>{}</code> rendered from the agreed terms.</p>",
                html_escape(contract_id)
            ),
            View::Payments { .. } | View::Finance { .. } => {
                let mut html = String::from(
                    "<h2>Escrow payments</h2>\
                     <p>Funds are held in escrow per milestone and released on approval.</p>",
                );
                FINANCE_SURFACE_STATE.with(|state| {
                    let state = state.borrow();
                    if let Some(error) = state.last_error.as_ref() {
                        html.push_str(&format!(
                            "<p>Could not load payments: {}</p>",
                            html_escape(error)
                        ));
                    } else if state.loaded_session_id.is_none() {
                        html.push_str("<p>Loading payments…</p>");
                    } else if state.payments.is_empty() {
                        html.push_str("<p>No escrow payments yet.</p>");
                    } else {
                        html.push_str("<ul>");
                        for payment in &state.payments {
                            let milestone = payment
                                .milestone
                                .as_deref()
                                .map(|milestone| format!(" · {}", html_escape(milestone)))
                                .unwrap_or_default();
                            html.push_str(&format!(
                                "<li>{} — {} {:.2} · {}{} (<code>{}</code>)</li>",
                                html_escape(&payment.project_title),
                                html_escape(&payment.currency),
                                payment.amount_cents as f64 / 100.0,
                                html_escape(&payment.status),
                                milestone,
                                html_escape(&payment.payment_id),
                            ));
                        }
                        html.push_str("</ul>");
                    }
                });
                html
            }
            View::Kyc { .. } => {
                let mut html = String::from(
                    "<h2>Identity verification</h2>\
                     <p>Upload a government id or company registration document.</p>",
                );
                KYC_SURFACE_STATE.with(|state| {
                    let state = state.borrow();
                    if let Some(status) = state.status.as_ref() {
                        let submitted = status
                            .submitted_at
                            .as_deref()
                            .map(|at| format!(" (submitted {})", html_escape(at)))
                            .unwrap_or_default();
                        let reviewed = status
                            .reviewed_at
                            .as_deref()
                            .map(|at| format!(" (reviewed {})", html_escape(at)))
                            .unwrap_or_default();
                        html.push_str(&format!(
                            "<p>Current status: <strong>{}</strong>{}{}</p>",
                            html_escape(&status.status),
                            submitted,
                            reviewed,
                        ));
                    }
                    if let Some(message) = state.last_status.as_ref() {
                        html.push_str(&format!("<p>{}</p>", html_escape(message)));
                    }
                    if let Some(error) = state.last_error.as_ref() {
                        html.push_str(&format!("<p>Upload failed: {}</p>", html_escape(error)));
                    }
                });
                html.push_str(&format!(
                    "<p><input id=\"{KYC_FILE_INPUT_ID}\" placeholder=\"file name, e.g. \
                     passport.pdf\"> <input id=\"{KYC_SIZE_INPUT_ID}\" placeholder=\"size in \
                     bytes\"> <button id=\"{KYC_SUBMIT_ID}\">Submit document</button></p>"
                ));
                html
            }
            View::Analytics { role, .. } => {
                let mut html = format!(
                    "<h2>Analytics</h2><p>Performance overview for your {} account.</p>",
                    html_escape(role.as_str())
                );
                ANALYTICS_SURFACE_STATE.with(|state| {
                    let state = state.borrow();
                    if let Some(error) = state.last_error.as_ref() {
                        html.push_str(&format!(
                            "<p>Could not load analytics: {}</p>",
                            html_escape(error)
                        ));
                    } else if let Some(summary) = state.summary.as_ref() {
                        html.push_str(&format!(
                            "<ul><li>Profile views: {}</li>\
                             <li>Active collaborations: {}</li>\
                             <li>Completed projects: {}</li>\
                             <li>Unread messages: {}</li></ul>",
                            summary.profile_views,
                            summary.active_collaborations,
                            summary.completed_projects,
                            summary.unread_messages,
                        ));
                    } else {
                        html.push_str("<p>Loading analytics…</p>");
                    }
                });
                html
            }
            View::Messages { .. } => "<h2>Messages</h2>\
                 <p>Your conversations. Open a talent or company profile to start a new one.</p>"
                .to_string(),
            View::Chat {
                target_user_name, ..
            } => format!(
                "<h2>Chat with {}</h2>",
                html_escape(target_user_name)
            ),
            View::Profile { .. } => "<h2>My profile</h2>\
                 <p>How sponsors see you. <a href=\"/?page=profile-edit\">Edit profile</a> · \
                 <a href=\"/?page=kyc\">verify identity</a>.</p>"
                .to_string(),
            View::ProfileEdit { .. } => format!(
                "<h2>Edit profile</h2>\
                 <p><input id=\"{PROFILE_NAME_INPUT_ID}\" placeholder=\"display name\"> \
                 <input id=\"{PROFILE_TAGLINE_INPUT_ID}\" placeholder=\"tagline\"> \
                 <button id=\"{PROFILE_SAVE_ID}\">Save</button></p>\
                 <p id=\"{PROFILE_STATUS_ID}\"></p>"
            ),
            View::Settings { .. } => "<h2>Settings</h2>\
                 <p>Notification preferences and connected accounts.</p>"
                .to_string(),
            View::Notifications { .. } => "<h2>Notifications</h2>\
                 <p>Updates on leads, milestones, and contract signatures.</p>"
                .to_string(),
            View::Admin { .. } => "<h2>Admin</h2>\
                 <p>User management, KYC review queue, and dispute handling.</p>"
                .to_string(),
            View::NotFound => "<h2>Page not found</h2>\
                 <p>The page you requested does not exist. \
                 <a href=\"/?page=landing\">Back to the start</a>.</p>"
                .to_string(),
        }
    }

    pub(super) fn render_chat_dom() {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        let Some(messages_container) = document
            .get_element_by_id(CHAT_MESSAGES_ID)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };

        messages_container.set_inner_html("");
        CHAT_THREAD_STATE.with(|state| {
            let state = state.borrow();
            for message in &state.messages {
                let Ok(element) = document.create_element("div") else {
                    continue;
                };
                let Ok(element) = element.dyn_into::<HtmlElement>() else {
                    continue;
                };
                let (align, color) = match message.direction {
                    ChatMessageDirection::Outbound => ("flex-end", "#0ea5e9"),
                    ChatMessageDirection::Inbound => ("flex-start", "#334155"),
                    ChatMessageDirection::System => ("center", "#64748b"),
                };
                let _ = element.style().set_property("align-self", align);
                let _ = element.style().set_property("background", color);
                let _ = element.style().set_property("border-radius", "8px");
                let _ = element.style().set_property("padding", "6px 10px");
                let _ = element.style().set_property("max-width", "70%");
                element.set_inner_text(&message.text);
                let _ = messages_container.append_child(&element);
            }
            if let Some(error) = state.last_error.as_ref() {
                if let Ok(element) = document.create_element("div") {
                    if let Ok(element) = element.dyn_into::<HtmlElement>() {
                        let _ = element.style().set_property("color", "#f87171");
                        element.set_inner_text(error);
                        let _ = messages_container.append_child(&element);
                    }
                }
            }
        });
        messages_container.set_scroll_top(messages_container.scroll_height());
    }

    fn html_escape(raw: &str) -> String {
        let mut escaped = String::with_capacity(raw.len());
        for ch in raw.chars() {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                other => escaped.push(other),
            }
        }
        escaped
    }
