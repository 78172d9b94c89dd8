use super::*;

    pub(super) async fn post_send_code(email: &str) -> Result<SendCodeResponse, ControlApiError> {
        let normalized_email = normalize_email(email).map_err(auth_input_validation_error)?;
        let state = snapshot_state();
        let intent = CommandIntent::StartAuthChallenge {
            email: normalized_email,
        };
        let request = plan_http_request(&intent, &state)?;
        send_json_request(&request, &state).await
    }

    pub(super) async fn post_verify_code(
        code: &str,
        challenge_id: Option<&str>,
    ) -> Result<VerifyCodeResponse, ControlApiError> {
        let normalized_code =
            normalize_verification_code(code).map_err(auth_input_validation_error)?;
        let mut state = snapshot_state();
        state.auth.challenge_id = challenge_id.map(ToString::to_string);
        let intent = CommandIntent::VerifyAuthCode {
            code: normalized_code,
        };
        let request = plan_http_request(&intent, &state)?;
        send_json_request(&request, &state).await
    }

    pub(super) async fn post_refresh_session(
        refresh_token: &str,
    ) -> Result<RefreshResponse, ControlApiError> {
        let mut state = snapshot_state();
        state.auth.refresh_token = Some(refresh_token.to_string());
        let intent = CommandIntent::RefreshSession;
        let request = plan_http_request(&intent, &state)?;
        send_json_request(&request, &state).await
    }

    pub(super) async fn post_logout(
        access_token: &str,
    ) -> Result<serde_json::Value, ControlApiError> {
        let mut state = snapshot_state();
        state.auth.access_token = Some(access_token.to_string());
        let intent = CommandIntent::LogoutSession;
        let request = plan_http_request(&intent, &state)?;
        send_json_request(&request, &state).await
    }

    pub(super) async fn get_current_session(
        access_token: &str,
    ) -> Result<SessionSnapshotWithUser, ControlApiError> {
        let mut state = snapshot_state();
        state.auth.access_token = Some(access_token.to_string());
        let intent = CommandIntent::RestoreSession;
        let request = plan_http_request(&intent, &state)?;
        let response: SessionResponse = send_json_request(&request, &state).await?;
        let session_status = SessionLifecycleStatus::from_wire(&response.data.session.status);
        let session = SessionSnapshot {
            session_id: response.data.session.session_id,
            user_id: response.data.session.user_id,
            status: session_status,
            reauth_required: response.data.session.reauth_required,
            issued_at: response.data.session.issued_at,
            access_expires_at: response.data.session.access_expires_at,
            refresh_expires_at: response.data.session.refresh_expires_at,
        };
        let user = AuthUser {
            user_id: response.data.user.id,
            email: response.data.user.email,
            name: response.data.user.name,
            role: UserRole::from_wire(&response.data.user.role),
            email_verified: response.data.user.email_verified,
        };
        if session.status == SessionLifecycleStatus::ReauthRequired || session.reauth_required {
            return Err(ControlApiError::unauthorized(
                "Reauthentication required for this session.",
            ));
        }
        Ok(SessionSnapshotWithUser { session, user })
    }

    pub(super) async fn post_chat_message(
        target_user_id: &str,
        text: &str,
    ) -> Result<serde_json::Value, ControlApiError> {
        let state = snapshot_state();
        let intent = CommandIntent::SendChatMessage {
            target_user_id: target_user_id.to_string(),
            text: text.to_string(),
        };
        let request = plan_http_request(&intent, &state)?;
        send_json_request(&request, &state).await
    }

    pub(super) fn plan_http_request(
        intent: &CommandIntent,
        state: &AppState,
    ) -> Result<HttpCommandRequest, ControlApiError> {
        map_intent_to_http(intent, state).map_err(ControlApiError::from_command_error)
    }

    pub(super) async fn send_json_request<T: for<'de> Deserialize<'de>>(
        request: &HttpCommandRequest,
        state: &AppState,
    ) -> Result<T, ControlApiError> {
        let mut request_builder = match request.method {
            HttpMethod::Get => Request::get(&request.path),
            HttpMethod::Post => {
                Request::post(&request.path).header("content-type", "application/json")
            }
        };

        for (header_name, header_value) in &request.headers {
            request_builder = request_builder.header(header_name, header_value);
        }

        if let Some(token) = resolve_bearer_token(&request.auth, state) {
            request_builder = request_builder.header("authorization", &format!("Bearer {token}"));
        }

        let response = if let Some(body) = request.body.as_ref() {
            let body = serde_json::to_string(body).map_err(|error| ControlApiError {
                status_code: 500,
                code: Some("request_body_serialize_failed".to_string()),
                message: format!("failed to serialize request body: {error}"),
                kind: CommandErrorKind::Decode,
                retryable: false,
            })?;
            let request = request_builder
                .body(body)
                .map_err(|error| ControlApiError {
                    status_code: 500,
                    code: Some("request_build_failed".to_string()),
                    message: format!("failed to build request body: {error}"),
                    kind: CommandErrorKind::Unknown,
                    retryable: false,
                })?;
            request.send().await.map_err(map_network_error)?
        } else {
            request_builder.send().await.map_err(map_network_error)?
        };

        decode_json_response(response).await
    }

    pub(super) fn resolve_bearer_token(auth: &AuthRequirement, state: &AppState) -> Option<String> {
        match auth {
            AuthRequirement::None => None,
            AuthRequirement::AccessToken => state.auth.access_token.clone(),
            AuthRequirement::RefreshToken => state.auth.refresh_token.clone(),
        }
    }

    pub(super) fn map_network_error(error: gloo_net::Error) -> ControlApiError {
        let classified = classify_http_error(0, Some("network_error"), error.to_string());
        ControlApiError {
            status_code: 0,
            code: Some("network_error".to_string()),
            message: classified.message,
            kind: classified.kind,
            retryable: classified.retryable,
        }
    }

    pub(super) async fn decode_json_response<T: for<'de> Deserialize<'de>>(
        response: gloo_net::http::Response,
    ) -> Result<T, ControlApiError> {
        let status = response.status();
        let raw = response.text().await.map_err(|error| ControlApiError {
            status_code: status,
            code: Some("response_read_failed".to_string()),
            message: error.to_string(),
            kind: CommandErrorKind::Unknown,
            retryable: false,
        })?;

        if !(200..=299).contains(&status) {
            let parsed_error: Option<ApiErrorBody> = serde_json::from_str(&raw).ok();
            let code = parsed_error
                .as_ref()
                .and_then(|error| error.error.as_ref())
                .and_then(|detail| detail.code.clone());
            let message = parsed_error
                .as_ref()
                .and_then(|error| error.message.clone())
                .or_else(|| {
                    parsed_error
                        .as_ref()
                        .and_then(|error| error.error.as_ref())
                        .and_then(|detail| detail.message.clone())
                })
                .unwrap_or_else(|| format!("request failed with status {status}"));
            let classified = classify_http_error(status, code.as_deref(), message);
            return Err(ControlApiError {
                status_code: status,
                code,
                message: classified.message,
                kind: classified.kind,
                retryable: classified.retryable,
            });
        }

        serde_json::from_str(&raw).map_err(|error| {
            let code = Some("decode_failed".to_string());
            let classified = classify_http_error(
                status,
                code.as_deref(),
                format!("failed to decode response: {error}"),
            );
            ControlApiError {
                status_code: status,
                code,
                message: classified.message,
                kind: classified.kind,
                retryable: classified.retryable,
            }
        })
    }

    async fn authorized_get<T: for<'de> Deserialize<'de>>(
        path: &str,
    ) -> Result<T, ControlApiError> {
        let state = snapshot_state();
        let Some(access_token) = state.auth.access_token.as_ref() else {
            return Err(ControlApiError::from_command_error(
                CommandError::missing_credential("access token is required"),
            ));
        };
        let response = Request::get(path)
            .header("authorization", &format!("Bearer {access_token}"))
            .send()
            .await
            .map_err(map_network_error)?;
        decode_json_response(response).await
    }

    async fn public_get<T: for<'de> Deserialize<'de>>(path: &str) -> Result<T, ControlApiError> {
        let response = Request::get(path).send().await.map_err(map_network_error)?;
        decode_json_response(response).await
    }

    // --- token persistence ---

    fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|window| window.local_storage().ok().flatten())
    }

    pub(super) fn persist_tokens(tokens: &StoredAuthTokens) -> Result<(), String> {
        let Some(storage) = local_storage() else {
            return Err("local storage is unavailable".to_string());
        };
        let serialized = serde_json::to_string(tokens)
            .map_err(|error| format!("failed to serialize auth tokens: {error}"))?;
        storage
            .set_item(AUTH_STORAGE_KEY, &serialized)
            .map_err(|_| "failed to persist auth tokens".to_string())
    }

    pub(super) fn load_tokens() -> Option<StoredAuthTokens> {
        let storage = local_storage()?;
        let raw = storage.get_item(AUTH_STORAGE_KEY).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    pub(super) fn clear_persisted_tokens() {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(AUTH_STORAGE_KEY);
        }
    }

    // --- surface refresh flows ---

    pub(super) fn schedule_surface_refreshes() {
        schedule_marketplace_refresh();
        schedule_leads_refresh();
        schedule_finance_refresh();
        schedule_kyc_refresh();
        schedule_analytics_refresh();
    }

    pub(super) fn schedule_marketplace_refresh() {
        if !matches!(current_view(), View::Marketplace { .. }) {
            return;
        }
        let already_loaded = MARKETPLACE_SURFACE_STATE.with(|state| state.borrow().loaded);
        if already_loaded {
            return;
        }
        if mark_loading(&MARKETPLACE_SURFACE_LOADING) {
            return;
        }
        spawn_local(async {
            sleep(Duration::from_millis(u64::from(SURFACE_REFRESH_DEBOUNCE_MS))).await;
            let result: Result<TalentListingEnvelope, ControlApiError> =
                public_get("/api/talents").await;
            MARKETPLACE_SURFACE_STATE.with(|state| {
                let mut state = state.borrow_mut();
                match result {
                    Ok(envelope) => {
                        state.loaded = true;
                        state.talents = envelope.data.talents;
                        state.last_error = None;
                    }
                    Err(error) => state.last_error = Some(error.to_string()),
                }
            });
            MARKETPLACE_SURFACE_LOADING.with(|loading| loading.set(false));
            render_view_dom();
        });
    }

    pub(super) fn schedule_leads_refresh() {
        if !matches!(current_view(), View::Leads { .. }) {
            return;
        }
        let session_id = current_session_id();
        if session_id.is_none() {
            return;
        }
        let already_loaded =
            LEADS_SURFACE_STATE.with(|state| state.borrow().loaded_session_id == session_id);
        if already_loaded {
            return;
        }
        if mark_loading(&LEADS_SURFACE_LOADING) {
            return;
        }
        spawn_local(async move {
            sleep(Duration::from_millis(u64::from(SURFACE_REFRESH_DEBOUNCE_MS))).await;
            let result: Result<LeadsEnvelope, ControlApiError> = authorized_get("/api/leads").await;
            LEADS_SURFACE_STATE.with(|state| {
                let mut state = state.borrow_mut();
                match result {
                    Ok(envelope) => {
                        state.loaded_session_id = session_id;
                        state.leads = envelope.data.leads;
                        state.last_error = None;
                    }
                    Err(error) => state.last_error = Some(error.to_string()),
                }
            });
            LEADS_SURFACE_LOADING.with(|loading| loading.set(false));
            render_view_dom();
        });
    }

    pub(super) fn schedule_finance_refresh() {
        if !matches!(current_view(), View::Finance { .. } | View::Payments { .. }) {
            return;
        }
        let session_id = current_session_id();
        if session_id.is_none() {
            return;
        }
        let already_loaded =
            FINANCE_SURFACE_STATE.with(|state| state.borrow().loaded_session_id == session_id);
        if already_loaded {
            return;
        }
        if mark_loading(&FINANCE_SURFACE_LOADING) {
            return;
        }
        spawn_local(async move {
            sleep(Duration::from_millis(u64::from(SURFACE_REFRESH_DEBOUNCE_MS))).await;
            let result: Result<EscrowPaymentsEnvelope, ControlApiError> =
                authorized_get("/api/payments/escrow").await;
            FINANCE_SURFACE_STATE.with(|state| {
                let mut state = state.borrow_mut();
                match result {
                    Ok(envelope) => {
                        state.loaded_session_id = session_id;
                        state.payments = envelope.data.payments;
                        state.last_error = None;
                    }
                    Err(error) => state.last_error = Some(error.to_string()),
                }
            });
            FINANCE_SURFACE_LOADING.with(|loading| loading.set(false));
            render_view_dom();
        });
    }

    pub(super) fn schedule_kyc_refresh() {
        if !matches!(current_view(), View::Kyc { .. }) {
            return;
        }
        let session_id = current_session_id();
        if session_id.is_none() {
            return;
        }
        let already_loaded =
            KYC_SURFACE_STATE.with(|state| state.borrow().loaded_session_id == session_id);
        if already_loaded {
            return;
        }
        if mark_loading(&KYC_SURFACE_LOADING) {
            return;
        }
        spawn_local(async move {
            sleep(Duration::from_millis(u64::from(SURFACE_REFRESH_DEBOUNCE_MS))).await;
            let result: Result<KycStatusEnvelope, ControlApiError> =
                authorized_get("/api/kyc/status").await;
            KYC_SURFACE_STATE.with(|state| {
                let mut state = state.borrow_mut();
                match result {
                    Ok(envelope) => {
                        state.loaded_session_id = session_id;
                        state.status = Some(envelope.data);
                        state.last_error = None;
                    }
                    Err(error) => state.last_error = Some(error.to_string()),
                }
            });
            KYC_SURFACE_LOADING.with(|loading| loading.set(false));
            render_view_dom();
        });
    }

    pub(super) fn schedule_analytics_refresh() {
        if !matches!(current_view(), View::Analytics { .. }) {
            return;
        }
        let session_id = current_session_id();
        if session_id.is_none() {
            return;
        }
        let already_loaded =
            ANALYTICS_SURFACE_STATE.with(|state| state.borrow().loaded_session_id == session_id);
        if already_loaded {
            return;
        }
        if mark_loading(&ANALYTICS_SURFACE_LOADING) {
            return;
        }
        spawn_local(async move {
            sleep(Duration::from_millis(u64::from(SURFACE_REFRESH_DEBOUNCE_MS))).await;
            let result: Result<AnalyticsSummaryEnvelope, ControlApiError> =
                authorized_get("/api/analytics/summary").await;
            ANALYTICS_SURFACE_STATE.with(|state| {
                let mut state = state.borrow_mut();
                match result {
                    Ok(envelope) => {
                        state.loaded_session_id = session_id;
                        state.summary = Some(envelope.data);
                        state.last_error = None;
                    }
                    Err(error) => state.last_error = Some(error.to_string()),
                }
            });
            ANALYTICS_SURFACE_LOADING.with(|loading| loading.set(false));
            render_view_dom();
        });
    }

    pub(super) fn schedule_chat_history_refresh() {
        let target = CHAT_THREAD_STATE.with(|state| state.borrow().target_user_id.clone());
        let Some(target_user_id) = target else {
            return;
        };
        if current_session_id().is_none() {
            return;
        }
        if mark_loading(&CHAT_THREAD_LOADING) {
            return;
        }
        spawn_local(async move {
            sleep(Duration::from_millis(u64::from(SURFACE_REFRESH_DEBOUNCE_MS))).await;
            let path = format!(
                "/api/messages/{}/history",
                talentlink_app_state::encode_path_component(&target_user_id)
            );
            let result: Result<serde_json::Value, ControlApiError> = authorized_get(&path).await;
            CHAT_THREAD_STATE.with(|state| {
                let mut state = state.borrow_mut();
                match result {
                    Ok(payload) => {
                        let _ = state.ingest_history_payload(&payload);
                        state.last_error = None;
                    }
                    Err(error) => state.last_error = Some(error.message),
                }
            });
            CHAT_THREAD_LOADING.with(|loading| loading.set(false));
            render_chat_dom();
        });
    }

    fn mark_loading(flag: &'static std::thread::LocalKey<Cell<bool>>) -> bool {
        flag.with(|loading| {
            if loading.get() {
                true
            } else {
                loading.set(true);
                false
            }
        })
    }

    // --- form submission flows ---

    pub(super) async fn submit_kyc_document_flow(file_name: String, size_bytes: u64) {
        let descriptor = match validate_kyc_document(&file_name, size_bytes) {
            Ok(descriptor) => descriptor,
            Err(error) => {
                KYC_SURFACE_STATE.with(|state| {
                    state.borrow_mut().last_error = Some(error.to_string());
                });
                render_view_dom();
                return;
            }
        };

        let state = snapshot_state();
        let Some(access_token) = state.auth.access_token.clone() else {
            KYC_SURFACE_STATE.with(|state| {
                state.borrow_mut().last_error =
                    Some("sign in before uploading a document".to_string());
            });
            render_view_dom();
            return;
        };

        let body = serde_json::json!({
            "fileName": descriptor.file_name,
            "extension": descriptor.extension,
            "sizeBytes": descriptor.size_bytes,
        });
        let outcome = async {
            let request = Request::post("/api/kyc/documents")
                .header("content-type", "application/json")
                .header("authorization", &format!("Bearer {access_token}"))
                .body(body.to_string())
                .map_err(|error| ControlApiError {
                    status_code: 500,
                    code: Some("request_build_failed".to_string()),
                    message: format!("failed to build request body: {error}"),
                    kind: CommandErrorKind::Unknown,
                    retryable: false,
                })?;
            let response = request.send().await.map_err(map_network_error)?;
            decode_json_response::<KycStatusEnvelope>(response).await
        }
        .await;

        KYC_SURFACE_STATE.with(|state| {
            let mut state = state.borrow_mut();
            match outcome {
                Ok(envelope) => {
                    state.status = Some(envelope.data);
                    state.last_status = Some("Document submitted for review.".to_string());
                    state.last_error = None;
                }
                Err(error) => state.last_error = Some(error.to_string()),
            }
        });
        render_view_dom();
    }

    pub(super) async fn save_profile_flow(display_name: String, tagline: String) {
        let normalized_name = match normalize_display_name(&display_name) {
            Ok(name) => name,
            Err(error) => {
                set_profile_status(&format!("Profile not saved: {error}"), true);
                return;
            }
        };
        let normalized_tagline = match normalize_tagline(&tagline) {
            Ok(tagline) => tagline,
            Err(error) => {
                set_profile_status(&format!("Profile not saved: {error}"), true);
                return;
            }
        };

        let state = snapshot_state();
        let Some(access_token) = state.auth.access_token.clone() else {
            set_profile_status("Sign in before editing your profile.", true);
            return;
        };

        let body = serde_json::json!({
            "displayName": normalized_name,
            "tagline": normalized_tagline,
        });
        let outcome = async {
            let request = Request::post("/api/profile")
                .header("content-type", "application/json")
                .header("authorization", &format!("Bearer {access_token}"))
                .body(body.to_string())
                .map_err(|error| ControlApiError {
                    status_code: 500,
                    code: Some("request_build_failed".to_string()),
                    message: format!("failed to build request body: {error}"),
                    kind: CommandErrorKind::Unknown,
                    retryable: false,
                })?;
            let response = request.send().await.map_err(map_network_error)?;
            decode_json_response::<serde_json::Value>(response).await
        }
        .await;

        match outcome {
            Ok(_) => set_profile_status("Profile saved.", false),
            Err(error) => set_profile_status(&format!("Profile not saved: {}", error.message), true),
        }
    }
