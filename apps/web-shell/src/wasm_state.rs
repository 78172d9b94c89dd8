use crate::wasm::{
    AnalyticsSummaryRecord, EscrowPaymentRecord, KycStatusRecord, LeadRecord, TalentListingRecord,
};

#[derive(Debug, Clone, Default)]
pub(crate) struct MarketplaceSurfaceState {
    pub(super) loaded: bool,
    pub(super) talents: Vec<TalentListingRecord>,
    pub(super) last_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct LeadsSurfaceState {
    pub(super) loaded_session_id: Option<String>,
    pub(super) leads: Vec<LeadRecord>,
    pub(super) last_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FinanceSurfaceState {
    pub(super) loaded_session_id: Option<String>,
    pub(super) payments: Vec<EscrowPaymentRecord>,
    pub(super) last_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct KycSurfaceState {
    pub(super) loaded_session_id: Option<String>,
    pub(super) status: Option<KycStatusRecord>,
    pub(super) last_status: Option<String>,
    pub(super) last_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct AnalyticsSurfaceState {
    pub(super) loaded_session_id: Option<String>,
    pub(super) summary: Option<AnalyticsSummaryRecord>,
    pub(super) last_error: Option<String>,
}
