pub(crate) const AUTH_STORAGE_KEY: &str = "talentlink.web.auth.v1";
pub(crate) const SURFACE_REFRESH_DEBOUNCE_MS: u32 = 150;
pub(crate) const SHELL_STATUS_ID: &str = "talentlink-web-shell-status";
pub(crate) const SHELL_ROOT_ID: &str = "talentlink-web-shell-root";
pub(crate) const SHELL_HEADER_ID: &str = "talentlink-web-shell-header";
pub(crate) const SHELL_TITLE_ID: &str = "talentlink-web-shell-title";
pub(crate) const SHELL_NAV_ID: &str = "talentlink-web-shell-nav";
pub(crate) const SHELL_CONTENT_ID: &str = "talentlink-web-shell-content";
pub(crate) const AUTH_PANEL_ID: &str = "talentlink-web-shell-auth-panel";
pub(crate) const AUTH_EMAIL_INPUT_ID: &str = "talentlink-web-shell-auth-email";
pub(crate) const AUTH_CODE_INPUT_ID: &str = "talentlink-web-shell-auth-code";
pub(crate) const AUTH_SEND_ID: &str = "talentlink-web-shell-auth-send";
pub(crate) const AUTH_VERIFY_ID: &str = "talentlink-web-shell-auth-verify";
pub(crate) const AUTH_LOGOUT_ID: &str = "talentlink-web-shell-auth-logout";
pub(crate) const CHAT_PANEL_ID: &str = "talentlink-web-shell-chat-panel";
pub(crate) const CHAT_MESSAGES_ID: &str = "talentlink-web-shell-chat-messages";
pub(crate) const CHAT_INPUT_ID: &str = "talentlink-web-shell-chat-input";
pub(crate) const CHAT_SEND_ID: &str = "talentlink-web-shell-chat-send";
pub(crate) const PROFILE_NAME_INPUT_ID: &str = "talentlink-web-shell-profile-name";
pub(crate) const PROFILE_TAGLINE_INPUT_ID: &str = "talentlink-web-shell-profile-tagline";
pub(crate) const PROFILE_SAVE_ID: &str = "talentlink-web-shell-profile-save";
pub(crate) const PROFILE_STATUS_ID: &str = "talentlink-web-shell-profile-status";
pub(crate) const KYC_FILE_INPUT_ID: &str = "talentlink-web-shell-kyc-file";
pub(crate) const KYC_SIZE_INPUT_ID: &str = "talentlink-web-shell-kyc-size";
pub(crate) const KYC_SUBMIT_ID: &str = "talentlink-web-shell-kyc-submit";
pub(crate) const DOM_READY_BUDGET_MS: u64 = 450;
pub(crate) const BOOT_TOTAL_BUDGET_MS: u64 = 2_000;
pub(crate) const NAV_LINKS: [(&str, &str); 6] = [
    ("Home", "/?page=landing"),
    ("Marketplace", "/?page=marketplace"),
    ("Leads", "/?page=leads"),
    ("Messages", "/?page=messages"),
    ("Finance", "/?page=finance"),
    ("Profile", "/?page=profile"),
];
