use serde::{Deserialize, Serialize};

use crate::nav::NavigationState;

/// The closed set of recognized pages. Every in-app navigation is expressed
/// as one of these variants; payload requirements are carried in the type so
/// a well-formed `Route` cannot reach the dispatcher with missing data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "kebab-case")]
pub enum Route {
    Landing,
    Login,
    Register,
    Marketplace,
    TalentProfile {
        talent_id: String,
    },
    CompanyProfile {
        company_id: String,
    },
    Leads,
    Projects,
    ProjectDetail {
        project_id: String,
    },
    ProjectCreate,
    Collaborations,
    CollaborationDetail {
        collaboration_id: String,
    },
    Contracts,
    ContractDetail {
        contract_id: String,
    },
    Payments,
    Finance,
    Kyc,
    Analytics,
    Messages,
    Chat {
        target_user_id: String,
        target_user_name: String,
    },
    Profile,
    ProfileEdit,
    Settings,
    Notifications,
    Admin,
    NotFound,
}

/// Failure modes of resolving a raw navigation into a typed route. The two
/// variants have different dispatch outcomes: an unknown page renders the
/// not-found view, a missing parameter falls back to the landing view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("unrecognized page key `{page}`")]
    UnknownPage { page: String },
    #[error("page `{page}` requires query parameter `{param}`")]
    MissingParam {
        page: &'static str,
        param: &'static str,
    },
}

impl Route {
    /// Resolves a decoded navigation into a typed route. Total over its
    /// input; failures are values, never panics.
    pub fn from_nav(nav: &NavigationState) -> Result<Self, RouteError> {
        let require = |param: &'static str, page: &'static str| {
            nav.data_value(param)
                .filter(|value| !value.is_empty())
                .map(ToString::to_string)
                .ok_or(RouteError::MissingParam { page, param })
        };

        match nav.page.as_str() {
            "landing" => Ok(Self::Landing),
            "login" => Ok(Self::Login),
            "register" => Ok(Self::Register),
            "marketplace" => Ok(Self::Marketplace),
            "talent-profile" => Ok(Self::TalentProfile {
                talent_id: require("talentId", "talent-profile")?,
            }),
            "company-profile" => Ok(Self::CompanyProfile {
                company_id: require("companyId", "company-profile")?,
            }),
            "leads" => Ok(Self::Leads),
            "projects" => Ok(Self::Projects),
            "project-detail" => Ok(Self::ProjectDetail {
                project_id: require("projectId", "project-detail")?,
            }),
            "project-create" => Ok(Self::ProjectCreate),
            "collaborations" => Ok(Self::Collaborations),
            "collaboration-detail" => Ok(Self::CollaborationDetail {
                collaboration_id: require("collaborationId", "collaboration-detail")?,
            }),
            "contracts" => Ok(Self::Contracts),
            "contract-detail" => Ok(Self::ContractDetail {
                contract_id: require("contractId", "contract-detail")?,
            }),
            "payments" => Ok(Self::Payments),
            "finance" => Ok(Self::Finance),
            "kyc" => Ok(Self::Kyc),
            "analytics" => Ok(Self::Analytics),
            "messages" => Ok(Self::Messages),
            "chat" => Ok(Self::Chat {
                target_user_id: require("targetUserId", "chat")?,
                target_user_name: require("targetUserName", "chat")?,
            }),
            "profile" => Ok(Self::Profile),
            "profile-edit" => Ok(Self::ProfileEdit),
            "settings" => Ok(Self::Settings),
            "notifications" => Ok(Self::Notifications),
            "admin" => Ok(Self::Admin),
            "not-found" => Ok(Self::NotFound),
            other => Err(RouteError::UnknownPage {
                page: other.to_string(),
            }),
        }
    }

    pub fn page_key(&self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Login => "login",
            Self::Register => "register",
            Self::Marketplace => "marketplace",
            Self::TalentProfile { .. } => "talent-profile",
            Self::CompanyProfile { .. } => "company-profile",
            Self::Leads => "leads",
            Self::Projects => "projects",
            Self::ProjectDetail { .. } => "project-detail",
            Self::ProjectCreate => "project-create",
            Self::Collaborations => "collaborations",
            Self::CollaborationDetail { .. } => "collaboration-detail",
            Self::Contracts => "contracts",
            Self::ContractDetail { .. } => "contract-detail",
            Self::Payments => "payments",
            Self::Finance => "finance",
            Self::Kyc => "kyc",
            Self::Analytics => "analytics",
            Self::Messages => "messages",
            Self::Chat { .. } => "chat",
            Self::Profile => "profile",
            Self::ProfileEdit => "profile-edit",
            Self::Settings => "settings",
            Self::Notifications => "notifications",
            Self::Admin => "admin",
            Self::NotFound => "not-found",
        }
    }

    /// Encodes the route as a navigation state. The payload fields become
    /// the auxiliary query parameters; routes without payload encode with
    /// `data == None`.
    pub fn to_nav(&self) -> NavigationState {
        match self {
            Self::TalentProfile { talent_id } => {
                NavigationState::with_data(self.page_key(), [("talentId", talent_id.clone())])
            }
            Self::CompanyProfile { company_id } => {
                NavigationState::with_data(self.page_key(), [("companyId", company_id.clone())])
            }
            Self::ProjectDetail { project_id } => {
                NavigationState::with_data(self.page_key(), [("projectId", project_id.clone())])
            }
            Self::CollaborationDetail { collaboration_id } => NavigationState::with_data(
                self.page_key(),
                [("collaborationId", collaboration_id.clone())],
            ),
            Self::ContractDetail { contract_id } => {
                NavigationState::with_data(self.page_key(), [("contractId", contract_id.clone())])
            }
            Self::Chat {
                target_user_id,
                target_user_name,
            } => NavigationState::with_data(
                self.page_key(),
                [
                    ("targetUserId", target_user_id.clone()),
                    ("targetUserName", target_user_name.clone()),
                ],
            ),
            _ => NavigationState::page_only(self.page_key()),
        }
    }

    pub fn to_query(&self) -> String {
        self.to_nav().to_query()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_routes_round_trip_through_navigation_state() {
        let routes = [
            Route::Landing,
            Route::Marketplace,
            Route::ProjectDetail {
                project_id: "p-19".to_string(),
            },
            Route::Chat {
                target_user_id: "u-3".to_string(),
                target_user_name: "Mara Lind".to_string(),
            },
            Route::NotFound,
        ];
        for route in routes {
            let nav = route.to_nav();
            let parsed = Route::from_nav(&nav).expect("route should resolve");
            assert_eq!(parsed, route);
        }
    }

    #[test]
    fn payload_free_routes_encode_without_data() {
        assert_eq!(Route::Finance.to_nav().data, None);
        assert_eq!(Route::Finance.to_query(), "?page=finance");
    }

    #[test]
    fn unknown_page_key_is_reported_as_unknown() {
        let nav = NavigationState::page_only("markeplace");
        assert_eq!(
            Route::from_nav(&nav),
            Err(RouteError::UnknownPage {
                page: "markeplace".to_string()
            })
        );
    }

    #[test]
    fn missing_payload_is_reported_per_parameter() {
        let nav = NavigationState::page_only("project-detail");
        assert_eq!(
            Route::from_nav(&nav),
            Err(RouteError::MissingParam {
                page: "project-detail",
                param: "projectId"
            })
        );

        let nav = NavigationState::with_data("chat", [("targetUserId", "u-1")]);
        assert_eq!(
            Route::from_nav(&nav),
            Err(RouteError::MissingParam {
                page: "chat",
                param: "targetUserName"
            })
        );
    }

    #[test]
    fn empty_parameter_values_count_as_missing() {
        let nav = NavigationState::with_data("talent-profile", [("talentId", "")]);
        assert_eq!(
            Route::from_nav(&nav),
            Err(RouteError::MissingParam {
                page: "talent-profile",
                param: "talentId"
            })
        );
    }
}
