//! Sign-in and the one-time role selection.
//!
//! Account lifecycle: `RoleUnset` → (`Applicant` | `PendingApproval` →
//! `Recruiter`). `SuperAdmin` is assigned at sign-in and never selected.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::Workflow;
use crate::errors::AppError;
use crate::models::{NewCompany, Role, SkillSet, User};

/// Identity asserted by the SSO provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SsoIdentity {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignIn {
    pub user: User,
    /// The caller must go through role selection next.
    pub needs_role: bool,
}

/// What a role-less user asks to become.
#[derive(Debug, Clone)]
pub enum RoleSelection {
    Recruiter {
        company_title: String,
        company_description: String,
        company_logo: String,
    },
    Applicant {
        skills: SkillSet,
    },
    SuperAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountState {
    RoleUnset,
    PendingApproval,
    Recruiter,
    Applicant,
    SuperAdmin,
}

impl Workflow {
    /// Upserts the account behind an SSO identity.
    ///
    /// Accounts that already hold a role are returned untouched. The designated
    /// admin address is promoted on every sign-in until it holds a role.
    pub async fn sign_in(&self, identity: SsoIdentity) -> Result<SignIn, AppError> {
        let designated = self.is_designated_admin(&identity.email);

        let mut user = match self.store.get_user(&identity.id).await? {
            Some(user) if user.role.is_some() => {
                return Ok(SignIn {
                    user,
                    needs_role: false,
                })
            }
            Some(mut user) => {
                user.email = identity.email;
                user.name = identity.name;
                user
            }
            None => User::new(identity.id, identity.email, identity.name),
        };

        if designated {
            user.role = Some(Role::SuperAdmin);
            user.approved = true;
            info!("Assigned super admin role to {}", user.id);
        }

        self.store.save_user(&user).await?;
        Ok(SignIn {
            needs_role: user.role.is_none(),
            user,
        })
    }

    pub async fn account_state(&self, session_user: Option<&str>) -> Result<AccountState, AppError> {
        let user = self.current_user(session_user).await?;
        let state = match user.role {
            None => AccountState::RoleUnset,
            Some(Role::Applicant) => AccountState::Applicant,
            Some(Role::SuperAdmin) => AccountState::SuperAdmin,
            Some(Role::Recruiter) => {
                let company = self.recruiter_company(&user).await?;
                if super::gate::recruiter_cleared(&user, &company) {
                    AccountState::Recruiter
                } else {
                    AccountState::PendingApproval
                }
            }
        };
        Ok(state)
    }

    /// Assigns a role exactly once.
    pub async fn select_role(
        &self,
        session_user: Option<&str>,
        selection: RoleSelection,
    ) -> Result<User, AppError> {
        let mut user = self.current_user(session_user).await?;

        if let Some(role) = user.role {
            return Err(AppError::forbidden(format!(
                "Role already assigned ({role}) and cannot be changed"
            )));
        }
        if self.is_designated_admin(&user.email) {
            return Err(AppError::forbidden(
                "This account is reserved for the super admin",
            ));
        }

        match selection {
            RoleSelection::SuperAdmin => {
                return Err(AppError::forbidden(
                    "The super admin role cannot be self-selected",
                ));
            }
            RoleSelection::Recruiter {
                company_title,
                company_description,
                company_logo,
            } => {
                let title = company_title.trim();
                if title.is_empty() {
                    return Err(AppError::validation(
                        "Company title is required for recruiters",
                    ));
                }
                let company = self
                    .store
                    .insert_company(NewCompany {
                        title: title.to_string(),
                        description: company_description.trim().to_string(),
                        logo: company_logo.trim().to_string(),
                    })
                    .await?;
                user.role = Some(Role::Recruiter);
                user.company_id = Some(company.id);
                user.approved = false;
                info!(
                    "Recruiter {} registered company {} ({}), awaiting approval",
                    user.id, company.id, company.title
                );
            }
            RoleSelection::Applicant { skills } => {
                if skills.is_empty() {
                    return Err(AppError::validation(
                        "At least one skill is required for applicants",
                    ));
                }
                user.role = Some(Role::Applicant);
                user.skills = skills;
                user.approved = true;
                info!("User {} registered as applicant", user.id);
            }
        }

        self.store.save_user(&user).await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{skills, Harness, ADMIN_EMAIL};
    use super::*;

    fn identity(id: &str, email: &str) -> SsoIdentity {
        SsoIdentity {
            id: id.to_string(),
            email: email.to_string(),
            name: format!("User {id}"),
        }
    }

    #[tokio::test]
    async fn test_first_sign_in_creates_role_less_account() {
        let h = Harness::new();
        let signed = h.workflow.sign_in(identity("u1", "u1@example.com")).await.unwrap();
        assert!(signed.needs_role);
        assert_eq!(signed.user.role, None);
        assert!(!signed.user.approved);
        assert_eq!(
            h.workflow.account_state(Some("u1")).await.unwrap(),
            AccountState::RoleUnset
        );
    }

    #[tokio::test]
    async fn test_designated_email_becomes_super_admin() {
        let h = Harness::new();
        let signed = h.workflow.sign_in(identity("boss", ADMIN_EMAIL)).await.unwrap();
        assert!(!signed.needs_role);
        assert_eq!(signed.user.role, Some(Role::SuperAdmin));
        assert!(signed.user.approved);
    }

    #[tokio::test]
    async fn test_sign_in_leaves_existing_role_untouched() {
        let h = Harness::new();
        h.applicant("a1", &["go"]).await;
        let signed = h
            .workflow
            .sign_in(identity("a1", "renamed@example.com"))
            .await
            .unwrap();
        assert_eq!(signed.user.role, Some(Role::Applicant));
        assert_eq!(signed.user.email, "a1@example.com");
    }

    #[tokio::test]
    async fn test_select_recruiter_creates_unapproved_company() {
        let h = Harness::new();
        h.sign_in("r1", "r1@example.com").await;
        let user = h
            .workflow
            .select_role(
                Some("r1"),
                RoleSelection::Recruiter {
                    company_title: "Acme".to_string(),
                    company_description: "Widgets".to_string(),
                    company_logo: String::new(),
                },
            )
            .await
            .unwrap();
        assert_eq!(user.role, Some(Role::Recruiter));
        assert!(!user.approved);
        let company = h.company_of(&user).await;
        assert!(!company.approved);
        assert_eq!(
            h.workflow.account_state(Some("r1")).await.unwrap(),
            AccountState::PendingApproval
        );
    }

    #[tokio::test]
    async fn test_select_applicant_is_auto_approved() {
        let h = Harness::new();
        h.sign_in("a1", "a1@example.com").await;
        let user = h
            .workflow
            .select_role(
                Some("a1"),
                RoleSelection::Applicant {
                    skills: skills(&["go", "sql"]),
                },
            )
            .await
            .unwrap();
        assert!(user.approved);
        assert!(user.skills.contains("sql"));
    }

    #[tokio::test]
    async fn test_role_cannot_be_selected_twice() {
        let h = Harness::new();
        h.applicant("a1", &["go"]).await;
        let err = h
            .workflow
            .select_role(
                Some("a1"),
                RoleSelection::Recruiter {
                    company_title: "Acme".to_string(),
                    company_description: String::new(),
                    company_logo: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(h.store.company_count(), 0);
    }

    #[tokio::test]
    async fn test_super_admin_cannot_be_self_selected() {
        let h = Harness::new();
        h.sign_in("u1", "u1@example.com").await;
        let err = h
            .workflow
            .select_role(Some("u1"), RoleSelection::SuperAdmin)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_recruiter_needs_company_title() {
        let h = Harness::new();
        h.sign_in("r1", "r1@example.com").await;
        let err = h
            .workflow
            .select_role(
                Some("r1"),
                RoleSelection::Recruiter {
                    company_title: "   ".to_string(),
                    company_description: String::new(),
                    company_logo: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(h.store.company_count(), 0);
    }

    #[tokio::test]
    async fn test_applicant_needs_skills() {
        let h = Harness::new();
        h.sign_in("a1", "a1@example.com").await;
        let err = h
            .workflow
            .select_role(
                Some("a1"),
                RoleSelection::Applicant {
                    skills: SkillSet::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
