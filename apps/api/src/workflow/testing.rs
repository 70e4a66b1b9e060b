//! Fixtures shared by the workflow tests.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use super::{ApplicationPolicy, RoleSelection, SsoIdentity, Workflow, WorkflowPolicy};
use crate::matching::MatchMode;
use crate::models::{Company, Job, SkillSet, User};
use crate::notifications::{Notification, NotificationQueue};
use crate::store::memory::MemoryStore;
use crate::store::Store;

pub const ADMIN_EMAIL: &str = "admin@example.com";

pub fn skills(items: &[&str]) -> SkillSet {
    items.iter().copied().collect()
}

pub fn policy() -> WorkflowPolicy {
    WorkflowPolicy {
        super_admin_email: ADMIN_EMAIL.to_string(),
        match_mode: MatchMode::Any,
        applications: ApplicationPolicy::Permissive,
    }
}

pub struct Harness {
    pub workflow: Workflow,
    pub store: Arc<MemoryStore>,
    pub inbox: UnboundedReceiver<Notification>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_policy(policy())
    }

    pub fn with_policy(policy: WorkflowPolicy) -> Self {
        let store = Arc::new(MemoryStore::new());
        let (queue, inbox) = NotificationQueue::channel();
        let workflow = Workflow::new(store.clone(), queue, policy);
        Self {
            workflow,
            store,
            inbox,
        }
    }

    /// Everything enqueued so far.
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = self.inbox.try_recv() {
            out.push(n);
        }
        out
    }

    pub async fn sign_in(&self, id: &str, email: &str) -> User {
        self.workflow
            .sign_in(SsoIdentity {
                id: id.to_string(),
                email: email.to_string(),
                name: format!("User {id}"),
            })
            .await
            .unwrap()
            .user
    }

    pub async fn admin(&self) -> User {
        self.sign_in("admin", ADMIN_EMAIL).await
    }

    /// An applicant with skills and an uploaded resume.
    pub async fn applicant(&self, id: &str, offered: &[&str]) -> User {
        self.sign_in(id, &format!("{id}@example.com")).await;
        let user = self
            .workflow
            .select_role(
                Some(id),
                RoleSelection::Applicant {
                    skills: skills(offered),
                },
            )
            .await
            .unwrap();
        self.workflow
            .attach_resume(user, format!("resumes/{id}_cv.pdf"))
            .await
            .unwrap()
    }

    /// A recruiter still awaiting approval.
    pub async fn recruiter(&self, id: &str, company: &str) -> User {
        self.sign_in(id, &format!("{id}@example.com")).await;
        self.workflow
            .select_role(
                Some(id),
                RoleSelection::Recruiter {
                    company_title: company.to_string(),
                    company_description: format!("{company} description"),
                    company_logo: String::new(),
                },
            )
            .await
            .unwrap()
    }

    pub async fn approved_recruiter(&self, id: &str, company: &str) -> User {
        self.recruiter(id, company).await;
        assert!(self.store.approve_recruiter(id).await.unwrap());
        self.store.get_user(id).await.unwrap().unwrap()
    }

    pub async fn company_of(&self, user: &User) -> Company {
        self.store
            .get_company(user.company_id.unwrap())
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn post_job(&self, recruiter_id: &str, title: &str, required: &[&str]) -> Job {
        self.workflow
            .post_job(
                Some(recruiter_id),
                super::recruiter::JobPosting {
                    title: title.to_string(),
                    description: format!("{title} description"),
                    skills: skills(required),
                },
            )
            .await
            .unwrap()
    }
}
