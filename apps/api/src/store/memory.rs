//! In-memory `Store` used by workflow and router tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Store, StoreError, StoreResult};
use crate::matching::{matches, MatchMode};
use crate::models::{
    Application, ApplicationStatus, Company, Interview, InterviewStatus, Job, NewApplication,
    NewCompany, NewInterview, NewJob, PendingRecruiter, Role, SkillSet, User,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<String, User>,
    companies: BTreeMap<i32, Company>,
    jobs: BTreeMap<i32, Job>,
    applications: BTreeMap<i32, Application>,
    interviews: BTreeMap<i32, Interview>,
    followers: BTreeSet<(String, i32)>,
    bookmarks: BTreeSet<(String, i32)>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn with_job_title(&self, mut application: Application) -> Application {
        application.job_title = self.jobs.get(&application.job_id).map(|j| j.title.clone());
        application
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_followers: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `company_followers` fail, to exercise best-effort fan-out.
    pub fn fail_follower_lookups(&self) {
        self.fail_followers.store(true, Ordering::SeqCst);
    }

    pub fn follower_rows(&self, company_id: i32) -> usize {
        let tables = self.tables.lock().unwrap();
        tables
            .followers
            .iter()
            .filter(|(_, c)| *c == company_id)
            .count()
    }

    pub fn company_count(&self) -> usize {
        self.tables.lock().unwrap().companies.len()
    }

    pub fn application_count(&self) -> usize {
        self.tables.lock().unwrap().applications.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.tables.lock().unwrap().users.get(id).cloned())
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        self.tables
            .lock()
            .unwrap()
            .users
            .insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn insert_company(&self, company: NewCompany) -> StoreResult<Company> {
        let mut tables = self.tables.lock().unwrap();
        let company = Company {
            id: tables.next_id(),
            title: company.title,
            description: company.description,
            logo: company.logo,
            approved: false,
        };
        tables.companies.insert(company.id, company.clone());
        Ok(company)
    }

    async fn get_company(&self, id: i32) -> StoreResult<Option<Company>> {
        Ok(self.tables.lock().unwrap().companies.get(&id).cloned())
    }

    async fn insert_job(&self, job: NewJob) -> StoreResult<Job> {
        let mut tables = self.tables.lock().unwrap();
        let job = Job {
            id: tables.next_id(),
            title: job.title,
            description: job.description,
            skills: job.skills,
            company_id: job.company_id,
            posted_by: job.posted_by,
            created_at: Utc::now(),
        };
        tables.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn get_job(&self, id: i32) -> StoreResult<Option<Job>> {
        Ok(self.tables.lock().unwrap().jobs.get(&id).cloned())
    }

    async fn list_jobs(&self) -> StoreResult<Vec<Job>> {
        Ok(self.tables.lock().unwrap().jobs.values().rev().cloned().collect())
    }

    async fn jobs_by_poster(&self, user_id: &str) -> StoreResult<Vec<Job>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .jobs
            .values()
            .rev()
            .filter(|j| j.posted_by == user_id)
            .cloned()
            .collect())
    }

    async fn jobs_matching(&self, offered: &SkillSet, mode: MatchMode) -> StoreResult<Vec<Job>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .jobs
            .values()
            .rev()
            .filter(|j| matches(&j.skills, offered, mode))
            .cloned()
            .collect())
    }

    async fn applicants_matching(
        &self,
        required: &SkillSet,
        mode: MatchMode,
    ) -> StoreResult<Vec<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .values()
            .filter(|u| u.has_role(Role::Applicant) && matches(required, &u.skills, mode))
            .cloned()
            .collect())
    }

    async fn insert_application(&self, application: NewApplication) -> StoreResult<Application> {
        let mut tables = self.tables.lock().unwrap();
        let application = Application {
            id: tables.next_id(),
            job_id: application.job_id,
            applicant_id: application.applicant_id,
            resume: application.resume,
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
            job_title: None,
        };
        tables.applications.insert(application.id, application.clone());
        Ok(tables.with_job_title(application))
    }

    async fn get_application(&self, id: i32) -> StoreResult<Option<Application>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .applications
            .get(&id)
            .cloned()
            .map(|a| tables.with_job_title(a)))
    }

    async fn find_application(
        &self,
        applicant_id: &str,
        job_id: i32,
    ) -> StoreResult<Option<Application>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .applications
            .values()
            .find(|a| a.applicant_id == applicant_id && a.job_id == job_id)
            .cloned()
            .map(|a| tables.with_job_title(a)))
    }

    async fn applications_by_applicant(&self, applicant_id: &str) -> StoreResult<Vec<Application>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .applications
            .values()
            .rev()
            .filter(|a| a.applicant_id == applicant_id)
            .cloned()
            .map(|a| tables.with_job_title(a))
            .collect())
    }

    async fn applications_by_recruiter(&self, recruiter_id: &str) -> StoreResult<Vec<Application>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .applications
            .values()
            .rev()
            .filter(|a| {
                tables
                    .jobs
                    .get(&a.job_id)
                    .is_some_and(|j| j.posted_by == recruiter_id)
            })
            .cloned()
            .map(|a| tables.with_job_title(a))
            .collect())
    }

    async fn set_application_status(
        &self,
        id: i32,
        status: &ApplicationStatus,
    ) -> StoreResult<()> {
        if let Some(application) = self.tables.lock().unwrap().applications.get_mut(&id) {
            application.status = status.clone();
        }
        Ok(())
    }

    async fn insert_interview(&self, interview: NewInterview) -> StoreResult<Interview> {
        let mut tables = self.tables.lock().unwrap();
        let interview = Interview {
            id: tables.next_id(),
            job_id: interview.job_id,
            applicant_id: interview.applicant_id,
            recruiter_id: interview.recruiter_id,
            scheduled_at: interview.scheduled_at,
            status: InterviewStatus::Requested,
        };
        tables.interviews.insert(interview.id, interview.clone());
        Ok(interview)
    }

    async fn get_interview(&self, id: i32) -> StoreResult<Option<Interview>> {
        Ok(self.tables.lock().unwrap().interviews.get(&id).cloned())
    }

    async fn interviews_by_applicant(&self, applicant_id: &str) -> StoreResult<Vec<Interview>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .interviews
            .values()
            .filter(|i| i.applicant_id == applicant_id)
            .cloned()
            .collect())
    }

    async fn interviews_by_recruiter(&self, recruiter_id: &str) -> StoreResult<Vec<Interview>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .interviews
            .values()
            .filter(|i| i.recruiter_id == recruiter_id)
            .cloned()
            .collect())
    }

    async fn update_interview(
        &self,
        id: i32,
        status: InterviewStatus,
        scheduled_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        if let Some(interview) = self.tables.lock().unwrap().interviews.get_mut(&id) {
            interview.status = status;
            interview.scheduled_at = scheduled_at;
        }
        Ok(())
    }

    async fn follow_company(&self, user_id: &str, company_id: i32) -> StoreResult<()> {
        self.tables
            .lock()
            .unwrap()
            .followers
            .insert((user_id.to_string(), company_id));
        Ok(())
    }

    async fn company_followers(&self, company_id: i32) -> StoreResult<Vec<User>> {
        if self.fail_followers.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .followers
            .iter()
            .filter(|(_, c)| *c == company_id)
            .filter_map(|(u, _)| tables.users.get(u).cloned())
            .collect())
    }

    async fn followed_companies(&self, user_id: &str) -> StoreResult<Vec<Company>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .followers
            .iter()
            .filter(|(u, _)| u == user_id)
            .filter_map(|(_, c)| tables.companies.get(c).cloned())
            .collect())
    }

    async fn bookmark_job(&self, user_id: &str, job_id: i32) -> StoreResult<()> {
        self.tables
            .lock()
            .unwrap()
            .bookmarks
            .insert((user_id.to_string(), job_id));
        Ok(())
    }

    async fn bookmarked_jobs(&self, user_id: &str) -> StoreResult<Vec<Job>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .bookmarks
            .iter()
            .filter(|(u, _)| u == user_id)
            .filter_map(|(_, j)| tables.jobs.get(j).cloned())
            .collect())
    }

    async fn pending_recruiters(&self) -> StoreResult<Vec<PendingRecruiter>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .values()
            .filter(|u| u.has_role(Role::Recruiter) && !u.approved)
            .filter_map(|u| {
                let company = tables.companies.get(&u.company_id?)?;
                (!company.approved).then(|| PendingRecruiter {
                    user_id: u.id.clone(),
                    email: u.email.clone(),
                    name: u.name.clone(),
                    company_id: company.id,
                    company_title: company.title.clone(),
                })
            })
            .collect())
    }

    async fn approve_recruiter(&self, user_id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let company_id = match tables.users.get(user_id) {
            Some(user) if user.has_role(Role::Recruiter) => user.company_id,
            _ => return Ok(false),
        };
        let Some(company_id) = company_id else {
            return Ok(false);
        };
        if let Some(user) = tables.users.get_mut(user_id) {
            user.approved = true;
        }
        if let Some(company) = tables.companies.get_mut(&company_id) {
            company.approved = true;
        }
        Ok(true)
    }
}
