use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use super::{Store, StoreError, StoreResult};
use crate::matching::{matches, MatchMode};
use crate::models::{
    Application, ApplicationStatus, Company, Interview, InterviewStatus, Job, NewApplication,
    NewCompany, NewInterview, NewJob, PendingRecruiter, Role, SkillSet, User,
};

const USER_COLUMNS: &str =
    "u.id, u.email, u.name, u.role, u.company_id, u.skills, u.resume, u.approved";
const COMPANY_COLUMNS: &str = "c.id, c.title, COALESCE(c.description, '') AS description, \
     COALESCE(c.logo, '') AS logo, c.approved";
const JOB_COLUMNS: &str =
    "j.id, j.title, j.description, j.skills, j.company_id, j.posted_by, j.created_at";
const APPLICATION_COLUMNS: &str = "a.id, a.job_id, a.applicant_id, COALESCE(a.resume, '') AS resume, \
     a.status, a.applied_at, j.title AS job_title";
const INTERVIEW_COLUMNS: &str =
    "i.id, i.job_id, i.applicant_id, i.recruiter_id, i.scheduled_at, i.status";

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    role: String,
    company_id: Option<i32>,
    skills: Option<Json<Vec<String>>>,
    resume: Option<String>,
    approved: bool,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_column(&row.role)
            .map_err(|e| StoreError::Corrupt(format!("user {}: {e}", row.id)))?;
        Ok(User {
            id: row.id,
            email: row.email,
            name: row.name,
            role,
            company_id: row.company_id,
            skills: row.skills.map(|Json(s)| SkillSet::from(s)).unwrap_or_default(),
            resume: row.resume.filter(|r| !r.is_empty()),
            approved: row.approved,
        })
    }
}

#[derive(Debug, FromRow)]
struct JobRow {
    id: i32,
    title: String,
    description: String,
    skills: Json<Vec<String>>,
    company_id: i32,
    posted_by: String,
    created_at: DateTime<Utc>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: row.id,
            title: row.title,
            description: row.description,
            skills: SkillSet::from(row.skills.0),
            company_id: row.company_id,
            posted_by: row.posted_by,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ApplicationRow {
    id: i32,
    job_id: i32,
    applicant_id: String,
    resume: String,
    status: String,
    applied_at: DateTime<Utc>,
    job_title: Option<String>,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        Application {
            id: row.id,
            job_id: row.job_id,
            applicant_id: row.applicant_id,
            resume: row.resume,
            status: ApplicationStatus::from(row.status),
            applied_at: row.applied_at,
            job_title: row.job_title,
        }
    }
}

#[derive(Debug, FromRow)]
struct InterviewRow {
    id: i32,
    job_id: i32,
    applicant_id: String,
    recruiter_id: String,
    scheduled_at: DateTime<Utc>,
    status: String,
}

impl TryFrom<InterviewRow> for Interview {
    type Error = StoreError;

    fn try_from(row: InterviewRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<InterviewStatus>()
            .map_err(|e| StoreError::Corrupt(format!("interview {}: {e}", row.id)))?;
        Ok(Interview {
            id: row.id,
            job_id: row.job_id,
            applicant_id: row.applicant_id,
            recruiter_id: row.recruiter_id,
            scheduled_at: row.scheduled_at,
            status,
        })
    }
}

fn users(rows: Vec<UserRow>) -> StoreResult<Vec<User>> {
    rows.into_iter().map(User::try_from).collect()
}

fn interviews(rows: Vec<InterviewRow>) -> StoreResult<Vec<Interview>> {
    rows.into_iter().map(Interview::try_from).collect()
}

/// PostgreSQL-backed gateway. One statement per operation, except recruiter
/// approval which updates two tables inside a transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn applications_where(
        &self,
        predicate: &str,
        bind: &str,
    ) -> StoreResult<Vec<Application>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications a \
             JOIN jobs j ON j.id = a.job_id \
             WHERE {predicate} ORDER BY a.applied_at DESC"
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(bind)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Application::from).collect())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, role, company_id, skills, resume, approved)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                name = EXCLUDED.name,
                role = EXCLUDED.role,
                company_id = EXCLUDED.company_id,
                skills = EXCLUDED.skills,
                resume = EXCLUDED.resume,
                approved = EXCLUDED.approved
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(Role::to_column(user.role))
        .bind(user.company_id)
        .bind(Json(user.skills.to_vec()))
        .bind(user.resume.as_deref())
        .bind(user.approved)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_company(&self, company: NewCompany) -> StoreResult<Company> {
        Ok(sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (title, description, logo, approved)
            VALUES ($1, $2, $3, FALSE)
            RETURNING id, title, COALESCE(description, '') AS description,
                      COALESCE(logo, '') AS logo, approved
            "#,
        )
        .bind(&company.title)
        .bind(&company.description)
        .bind(&company.logo)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_company(&self, id: i32) -> StoreResult<Option<Company>> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies c WHERE c.id = $1");
        Ok(sqlx::query_as::<_, Company>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_job(&self, job: NewJob) -> StoreResult<Job> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (title, description, skills, company_id, posted_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, skills, company_id, posted_by, created_at
            "#,
        )
        .bind(&job.title)
        .bind(&job.description)
        .bind(Json(job.skills.to_vec()))
        .bind(job.company_id)
        .bind(&job.posted_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn get_job(&self, id: i32) -> StoreResult<Option<Job>> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs j WHERE j.id = $1");
        Ok(sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Job::from))
    }

    async fn list_jobs(&self) -> StoreResult<Vec<Job>> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs j ORDER BY j.created_at DESC");
        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn jobs_by_poster(&self, user_id: &str) -> StoreResult<Vec<Job>> {
        let sql = format!(
            "SELECT {JOB_COLUMNS} FROM jobs j WHERE j.posted_by = $1 ORDER BY j.created_at DESC"
        );
        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn jobs_matching(&self, offered: &SkillSet, mode: MatchMode) -> StoreResult<Vec<Job>> {
        // Matching runs in Rust so `any`/`all` behave identically on every backend.
        Ok(self
            .list_jobs()
            .await?
            .into_iter()
            .filter(|job| matches(&job.skills, offered, mode))
            .collect())
    }

    async fn applicants_matching(
        &self,
        required: &SkillSet,
        mode: MatchMode,
    ) -> StoreResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.role = $1 ORDER BY u.name");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(Role::Applicant.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(users(rows)?
            .into_iter()
            .filter(|user| matches(required, &user.skills, mode))
            .collect())
    }

    async fn insert_application(&self, application: NewApplication) -> StoreResult<Application> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            WITH inserted AS (
                INSERT INTO applications (job_id, applicant_id, resume, status)
                VALUES ($1, $2, $3, $4)
                RETURNING id, job_id, applicant_id, resume, status, applied_at
            )
            SELECT a.id, a.job_id, a.applicant_id, COALESCE(a.resume, '') AS resume,
                   a.status, a.applied_at, j.title AS job_title
            FROM inserted a
            LEFT JOIN jobs j ON j.id = a.job_id
            "#,
        )
        .bind(application.job_id)
        .bind(&application.applicant_id)
        .bind(&application.resume)
        .bind(ApplicationStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn get_application(&self, id: i32) -> StoreResult<Option<Application>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications a \
             LEFT JOIN jobs j ON j.id = a.job_id WHERE a.id = $1"
        );
        Ok(sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Application::from))
    }

    async fn find_application(
        &self,
        applicant_id: &str,
        job_id: i32,
    ) -> StoreResult<Option<Application>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications a \
             LEFT JOIN jobs j ON j.id = a.job_id \
             WHERE a.applicant_id = $1 AND a.job_id = $2 \
             ORDER BY a.applied_at DESC LIMIT 1"
        );
        Ok(sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(applicant_id)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?
            .map(Application::from))
    }

    async fn applications_by_applicant(&self, applicant_id: &str) -> StoreResult<Vec<Application>> {
        self.applications_where("a.applicant_id = $1", applicant_id)
            .await
    }

    async fn applications_by_recruiter(&self, recruiter_id: &str) -> StoreResult<Vec<Application>> {
        self.applications_where("j.posted_by = $1", recruiter_id)
            .await
    }

    async fn set_application_status(
        &self,
        id: i32,
        status: &ApplicationStatus,
    ) -> StoreResult<()> {
        sqlx::query("UPDATE applications SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_interview(&self, interview: NewInterview) -> StoreResult<Interview> {
        let row = sqlx::query_as::<_, InterviewRow>(
            r#"
            INSERT INTO interviews (job_id, applicant_id, recruiter_id, scheduled_at, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, job_id, applicant_id, recruiter_id, scheduled_at, status
            "#,
        )
        .bind(interview.job_id)
        .bind(&interview.applicant_id)
        .bind(&interview.recruiter_id)
        .bind(interview.scheduled_at)
        .bind(InterviewStatus::Requested.as_str())
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn get_interview(&self, id: i32) -> StoreResult<Option<Interview>> {
        let sql = format!("SELECT {INTERVIEW_COLUMNS} FROM interviews i WHERE i.id = $1");
        sqlx::query_as::<_, InterviewRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Interview::try_from)
            .transpose()
    }

    async fn interviews_by_applicant(&self, applicant_id: &str) -> StoreResult<Vec<Interview>> {
        let sql = format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews i \
             WHERE i.applicant_id = $1 ORDER BY i.scheduled_at"
        );
        let rows = sqlx::query_as::<_, InterviewRow>(&sql)
            .bind(applicant_id)
            .fetch_all(&self.pool)
            .await?;
        interviews(rows)
    }

    async fn interviews_by_recruiter(&self, recruiter_id: &str) -> StoreResult<Vec<Interview>> {
        let sql = format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews i \
             WHERE i.recruiter_id = $1 ORDER BY i.scheduled_at"
        );
        let rows = sqlx::query_as::<_, InterviewRow>(&sql)
            .bind(recruiter_id)
            .fetch_all(&self.pool)
            .await?;
        interviews(rows)
    }

    async fn update_interview(
        &self,
        id: i32,
        status: InterviewStatus,
        scheduled_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        sqlx::query("UPDATE interviews SET status = $2, scheduled_at = $3 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .bind(scheduled_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn follow_company(&self, user_id: &str, company_id: i32) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO company_followers (user_id, company_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn company_followers(&self, company_id: i32) -> StoreResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u \
             JOIN company_followers f ON f.user_id = u.id \
             WHERE f.company_id = $1"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;
        users(rows)
    }

    async fn followed_companies(&self, user_id: &str) -> StoreResult<Vec<Company>> {
        let sql = format!(
            "SELECT {COMPANY_COLUMNS} FROM companies c \
             JOIN company_followers f ON f.company_id = c.id \
             WHERE f.user_id = $1 ORDER BY c.title"
        );
        Ok(sqlx::query_as::<_, Company>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn bookmark_job(&self, user_id: &str, job_id: i32) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO job_bookmarks (user_id, job_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(job_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn bookmarked_jobs(&self, user_id: &str) -> StoreResult<Vec<Job>> {
        let sql = format!(
            "SELECT {JOB_COLUMNS} FROM jobs j \
             JOIN job_bookmarks b ON b.job_id = j.id \
             WHERE b.user_id = $1 ORDER BY j.created_at DESC"
        );
        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn pending_recruiters(&self) -> StoreResult<Vec<PendingRecruiter>> {
        Ok(sqlx::query_as::<_, PendingRecruiter>(
            r#"
            SELECT u.id AS user_id, u.email, u.name, c.id AS company_id, c.title AS company_title
            FROM users u
            JOIN companies c ON u.company_id = c.id
            WHERE u.role = 'recruiter' AND u.approved = FALSE AND c.approved = FALSE
            ORDER BY u.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn approve_recruiter(&self, user_id: &str) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let company_id: Option<Option<i32>> = sqlx::query_scalar(
            "UPDATE users SET approved = TRUE WHERE id = $1 AND role = 'recruiter' \
             RETURNING company_id",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(Some(company_id)) = company_id else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query("UPDATE companies SET approved = TRUE WHERE id = $1")
            .bind(company_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_row(role: &str) -> UserRow {
        UserRow {
            id: "sub-1".to_string(),
            email: "a@example.com".to_string(),
            name: "Ada".to_string(),
            role: role.to_string(),
            company_id: None,
            skills: Some(Json(vec!["sql".to_string(), "go".to_string()])),
            resume: Some(String::new()),
            approved: true,
        }
    }

    #[test]
    fn test_user_row_maps_role_and_skills() {
        let user = User::try_from(user_row("applicant")).unwrap();
        assert_eq!(user.role, Some(Role::Applicant));
        assert!(user.skills.contains("go"));
        assert_eq!(user.resume, None);
    }

    #[test]
    fn test_empty_role_column_is_unset() {
        let user = User::try_from(user_row("")).unwrap();
        assert!(user.role.is_none());
    }

    #[test]
    fn test_unknown_role_column_is_corrupt() {
        let err = User::try_from(user_row("owner")).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn test_null_skills_become_empty_set() {
        let mut row = user_row("applicant");
        row.skills = None;
        assert!(User::try_from(row).unwrap().skills.is_empty());
    }
}
