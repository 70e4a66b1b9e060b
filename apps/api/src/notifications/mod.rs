//! Outbound notification intents.
//!
//! The workflow engine only enqueues; a worker task owns delivery. Delivery
//! failures are logged and dropped, never retried, never reported back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub mod mailer;

pub use mailer::{Mailer, SesMailer};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Recruiter → applicant.
    InterviewRequested {
        to: String,
        job_title: String,
        scheduled_at: DateTime<Utc>,
        interview_id: i32,
    },
    /// Applicant → recruiter, after declining with a counter-proposal.
    AlternativeTimeProposed {
        to: String,
        job_title: String,
        applicant_name: String,
        alternative_time: DateTime<Utc>,
    },
    /// Company → each follower.
    JobPosted {
        to: String,
        job_title: String,
        company_title: String,
    },
}

/// A rendered message ready for the mailer.
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn recipient(&self) -> &str {
        match self {
            Notification::InterviewRequested { to, .. }
            | Notification::AlternativeTimeProposed { to, .. }
            | Notification::JobPosted { to, .. } => to,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Notification::InterviewRequested { .. } => "interview_requested",
            Notification::AlternativeTimeProposed { .. } => "alternative_time_proposed",
            Notification::JobPosted { .. } => "job_posted",
        }
    }

    pub fn render(&self, base_url: &str) -> Email {
        let dashboard = format!("{}/dashboard", base_url.trim_end_matches('/'));
        let (subject, body) = match self {
            Notification::InterviewRequested {
                job_title,
                scheduled_at,
                interview_id,
                ..
            } => (
                format!("Interview Scheduled for {job_title}"),
                format!(
                    "Dear Applicant,\n\n\
                     You have been invited to an interview for the position of {job_title}.\n\
                     Date & Time: {} UTC\n\
                     Please accept or decline this interview at: {dashboard}\n\
                     Interview ID: {interview_id}\n\n\
                     Best regards,\nRecruitment Team\n",
                    scheduled_at.format(TIME_FORMAT)
                ),
            ),
            Notification::AlternativeTimeProposed {
                job_title,
                applicant_name,
                alternative_time,
                ..
            } => (
                format!("Applicant Suggested New Time for {job_title}"),
                format!(
                    "Dear Recruiter,\n\n\
                     {applicant_name} has declined the interview for {job_title} and suggested a new time:\n\
                     New Date & Time: {} UTC\n\
                     Please review and reschedule at: {dashboard}\n\n\
                     Best regards,\nRecruitment Team\n",
                    alternative_time.format(TIME_FORMAT)
                ),
            ),
            Notification::JobPosted {
                job_title,
                company_title,
                ..
            } => (
                format!("New Job Posting: {job_title}"),
                format!(
                    "Dear Applicant,\n\n\
                     {company_title}, a company you follow, has posted a new job: '{job_title}'.\n\
                     View it at: {dashboard}\n\n\
                     Best regards,\nRecruitment Team\n"
                ),
            ),
        };
        Email {
            to: self.recipient().to_string(),
            subject,
            body,
        }
    }
}

/// Sending half of the notification channel. Cheap to clone; enqueueing never
/// blocks and never fails the caller.
#[derive(Clone)]
pub struct NotificationQueue {
    tx: mpsc::UnboundedSender<Notification>,
}

impl NotificationQueue {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn enqueue(&self, notification: Notification) {
        let kind = notification.kind();
        if let Err(e) = self.tx.send(notification) {
            warn!("Notification worker is gone, dropping {kind} for {}", e.0.recipient());
        }
    }
}

/// Drains the queue until every sender is dropped.
pub fn spawn_worker(
    mut inbox: mpsc::UnboundedReceiver<Notification>,
    mailer: Arc<dyn Mailer>,
    base_url: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Notification worker started");
        while let Some(notification) = inbox.recv().await {
            deliver(mailer.as_ref(), &notification, &base_url).await;
        }
        info!("Notification worker stopped");
    })
}

async fn deliver(mailer: &dyn Mailer, notification: &Notification, base_url: &str) {
    let email = notification.render(base_url);
    match mailer.send(&email.to, &email.subject, &email.body).await {
        Ok(()) => info!("Sent {} notification to {}", notification.kind(), email.to),
        Err(e) => warn!(
            "Failed to send {} notification to {}: {e}",
            notification.kind(),
            email.to
        ),
    }
}
