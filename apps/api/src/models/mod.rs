pub mod application;
pub mod company;
pub mod interview;
pub mod job;
pub mod skills;
pub mod user;

pub use application::{Application, ApplicationStatus, NewApplication};
pub use company::{Company, NewCompany, PendingRecruiter};
pub use interview::{Interview, InterviewStatus, NewInterview};
pub use job::{Job, NewJob};
pub use skills::SkillSet;
pub use user::{Role, User};
