use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub logo: String,
    pub approved: bool,
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub title: String,
    pub description: String,
    pub logo: String,
}

/// A recruiter awaiting approval, joined with the company they registered.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PendingRecruiter {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub company_id: i32,
    pub company_title: String,
}
