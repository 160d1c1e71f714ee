use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::Student
    }
}

#[derive(Debug, Clone)]
pub struct CreateProfileRequest {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub password_hash: String,
}
