pub mod enrollments;
pub mod impersonation;
pub mod payments;
pub mod root;
pub mod users;
pub mod webhook_logs;
pub mod webhooks;
