pub mod auth;
pub mod envelope;
pub mod health;
pub mod todos;
