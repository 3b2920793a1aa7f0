pub mod auth;
pub mod goals;
pub mod health;
pub mod personas;
pub mod reports;
