pub mod health;
pub mod password_reset;
pub mod registration;
pub mod session;
