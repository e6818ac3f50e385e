pub mod activate;
pub mod bootstrap;
pub mod codes;
pub mod login;
pub mod password_reset;
pub mod register;
