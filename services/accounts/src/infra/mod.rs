pub mod db;
pub mod hasher;
pub mod mailer;
pub mod token;
