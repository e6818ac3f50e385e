//! sea-orm entities owned by the accounts service.

pub mod activation_codes;
pub mod users;
