//! Session-token types shared across Readnest services.
//!
//! Provides JWT claims and validation for session tokens minted by the
//! accounts service.

pub mod token;
