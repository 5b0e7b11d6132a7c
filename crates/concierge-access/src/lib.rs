//! # concierge-access
//!
//! Two-tier authorization: a static role allow-list per intent, then an
//! ownership-scope check for intents that read someone's own data.

pub mod policy;
pub mod validator;

pub use validator::RoleValidator;
