mod config;
mod errors;
mod main;
mod types;

pub use config::{CSRF_COOKIE_NAME, CSRF_HEADER_NAME, SESSION_COOKIE_NAME};
pub use errors::SessionError;
pub use main::{authorize, is_authenticated, prepare_logout_response};

pub(crate) use config::SESSION_COOKIE_MAX_AGE;
pub(crate) use main::create_session;

#[cfg(test)]
pub(crate) use main::validate_session;

#[cfg(test)]
pub(crate) use main::test_helpers;
