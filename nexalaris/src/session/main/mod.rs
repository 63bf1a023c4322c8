mod session;

pub use session::{authorize, is_authenticated, prepare_logout_response};

pub(crate) use session::create_session;

#[cfg(test)]
pub(crate) use session::validate_session;

#[cfg(test)]
pub(crate) use session::test_helpers;

#[cfg(test)]
mod session_edge_cases_tests;
