//! Request extractors shared by the feature modules.
//!
//! - [`auth`]: [`auth::CurrentUser`], the authenticated user behind the
//!   session cookie

pub mod auth;
