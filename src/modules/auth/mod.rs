//! Login endpoint.
//!
//! `GET|POST /login/` first run the token auto-login handler: a valid token
//! in the `jwt` query parameter logs the browser in and redirects to the
//! landing view. Without a token, or with a rejected one, the regular
//! username/password flow takes over.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
