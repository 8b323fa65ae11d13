//! Post-login landing view and the index redirect.

pub mod controller;
pub mod model;
pub mod router;
