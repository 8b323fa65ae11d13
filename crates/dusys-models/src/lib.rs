//! # Dusys Models
//!
//! Domain models shared by the gateway and its CLI:
//!
//! - [`ids`]: strongly-typed identifiers
//! - [`users`]: users and roles held by the identity store
//! - [`session`]: per-browser session state and flash messages

pub mod ids;
pub mod session;
pub mod users;

pub use ids::{RoleId, UserId};
pub use session::{FlashCategory, FlashMessage, SessionData};
pub use users::{NewUser, Role, User};
