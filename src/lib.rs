//! # Dusys Gateway
//!
//! Login front for the "Dusys - Superset" analytics deployment.
//!
//! The gateway serves the login endpoint of the analytics application and
//! adds a **token auto-login** path to it: an upstream product links users
//! to `/login/?jwt=<token>`, and a valid HS256 token logs the browser in
//! (creating the user on first visit) and lands it on
//! `/tablemodelview/list/`. Without a token, or with an expired or invalid
//! one, the regular username/password page is served, with a warning flash
//! in the latter case.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── dusys-config/   # Layered settings: defaults → env → TOML override
//! ├── dusys-auth/     # Auto-login token claims and verification
//! ├── dusys-core/     # AppError, password hashing
//! ├── dusys-models/   # Users, roles, session data
//! ├── dusys-db/       # PostgreSQL pool and migrations
//! └── dusys-cache/    # Redis client for sessions
//! src/
//! ├── cli/            # init, create-admin, issue-token, show-config
//! ├── identity/       # IdentityStore trait (PostgreSQL, in-memory)
//! ├── session/        # Server-side sessions (Redis, in-memory)
//! ├── middleware/     # CurrentUser extractor
//! └── modules/
//!     ├── auth/       # /login/, /logout/
//!     └── landing/    # /, /tablemodelview/list/
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! DATABASE_HOST=localhost REDIS_HOST=localhost \
//! AUTO_LOGIN_SECRET=change-me cargo run --bin dusys
//!
//! cargo run --bin dusys-cli -- init
//! cargo run --bin dusys-cli -- issue-token -u ana -e ana@example.com -c 42 --ttl 300
//! ```

pub mod cli;
pub mod identity;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod session;
pub mod state;
pub mod validator;

pub use dusys_auth;
pub use dusys_config;
pub use dusys_core;
pub use dusys_models;
