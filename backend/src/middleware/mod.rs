//! Request middleware: per-request tracing and the admin session guard.

pub mod admin_guard;
pub mod trace;

pub use admin_guard::{AuthenticatedAdmin, LOGIN_PATH, RequireAdmin};
pub use trace::Trace;
