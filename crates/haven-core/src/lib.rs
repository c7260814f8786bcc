//! # haven-core
//!
//! Core types shared across all Haven crates:
//! - Identity and session handles issued by the hosted backend
//! - Profile and organization records (the authorization data)
//! - Role and gate-state enums with their allowed transitions
//! - Logical routes the client can be sent to
//! - The typed handoff that carries tenant selection and one-shot
//!   diagnostics between screens
//! - Cross-cutting error types

pub mod enums;
pub mod errors;
pub mod handoff;
pub mod identity;
pub mod profile;
pub mod route;

pub use enums::{Role, RoleGate, SessionGate};
pub use errors::CoreError;
pub use handoff::{Handoff, TenantSelection};
pub use identity::{Identity, Session};
pub use profile::{Organization, Profile};
pub use route::Route;
