//! # haven-auth
//!
//! Client-side authentication flow for Haven.
//!
//! Provides the session store over the hosted backend (with keychain/file
//! persistence), profile reads, the session and role guards that gate
//! protected views, and the post-authentication router that reconciles the
//! device's tenant selection after sign-in.

pub mod backend;
pub mod error;
pub mod guard;
pub mod handoff_store;
pub mod navigator;
pub mod profile;
pub mod router;
pub mod session_store;
pub mod token_store;

pub use backend::BackendClient;
pub use error::AuthError;
pub use guard::{Frame, RoleGuard, SessionGuard};
pub use handoff_store::{FileHandoffStore, HandoffStore, MemoryHandoffStore};
pub use navigator::{Navigator, RecordingNavigator};
pub use profile::{ProfileReader, RemoteProfileReader, current_profile};
pub use router::{Outcome, PostAuthRouter, Reconciliation};
pub use session_store::{RemoteSessionStore, SessionEvents, SessionStore};
pub use token_store::TokenStore;
