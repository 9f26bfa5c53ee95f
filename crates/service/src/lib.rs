//! Service layer: user persistence and the registration/login workflows.
//! - `storage` holds the generic JSON file store.
//! - `auth` holds domain types, validation, the `UserStore` seam and `AuthService`.
//! - No web framework types leak into this crate.

pub mod errors;
pub mod auth;
pub mod runtime;
pub mod storage;
