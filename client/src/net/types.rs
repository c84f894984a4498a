//! Wire DTOs for the client/server boundary.
//!
//! The auth payloads and result types live in the shared `schema` crate so
//! the server's extractors and these helpers stay in lockstep.

pub use schema::{ActionError, AuthUser, Credentials, ErrorBody, FieldErrors, Session, SignupData, SignupRequest};
