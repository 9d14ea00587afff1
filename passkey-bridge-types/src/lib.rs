//! # Passkey Bridge Types
//!
//! Data definitions shared between the ceremony driver and the FFI surface of
//! the passkey bridge: the requests submitted to the platform's authorization
//! subsystem, the credentials it hands back, and the caller-facing result
//! objects with their transport encoding.
//!
//! Nothing in this crate touches the platform or the boundary; it is plain
//! data plus the [`encoding`] rules that make the byte fields transportable
//! as text.

pub mod encoding;

mod ceremony;
mod credential;
mod result;

pub use ceremony::{
    CredentialAssertionRequest, CredentialRegistrationRequest, PrfAssertionInput, PrfInputValues,
    PrfRegistrationInput,
};
pub use credential::{
    AssertionCredential, PlatformCredential, PrfOutputValues, RegistrationCredential,
};
pub use result::{LoginResult, RegistrationResult};
