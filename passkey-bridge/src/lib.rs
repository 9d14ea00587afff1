//! # Passkey Bridge
//!
//! This crate bridges a platform's native passkey ceremonies to callers that
//! live outside the native runtime, across a C-ABI boundary with no shared
//! asynchronous runtime. A [`CeremonyHandler`] turns the platform's
//! single-shot delegate callbacks back into an awaitable call, resolving its
//! pending continuation exactly once per ceremony; the [`ffi`] entry points
//! drive a ceremony to completion on a background thread and invoke a
//! caller-supplied completion callback exactly once with either an owned
//! result handle or null.
//!
//! The native authorization UI itself (modal sheet, biometric prompt) is not
//! implemented here: the embedding host supplies a [`PlatformAuthorizer`]
//! and registers it with [`install_authorizer`] before any boundary call.
//! When none is installed, or the platform reports passkeys as unsupported,
//! entry points complete immediately with a null handle.
//!
//! Errors never cross the boundary as structured objects; the contract is a
//! valid handle or null, with diagnostics emitted through the [`log`] facade.

use std::fmt;

#[allow(clippy::as_conversions)]
pub mod client;
#[allow(clippy::as_conversions)]
pub mod ffi;
mod handler;
mod marshal;
mod platform;

pub use handler::CeremonyHandler;
pub use marshal::{from_assertion, from_registration};
pub use platform::{
    install_authorizer, CeremonyDelegate, PlatformAuthorizer, PresentationAnchor,
};

#[cfg(feature = "testable")]
pub use platform::MockPlatformAuthorizer;

/// Failures a ceremony can resolve with.
///
/// These stay on the native side of the boundary: every variant collapses to
/// a null result handle for the caller, with the detail logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The platform does not support the passkey authorization APIs.
    UnsupportedPlatform,
    /// The authorization completed with a credential of an unexpected kind.
    UnsupportedCredentialType,
    /// A ceremony of the same kind is already pending on this handler.
    CeremonyInProgress,
    /// The authorization subsystem went away without resolving the ceremony.
    CeremonyAbandoned,
    /// A native authorization failure, such as user cancellation, a
    /// biometric failure, or a relying-party mismatch.
    Platform {
        /// Native error code.
        code: i64,
        /// Native error description.
        message: String,
    },
}

impl fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPlatform => {
                write!(f, "platform does not support passkey authorization")
            }
            Self::UnsupportedCredentialType => {
                write!(f, "authorization returned an unsupported credential type")
            }
            Self::CeremonyInProgress => {
                write!(f, "a ceremony of this kind is already in progress")
            }
            Self::CeremonyAbandoned => {
                write!(f, "authorization ended without resolving the ceremony")
            }
            Self::Platform { code, message } => {
                write!(f, "authorization failed ({code}): {message}")
            }
        }
    }
}

impl std::error::Error for AuthorizationError {}
