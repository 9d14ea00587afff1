//! Contracts for the platform authorization subsystem.
//!
//! The actual ceremony UI and cryptographic operations live in the host
//! platform. The bridge only submits requests and is resumed through a
//! [`CeremonyDelegate`], with no caller identity in the delegate's
//! signature.

use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::{Arc, PoisonError, RwLock};

use passkey_bridge_types::{
    CredentialAssertionRequest, CredentialRegistrationRequest, PlatformCredential,
};

use crate::AuthorizationError;

/// Non-owning reference to the host window a ceremony should anchor its UI to.
///
/// The bridge never dereferences the pointer; it only hands it back to the
/// authorization subsystem. The caller retains ownership and must keep the
/// window valid for the duration of the ceremony that borrows it. An empty
/// anchor tells the platform to fall back to its first available window.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentationAnchor {
    window: Option<NonNull<c_void>>,
}

// SAFETY: the anchor is an opaque address that is never dereferenced by this
// crate; it only travels back to the platform layer, which is the sole party
// that interprets it. Keeping the window alive is the caller's obligation.
unsafe impl Send for PresentationAnchor {}
// SAFETY: see the `Send` justification above; shared references expose only
// the address value.
unsafe impl Sync for PresentationAnchor {}

impl PresentationAnchor {
    /// Wrap a raw window pointer; a null pointer yields an empty anchor.
    pub fn from_window_ptr(ptr: *mut c_void) -> Self {
        Self {
            window: NonNull::new(ptr),
        }
    }

    /// The wrapped window pointer, null when no window was provided.
    pub fn window_ptr(&self) -> *mut c_void {
        self.window.map_or(std::ptr::null_mut(), NonNull::as_ptr)
    }

    /// Whether the caller provided a window.
    pub fn is_provided(&self) -> bool {
        self.window.is_some()
    }
}

/// The completion surface the authorization subsystem resumes a ceremony
/// through.
///
/// Exactly one of [`completed`](Self::completed) or
/// [`failed`](Self::failed) is expected per submitted request, from
/// whichever thread the platform finishes on.
pub trait CeremonyDelegate: Send + Sync {
    /// The window the ceremony UI should attach to.
    fn presentation_anchor(&self) -> PresentationAnchor;

    /// The authorization completed with a credential.
    fn completed(&self, credential: PlatformCredential);

    /// The authorization failed or was cancelled.
    fn failed(&self, error: AuthorizationError);
}

/// Pluggable contract for the platform's passkey authorization subsystem.
///
/// Submission is fire-and-forget: `perform_*` returns once the request is
/// handed to the platform, and the delegate is resumed later.
#[cfg_attr(any(test, feature = "testable"), mockall::automock)]
pub trait PlatformAuthorizer: Send + Sync {
    /// Whether the running platform supports the passkey authorization APIs
    /// this bridge relies on.
    fn supports_passkeys(&self) -> bool;

    /// Submit a credential registration request.
    fn perform_registration(
        &self,
        request: CredentialRegistrationRequest,
        delegate: Arc<dyn CeremonyDelegate>,
    );

    /// Submit a credential assertion request.
    fn perform_assertion(
        &self,
        request: CredentialAssertionRequest,
        delegate: Arc<dyn CeremonyDelegate>,
    );
}

impl<A: PlatformAuthorizer + ?Sized> PlatformAuthorizer for Arc<A> {
    fn supports_passkeys(&self) -> bool {
        (**self).supports_passkeys()
    }

    fn perform_registration(
        &self,
        request: CredentialRegistrationRequest,
        delegate: Arc<dyn CeremonyDelegate>,
    ) {
        (**self).perform_registration(request, delegate);
    }

    fn perform_assertion(
        &self,
        request: CredentialAssertionRequest,
        delegate: Arc<dyn CeremonyDelegate>,
    ) {
        (**self).perform_assertion(request, delegate);
    }
}

static AUTHORIZER: RwLock<Option<Arc<dyn PlatformAuthorizer>>> = RwLock::new(None);

/// Register the host's authorization subsystem for use by the boundary
/// entry points.
///
/// Hosts call this once during startup, before any boundary call. Until an
/// authorizer is installed, entry points complete immediately with a null
/// result handle.
pub fn install_authorizer(authorizer: Arc<dyn PlatformAuthorizer>) {
    let mut slot = AUTHORIZER.write().unwrap_or_else(PoisonError::into_inner);
    *slot = Some(authorizer);
}

pub(crate) fn installed_authorizer() -> Option<Arc<dyn PlatformAuthorizer>> {
    AUTHORIZER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

#[cfg(test)]
pub(crate) fn uninstall_authorizer() {
    let mut slot = AUTHORIZER.write().unwrap_or_else(PoisonError::into_inner);
    *slot = None;
}
