//! Single-use driver for one passkey ceremony.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use passkey_bridge_types::{
    AssertionCredential, CredentialAssertionRequest, CredentialRegistrationRequest,
    PlatformCredential, RegistrationCredential,
};

use crate::{
    platform::{CeremonyDelegate, PlatformAuthorizer, PresentationAnchor},
    AuthorizationError,
};

#[cfg(test)]
mod tests;

type PendingSlot<T> = Mutex<Option<oneshot::Sender<Result<T, AuthorizationError>>>>;

fn lock<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned slot only ever holds an Option of a sender, so the inner
    // value is still coherent.
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the lifecycle of one registration or one login ceremony against the
/// platform's authorization subsystem.
///
/// The handler doubles as the platform's [`CeremonyDelegate`]: submitting a
/// request arms a pending one-shot slot for that ceremony kind, and the
/// delegate callbacks resolve it exactly once, whichever completion path
/// fires first. A handler lives for exactly one ceremony; a new attempt
/// takes a new handler.
pub struct CeremonyHandler<A> {
    authorizer: A,
    anchor: PresentationAnchor,
    registration_slot: PendingSlot<RegistrationCredential>,
    assertion_slot: PendingSlot<AssertionCredential>,
}

impl<A> CeremonyHandler<A>
where
    A: PlatformAuthorizer + 'static,
{
    /// Create a handler bound to a borrowed presentation anchor.
    ///
    /// The handler is returned in an [`Arc`] because the authorization
    /// subsystem holds it as its delegate for the ceremony's duration.
    pub fn new(authorizer: A, anchor: PresentationAnchor) -> Arc<Self> {
        if anchor.is_provided() {
            log::debug!("ceremony handler anchored to the provided window");
        } else {
            log::debug!("no window provided; platform will fall back to its first window");
        }
        Arc::new(Self {
            authorizer,
            anchor,
            registration_slot: Mutex::new(None),
            assertion_slot: Mutex::new(None),
        })
    }

    /// Run a passkey registration ceremony and suspend until the platform
    /// resolves it.
    ///
    /// `challenge` and `user_id` pass through to the platform unmodified and
    /// `username` becomes the account's display name. A non-empty `salt`
    /// attaches the PRF registration extension with the salt as its first
    /// input slot.
    pub async fn begin_registration(
        self: Arc<Self>,
        domain: &str,
        challenge: &[u8],
        username: &str,
        user_id: &[u8],
        salt: Option<&[u8]>,
    ) -> Result<RegistrationCredential, AuthorizationError> {
        log::info!("starting passkey registration for domain {domain}, user {username}");
        let request = CredentialRegistrationRequest::new(domain, challenge, username, user_id)
            .prf_salt(salt.map(<[u8]>::to_vec));
        if request.prf.is_some() {
            log::debug!("PRF extension enabled for registration");
        }

        let receiver = {
            let mut slot = lock(&self.registration_slot);
            if slot.is_some() {
                return Err(AuthorizationError::CeremonyInProgress);
            }
            let (sender, receiver) = oneshot::channel();
            *slot = Some(sender);
            receiver
        };

        let delegate: Arc<dyn CeremonyDelegate> = self.clone();
        self.authorizer.perform_registration(request, delegate);

        receiver
            .await
            .unwrap_or(Err(AuthorizationError::CeremonyAbandoned))
    }

    /// Run a passkey login ceremony and suspend until the platform resolves
    /// it.
    ///
    /// A non-empty `salt` attaches the PRF assertion extension with the salt
    /// as its first input slot.
    pub async fn begin_login(
        self: Arc<Self>,
        domain: &str,
        challenge: &[u8],
        salt: Option<&[u8]>,
    ) -> Result<AssertionCredential, AuthorizationError> {
        log::info!("starting passkey login for domain {domain}");
        let request = CredentialAssertionRequest::new(domain, challenge)
            .prf_salt(salt.map(<[u8]>::to_vec));
        if request.prf.is_some() {
            log::debug!("PRF extension enabled for login");
        }

        let receiver = {
            let mut slot = lock(&self.assertion_slot);
            if slot.is_some() {
                return Err(AuthorizationError::CeremonyInProgress);
            }
            let (sender, receiver) = oneshot::channel();
            *slot = Some(sender);
            receiver
        };

        let delegate: Arc<dyn CeremonyDelegate> = self.clone();
        self.authorizer.perform_assertion(request, delegate);

        receiver
            .await
            .unwrap_or(Err(AuthorizationError::CeremonyAbandoned))
    }
}

impl<A> CeremonyDelegate for CeremonyHandler<A>
where
    A: PlatformAuthorizer + 'static,
{
    fn presentation_anchor(&self) -> PresentationAnchor {
        self.anchor
    }

    fn completed(&self, credential: PlatformCredential) {
        match credential {
            PlatformCredential::Registration(registration) => {
                // Release the slot guard before touching the other slot.
                let pending = lock(&self.registration_slot).take();
                if let Some(pending) = pending {
                    log::info!("passkey registration completed");
                    let _ = pending.send(Ok(registration));
                } else if let Some(pending) = lock(&self.assertion_slot).take() {
                    log::error!("registration credential received while a login was pending");
                    let _ = pending.send(Err(AuthorizationError::UnsupportedCredentialType));
                } else {
                    log::warn!("registration credential received with no pending ceremony");
                }
            }
            PlatformCredential::Assertion(assertion) => {
                let pending = lock(&self.assertion_slot).take();
                if let Some(pending) = pending {
                    log::info!("passkey login assertion received");
                    let _ = pending.send(Ok(assertion));
                } else if let Some(pending) = lock(&self.registration_slot).take() {
                    log::error!("assertion credential received while a registration was pending");
                    let _ = pending.send(Err(AuthorizationError::UnsupportedCredentialType));
                } else {
                    log::warn!("assertion credential received with no pending ceremony");
                }
            }
        }
    }

    fn failed(&self, error: AuthorizationError) {
        log::error!("authorization failed: {error}");
        if let Some(pending) = lock(&self.registration_slot).take() {
            let _ = pending.send(Err(error.clone()));
        }
        if let Some(pending) = lock(&self.assertion_slot).take() {
            let _ = pending.send(Err(error));
        }
    }
}
