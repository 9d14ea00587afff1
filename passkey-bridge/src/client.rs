//! Safe caller-side wrappers over the exported entry points.
//!
//! These do what a host runtime on the far side of the boundary does: pack a
//! one-shot sender into the correlation token, hand a C trampoline as the
//! completion callback, and await the resulting handle. They are the typed
//! front door for Rust hosts and double as an end-to-end exercise of the
//! boundary contract.
//!
//! The binary boundary contract is preserved here: `None` means "ceremony
//! did not complete", with the reason only available through the log sink.

use std::ffi::{c_void, CString};

use tokio::sync::oneshot;

use passkey_bridge_types::{LoginResult, RegistrationResult};

use crate::ffi::{self, RawLoginResult, RawRegistrationResult};

/// Completion trampoline matching [`ffi::CeremonyCompleteCallback`].
extern "C" fn deliver_result(result: *mut c_void, context: u64) {
    // SAFETY: `context` carries a `Box<oneshot::Sender<usize>>` created by
    // the wrappers below, and the entry points invoke the callback exactly
    // once, so the box is reclaimed exactly once.
    let sender = unsafe { Box::from_raw(context as usize as *mut oneshot::Sender<usize>) };
    let _ = sender.send(result as usize);
}

fn callback_context() -> (oneshot::Receiver<usize>, u64) {
    let (sender, receiver) = oneshot::channel::<usize>();
    let context = Box::into_raw(Box::new(sender)) as usize as u64;
    (receiver, context)
}

/// Run a passkey registration ceremony through the boundary entry point.
///
/// `window_ptr` may be null to let the platform pick its anchor; an empty
/// `salt` requests no PRF extension. Returns `None` when the ceremony did
/// not complete.
pub async fn begin_registration(
    window_ptr: *mut c_void,
    domain: &str,
    challenge: &[u8],
    username: &str,
    user_id: &[u8],
    salt: &[u8],
) -> Option<RegistrationResult> {
    let domain = CString::new(domain).ok()?;
    let username = CString::new(username).ok()?;
    let (receiver, context) = callback_context();

    ffi::begin_passkey_registration(
        window_ptr,
        domain.as_ptr(),
        challenge.as_ptr(),
        challenge.len(),
        username.as_ptr(),
        user_id.as_ptr(),
        user_id.len(),
        salt.as_ptr(),
        salt.len(),
        context,
        deliver_result,
    );

    let handle = receiver.await.ok()?;
    if handle == 0 {
        return None;
    }
    // SAFETY: a non-null handle delivered to the registration callback was
    // produced by `Box::into_raw` of a `RawRegistrationResult`, with
    // ownership transferred to us.
    let raw = unsafe { Box::from_raw(handle as *mut RawRegistrationResult) };
    Some(raw.to_result())
}

/// Run a passkey login ceremony through the boundary entry point.
///
/// Returns `None` when the ceremony did not complete.
pub async fn begin_login(
    window_ptr: *mut c_void,
    domain: &str,
    challenge: &[u8],
    salt: &[u8],
) -> Option<LoginResult> {
    let domain = CString::new(domain).ok()?;
    let (receiver, context) = callback_context();

    ffi::begin_passkey_login(
        window_ptr,
        domain.as_ptr(),
        challenge.as_ptr(),
        challenge.len(),
        salt.as_ptr(),
        salt.len(),
        context,
        deliver_result,
    );

    let handle = receiver.await.ok()?;
    if handle == 0 {
        return None;
    }
    // SAFETY: a non-null handle delivered to the login callback was produced
    // by `Box::into_raw` of a `RawLoginResult`, with ownership transferred
    // to us.
    let raw = unsafe { Box::from_raw(handle as *mut RawLoginResult) };
    Some(raw.to_result())
}

/// Blocking variant of [`begin_registration`] for hosts that dispatch onto a
/// blocking thread.
pub fn run_registration(
    window_ptr: *mut c_void,
    domain: &str,
    challenge: &[u8],
    username: &str,
    user_id: &[u8],
    salt: &[u8],
) -> Option<RegistrationResult> {
    futures::executor::block_on(begin_registration(
        window_ptr, domain, challenge, username, user_id, salt,
    ))
}

/// Blocking variant of [`begin_login`].
pub fn run_login(
    window_ptr: *mut c_void,
    domain: &str,
    challenge: &[u8],
    salt: &[u8],
) -> Option<LoginResult> {
    futures::executor::block_on(begin_login(window_ptr, domain, challenge, salt))
}
