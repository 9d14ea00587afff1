//! C-ABI entry points for driving passkey ceremonies from a foreign runtime.
//!
//! Each entry point decodes its raw arguments, runs the precondition gate,
//! and launches the ceremony on a dedicated background thread so the call
//! itself returns immediately; a user interaction can take arbitrarily long.
//! The caller-supplied completion callback is invoked exactly once per call,
//! on whichever thread the ceremony completed on, with either an owned
//! result handle or null plus the caller's correlation token. Callers must
//! not assume the callback runs on the calling thread.
//!
//! A non-null result handle is an ownership handoff: the bridge performs no
//! further access or release. The caller eventually returns it to
//! [`passkey_registration_result_free`] or [`passkey_login_result_free`].

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::sync::Arc;
use std::thread;

use passkey_bridge_types::{LoginResult, RegistrationResult};

use crate::handler::CeremonyHandler;
use crate::platform::{self, PresentationAnchor};
use crate::{marshal, AuthorizationError};


/// Completion callback supplied by the caller.
///
/// Receives either an owned result handle or null, plus the correlation
/// token given to the originating call.
pub type CeremonyCompleteCallback = unsafe extern "C" fn(result: *mut c_void, context: u64);

/// An owned byte buffer crossing the boundary; null `data` means empty.
#[repr(C)]
pub struct RawBuffer {
    /// Start of the buffer, or null when empty.
    pub data: *mut u8,
    /// Number of valid bytes at `data`.
    pub len: usize,
}

impl RawBuffer {
    fn from_vec(bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            return Self {
                data: ptr::null_mut(),
                len: 0,
            };
        }
        let len = bytes.len();
        let data = Box::into_raw(bytes.into_boxed_slice()).cast::<u8>();
        Self { data, len }
    }

    /// Copy the buffer contents out.
    pub fn to_vec(&self) -> Vec<u8> {
        if self.data.is_null() || self.len == 0 {
            return Vec::new();
        }
        // SAFETY: a non-null `data` was produced by `from_vec` from a boxed
        // slice of exactly `len` bytes and has not been released yet.
        unsafe { std::slice::from_raw_parts(self.data, self.len) }.to_vec()
    }

    fn release(&mut self) {
        if self.data.is_null() {
            return;
        }
        // SAFETY: a non-null `data` was produced by `from_vec` via
        // `Box::into_raw` of a boxed slice of exactly `len` bytes, and
        // `release` nulls the pointer so the box is reclaimed at most once.
        unsafe { drop(Box::from_raw(ptr::slice_from_raw_parts_mut(self.data, self.len))) };
        self.data = ptr::null_mut();
        self.len = 0;
    }
}

/// ABI-stable registration result handed to the caller by value of handle.
///
/// String fields are owned NUL-terminated Base64URL text; `prf_output` is
/// owned raw bytes. The struct owns all of its fields until it is returned
/// to [`passkey_registration_result_free`].
#[repr(C)]
pub struct RawRegistrationResult {
    /// Base64URL credential identifier.
    pub id: *mut c_char,
    /// Identical to `id`.
    pub raw_id: *mut c_char,
    /// Base64URL client data JSON.
    pub client_data_json: *mut c_char,
    /// Base64URL attestation object, empty string when absent.
    pub attestation_object: *mut c_char,
    /// Raw first PRF output slot, empty when PRF was not used.
    pub prf_output: RawBuffer,
}

impl RawRegistrationResult {
    fn from_result(result: RegistrationResult) -> Self {
        Self {
            id: owned_c_string(result.id),
            raw_id: owned_c_string(result.raw_id),
            client_data_json: owned_c_string(result.client_data_json),
            attestation_object: owned_c_string(result.attestation_object),
            prf_output: RawBuffer::from_vec(result.prf_output),
        }
    }

    /// Copy the raw fields back into an owned result.
    pub fn to_result(&self) -> RegistrationResult {
        RegistrationResult {
            id: read_c_string(self.id),
            raw_id: read_c_string(self.raw_id),
            client_data_json: read_c_string(self.client_data_json),
            attestation_object: read_c_string(self.attestation_object),
            prf_output: self.prf_output.to_vec(),
        }
    }
}

impl Drop for RawRegistrationResult {
    fn drop(&mut self) {
        release_c_string(self.id);
        release_c_string(self.raw_id);
        release_c_string(self.client_data_json);
        release_c_string(self.attestation_object);
        self.prf_output.release();
    }
}

/// ABI-stable login result handed to the caller by value of handle.
///
/// Field ownership follows [`RawRegistrationResult`].
#[repr(C)]
pub struct RawLoginResult {
    /// Base64URL credential identifier.
    pub id: *mut c_char,
    /// Identical to `id`.
    pub raw_id: *mut c_char,
    /// Base64URL client data JSON.
    pub client_data_json: *mut c_char,
    /// Base64URL authenticator data.
    pub authenticator_data: *mut c_char,
    /// Base64URL assertion signature.
    pub signature: *mut c_char,
    /// Base64URL user handle.
    pub user_handle: *mut c_char,
    /// Raw first PRF output slot, empty when PRF was not used.
    pub prf_output: RawBuffer,
}

impl RawLoginResult {
    fn from_result(result: LoginResult) -> Self {
        Self {
            id: owned_c_string(result.id),
            raw_id: owned_c_string(result.raw_id),
            client_data_json: owned_c_string(result.client_data_json),
            authenticator_data: owned_c_string(result.authenticator_data),
            signature: owned_c_string(result.signature),
            user_handle: owned_c_string(result.user_handle),
            prf_output: RawBuffer::from_vec(result.prf_output),
        }
    }

    /// Copy the raw fields back into an owned result.
    pub fn to_result(&self) -> LoginResult {
        LoginResult {
            id: read_c_string(self.id),
            raw_id: read_c_string(self.raw_id),
            client_data_json: read_c_string(self.client_data_json),
            authenticator_data: read_c_string(self.authenticator_data),
            signature: read_c_string(self.signature),
            user_handle: read_c_string(self.user_handle),
            prf_output: self.prf_output.to_vec(),
        }
    }
}

impl Drop for RawLoginResult {
    fn drop(&mut self) {
        release_c_string(self.id);
        release_c_string(self.raw_id);
        release_c_string(self.client_data_json);
        release_c_string(self.authenticator_data);
        release_c_string(self.signature);
        release_c_string(self.user_handle);
        self.prf_output.release();
    }
}

fn owned_c_string(text: String) -> *mut c_char {
    // Base64URL output cannot contain NUL, so the fallback is unreachable
    // for marshalled fields.
    CString::new(text).unwrap_or_default().into_raw()
}

fn read_c_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: non-null string fields were produced by `owned_c_string` and
    // are NUL-terminated, and the owning struct has not been freed.
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

fn release_c_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: non-null string fields were produced by `CString::into_raw` in
    // `owned_c_string`, and each struct is dropped at most once.
    unsafe { drop(CString::from_raw(ptr)) };
}

/// Decode a borrowed, NUL-terminated string argument; null is a caller error.
fn borrowed_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: the boundary contract requires non-null string arguments to be
    // NUL-terminated and valid for the duration of the call.
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

/// Copy a borrowed byte argument; null or zero-length reads as empty.
fn borrowed_bytes(data: *const u8, len: usize) -> Vec<u8> {
    if data.is_null() || len == 0 {
        return Vec::new();
    }
    // SAFETY: the boundary contract requires non-null byte arguments to
    // point at `len` readable bytes for the duration of the call.
    unsafe { std::slice::from_raw_parts(data, len) }.to_vec()
}

/// Invoke the caller's completion callback exactly once.
fn complete(callback: CeremonyCompleteCallback, result: *mut c_void, context: u64) {
    // SAFETY: the callback pointer was supplied by the boundary caller for
    // exactly this purpose; the result is either null or an owned handle the
    // callee takes over.
    unsafe { callback(result, context) };
}

/// True when an authorizer is installed and the platform supports passkeys.
///
/// Evaluated before any other side effect so unsupported platforms are never
/// asked to perform an authorization.
fn passkeys_available() -> Option<Arc<dyn platform::PlatformAuthorizer>> {
    let authorizer = platform::installed_authorizer()?;
    if !authorizer.supports_passkeys() {
        log::warn!("{}", AuthorizationError::UnsupportedPlatform);
        return None;
    }
    Some(authorizer)
}

/// Begin a passkey registration ceremony.
///
/// `window_ptr` is a borrowed presentation anchor (may be null for the
/// platform default); `domain` and `username` are NUL-terminated strings;
/// byte arguments are pointer/length pairs valid for the duration of the
/// call; a zero-length `salt` requests no PRF extension. `callback` is
/// invoked exactly once with an owned [`RawRegistrationResult`] handle or
/// null, plus `context` unchanged.
#[no_mangle]
pub extern "C" fn begin_passkey_registration(
    window_ptr: *mut c_void,
    domain: *const c_char,
    challenge: *const u8,
    challenge_len: usize,
    username: *const c_char,
    user_id: *const u8,
    user_id_len: usize,
    salt: *const u8,
    salt_len: usize,
    context: u64,
    callback: CeremonyCompleteCallback,
) {
    let Some(authorizer) = passkeys_available() else {
        return complete(callback, ptr::null_mut(), context);
    };
    let (Some(domain), Some(username)) = (borrowed_string(domain), borrowed_string(username))
    else {
        log::error!("null string argument in passkey registration call");
        return complete(callback, ptr::null_mut(), context);
    };
    let challenge = borrowed_bytes(challenge, challenge_len);
    let user_id = borrowed_bytes(user_id, user_id_len);
    let salt = borrowed_bytes(salt, salt_len);
    let anchor = PresentationAnchor::from_window_ptr(window_ptr);

    let spawned = thread::Builder::new()
        .name("passkey-registration".into())
        .spawn(move || {
            let handler = CeremonyHandler::new(authorizer, anchor);
            let salt = (!salt.is_empty()).then_some(salt);
            let outcome = futures::executor::block_on(handler.begin_registration(
                &domain,
                &challenge,
                &username,
                &user_id,
                salt.as_deref(),
            ));
            match outcome {
                Ok(credential) => {
                    let result = marshal::from_registration(&credential);
                    let handle = Box::into_raw(Box::new(RawRegistrationResult::from_result(result)));
                    complete(callback, handle.cast(), context);
                }
                Err(error) => {
                    log::error!("passkey registration did not complete: {error}");
                    complete(callback, ptr::null_mut(), context);
                }
            }
        });
    if spawned.is_err() {
        log::error!("failed to spawn passkey registration thread");
        complete(callback, ptr::null_mut(), context);
    }
}

/// Begin a passkey login ceremony.
///
/// Argument and callback contracts match [`begin_passkey_registration`],
/// with a [`RawLoginResult`] handle on success.
#[no_mangle]
pub extern "C" fn begin_passkey_login(
    window_ptr: *mut c_void,
    domain: *const c_char,
    challenge: *const u8,
    challenge_len: usize,
    salt: *const u8,
    salt_len: usize,
    context: u64,
    callback: CeremonyCompleteCallback,
) {
    let Some(authorizer) = passkeys_available() else {
        return complete(callback, ptr::null_mut(), context);
    };
    let Some(domain) = borrowed_string(domain) else {
        log::error!("null domain argument in passkey login call");
        return complete(callback, ptr::null_mut(), context);
    };
    let challenge = borrowed_bytes(challenge, challenge_len);
    let salt = borrowed_bytes(salt, salt_len);
    let anchor = PresentationAnchor::from_window_ptr(window_ptr);

    let spawned = thread::Builder::new()
        .name("passkey-login".into())
        .spawn(move || {
            let handler = CeremonyHandler::new(authorizer, anchor);
            let salt = (!salt.is_empty()).then_some(salt);
            let outcome = futures::executor::block_on(handler.begin_login(
                &domain,
                &challenge,
                salt.as_deref(),
            ));
            match outcome {
                Ok(assertion) => {
                    let result = marshal::from_assertion(&assertion);
                    let handle = Box::into_raw(Box::new(RawLoginResult::from_result(result)));
                    complete(callback, handle.cast(), context);
                }
                Err(error) => {
                    log::error!("passkey login did not complete: {error}");
                    complete(callback, ptr::null_mut(), context);
                }
            }
        });
    if spawned.is_err() {
        log::error!("failed to spawn passkey login thread");
        complete(callback, ptr::null_mut(), context);
    }
}

/// Release a registration result previously handed over by the bridge.
///
/// Passing null is a no-op. Each handle must be freed at most once.
// Kept as a safe export: the handle's validity is part of the callback
// contract, and foreign callers cannot observe a Rust `unsafe` marker.
#[allow(clippy::not_unsafe_ptr_arg_deref)]
#[no_mangle]
pub extern "C" fn passkey_registration_result_free(result: *mut RawRegistrationResult) {
    if result.is_null() {
        return;
    }
    // SAFETY: non-null handles were produced by `Box::into_raw` in
    // `begin_passkey_registration`, and the contract allows one free.
    unsafe { drop(Box::from_raw(result)) };
}

/// Release a login result previously handed over by the bridge.
///
/// Passing null is a no-op. Each handle must be freed at most once.
#[allow(clippy::not_unsafe_ptr_arg_deref)]
#[no_mangle]
pub extern "C" fn passkey_login_result_free(result: *mut RawLoginResult) {
    if result.is_null() {
        return;
    }
    // SAFETY: non-null handles were produced by `Box::into_raw` in
    // `begin_passkey_login`, and the contract allows one free.
    unsafe { drop(Box::from_raw(result)) };
}
