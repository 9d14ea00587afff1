use std::sync::{Arc, Mutex};

use passkey_bridge_types::{
    AssertionCredential, CredentialAssertionRequest, CredentialRegistrationRequest,
    PlatformCredential, RegistrationCredential,
};

use super::CeremonyHandler;
use crate::platform::{CeremonyDelegate, PlatformAuthorizer, PresentationAnchor};
use crate::AuthorizationError;

fn sample_registration() -> RegistrationCredential {
    RegistrationCredential {
        credential_id: vec![0xDE, 0xAD],
        client_data_json: br#"{"type":"webauthn.create"}"#.to_vec(),
        attestation_object: Some(vec![0xA0]),
        prf_results: None,
    }
}

fn sample_assertion() -> AssertionCredential {
    AssertionCredential {
        credential_id: vec![0xDE, 0xAD],
        client_data_json: br#"{"type":"webauthn.get"}"#.to_vec(),
        authenticator_data: vec![0x01, 0x02],
        signature: vec![0x03, 0x04],
        user_handle: vec![0xAA],
        prf_results: None,
    }
}

fn cancelled() -> AuthorizationError {
    AuthorizationError::Platform {
        code: 1001,
        message: "user canceled the operation".into(),
    }
}

/// What the fake subsystem does with a submitted request.
#[derive(Clone)]
enum Script {
    Complete(PlatformCredential),
    Fail(AuthorizationError),
    /// Keep the delegate around so the test can resolve it later.
    Hold,
}

struct ScriptedAuthorizer {
    script: Script,
    seen_registration: Mutex<Option<CredentialRegistrationRequest>>,
    seen_assertion: Mutex<Option<CredentialAssertionRequest>>,
    held: Mutex<Vec<Arc<dyn CeremonyDelegate>>>,
}

impl ScriptedAuthorizer {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            seen_registration: Mutex::new(None),
            seen_assertion: Mutex::new(None),
            held: Mutex::new(Vec::new()),
        })
    }

    fn run(&self, delegate: Arc<dyn CeremonyDelegate>) {
        match &self.script {
            Script::Complete(credential) => delegate.completed(credential.clone()),
            Script::Fail(error) => delegate.failed(error.clone()),
            Script::Hold => self.held.lock().unwrap().push(delegate),
        }
    }

    fn held_delegate(&self) -> Arc<dyn CeremonyDelegate> {
        self.held.lock().unwrap().first().cloned().expect("no delegate held")
    }
}

impl PlatformAuthorizer for ScriptedAuthorizer {
    fn supports_passkeys(&self) -> bool {
        true
    }

    fn perform_registration(
        &self,
        request: CredentialRegistrationRequest,
        delegate: Arc<dyn CeremonyDelegate>,
    ) {
        *self.seen_registration.lock().unwrap() = Some(request);
        self.run(delegate);
    }

    fn perform_assertion(
        &self,
        request: CredentialAssertionRequest,
        delegate: Arc<dyn CeremonyDelegate>,
    ) {
        *self.seen_assertion.lock().unwrap() = Some(request);
        self.run(delegate);
    }
}

#[tokio::test]
async fn registration_resolves_with_platform_credential() {
    let authorizer = ScriptedAuthorizer::new(Script::Complete(PlatformCredential::Registration(
        sample_registration(),
    )));
    let handler = CeremonyHandler::new(Arc::clone(&authorizer), PresentationAnchor::default());

    let credential = handler
        .begin_registration("example.com", &[0x01, 0x02], "alice", &[0xAA], None)
        .await
        .expect("registration should succeed");

    assert_eq!(credential, sample_registration());

    let seen = authorizer.seen_registration.lock().unwrap().clone().unwrap();
    assert_eq!(seen.relying_party_id, "example.com");
    assert_eq!(seen.challenge, vec![0x01, 0x02]);
    assert_eq!(seen.user_name, "alice");
    assert_eq!(seen.user_id, vec![0xAA]);
    assert!(seen.prf.is_none());
}

#[tokio::test]
async fn login_resolves_with_platform_assertion() {
    let authorizer = ScriptedAuthorizer::new(Script::Complete(PlatformCredential::Assertion(
        sample_assertion(),
    )));
    let handler = CeremonyHandler::new(Arc::clone(&authorizer), PresentationAnchor::default());

    let assertion = handler
        .begin_login("example.com", &[0x01, 0x02], None)
        .await
        .expect("login should succeed");

    assert_eq!(assertion, sample_assertion());
    assert!(authorizer.seen_assertion.lock().unwrap().is_some());
}

#[tokio::test]
async fn registration_salt_becomes_first_prf_input() {
    let authorizer = ScriptedAuthorizer::new(Script::Complete(PlatformCredential::Registration(
        sample_registration(),
    )));
    let handler = CeremonyHandler::new(Arc::clone(&authorizer), PresentationAnchor::default());

    handler
        .begin_registration("example.com", &[0x01], "alice", &[0xAA], Some(&[0x99]))
        .await
        .expect("registration should succeed");

    let seen = authorizer.seen_registration.lock().unwrap().clone().unwrap();
    let prf = seen.prf.expect("PRF extension should be attached");
    assert_eq!(prf.input_values.first, vec![0x99]);
}

#[tokio::test]
async fn login_salt_becomes_first_prf_input() {
    let authorizer = ScriptedAuthorizer::new(Script::Complete(PlatformCredential::Assertion(
        sample_assertion(),
    )));
    let handler = CeremonyHandler::new(Arc::clone(&authorizer), PresentationAnchor::default());

    handler
        .begin_login("example.com", &[0x01], Some(&[0x99]))
        .await
        .expect("login should succeed");

    let seen = authorizer.seen_assertion.lock().unwrap().clone().unwrap();
    let prf = seen.prf.expect("PRF extension should be attached");
    assert_eq!(prf.input_values.first, vec![0x99]);
}

#[tokio::test]
async fn login_failure_surfaces_platform_error() {
    let authorizer = ScriptedAuthorizer::new(Script::Fail(cancelled()));
    let handler = CeremonyHandler::new(authorizer, PresentationAnchor::default());

    let error = handler
        .begin_login("example.com", &[0x01], None)
        .await
        .expect_err("login should fail");

    assert_eq!(error, cancelled());
}

#[tokio::test]
async fn mismatched_credential_kind_fails_login() {
    let authorizer = ScriptedAuthorizer::new(Script::Complete(PlatformCredential::Registration(
        sample_registration(),
    )));
    let handler = CeremonyHandler::new(authorizer, PresentationAnchor::default());

    let error = handler
        .begin_login("example.com", &[0x01], None)
        .await
        .expect_err("login should fail on a registration credential");

    assert_eq!(error, AuthorizationError::UnsupportedCredentialType);
}

#[tokio::test]
async fn mismatched_credential_kind_fails_registration() {
    let authorizer = ScriptedAuthorizer::new(Script::Complete(PlatformCredential::Assertion(
        sample_assertion(),
    )));
    let handler = CeremonyHandler::new(authorizer, PresentationAnchor::default());

    let error = handler
        .begin_registration("example.com", &[0x01], "alice", &[0xAA], None)
        .await
        .expect_err("registration should fail on an assertion credential");

    assert_eq!(error, AuthorizationError::UnsupportedCredentialType);
}

#[tokio::test]
async fn second_registration_while_pending_is_refused() {
    let authorizer = ScriptedAuthorizer::new(Script::Hold);
    let handler = CeremonyHandler::new(Arc::clone(&authorizer), PresentationAnchor::default());

    let first = tokio::spawn({
        let handler = Arc::clone(&handler);
        async move {
            handler
                .begin_registration("example.com", &[0x01], "alice", &[0xAA], None)
                .await
        }
    });
    tokio::task::yield_now().await;

    let error = Arc::clone(&handler)
        .begin_registration("example.com", &[0x01], "alice", &[0xAA], None)
        .await
        .expect_err("second registration should be refused");
    assert_eq!(error, AuthorizationError::CeremonyInProgress);

    // The first caller is still resumable.
    authorizer
        .held_delegate()
        .completed(PlatformCredential::Registration(sample_registration()));
    let outcome = first.await.expect("task panicked");
    assert_eq!(outcome, Ok(sample_registration()));
}

#[tokio::test]
async fn duelling_completion_paths_resolve_once() {
    let authorizer = ScriptedAuthorizer::new(Script::Hold);
    let handler = CeremonyHandler::new(Arc::clone(&authorizer), PresentationAnchor::default());

    let pending = tokio::spawn({
        let handler = Arc::clone(&handler);
        async move {
            handler
                .begin_registration("example.com", &[0x01], "alice", &[0xAA], None)
                .await
        }
    });
    tokio::task::yield_now().await;

    let delegate = authorizer.held_delegate();
    delegate.completed(PlatformCredential::Registration(sample_registration()));
    // Both late paths must be swallowed, not re-resolve the caller.
    delegate.completed(PlatformCredential::Registration(sample_registration()));
    delegate.failed(cancelled());

    let outcome = pending.await.expect("task panicked");
    assert_eq!(outcome, Ok(sample_registration()));
}

#[tokio::test]
async fn failure_after_failure_resolves_once() {
    let authorizer = ScriptedAuthorizer::new(Script::Hold);
    let handler = CeremonyHandler::new(Arc::clone(&authorizer), PresentationAnchor::default());

    let pending = tokio::spawn({
        let handler = Arc::clone(&handler);
        async move { handler.begin_login("example.com", &[0x01], None).await }
    });
    tokio::task::yield_now().await;

    let delegate = authorizer.held_delegate();
    delegate.failed(cancelled());
    delegate.failed(AuthorizationError::UnsupportedCredentialType);

    let outcome = pending.await.expect("task panicked");
    assert_eq!(outcome, Err(cancelled()));
}

#[test]
fn delegate_reports_provided_anchor() {
    let mut window = 0u8;
    let window_ptr: *mut std::ffi::c_void = std::ptr::addr_of_mut!(window).cast();

    let authorizer = ScriptedAuthorizer::new(Script::Hold);
    let handler = CeremonyHandler::new(authorizer, PresentationAnchor::from_window_ptr(window_ptr));

    let anchor = handler.presentation_anchor();
    assert!(anchor.is_provided());
    assert_eq!(anchor.window_ptr(), window_ptr);
}
