//! Credentials handed back by the platform's authorization subsystem.
//!
//! These are the raw ceremony artifacts before marshalling; every byte field
//! is exactly what the platform produced.

/// Output slots the platform evaluated for the PRF extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrfOutputValues {
    /// Output for the first input slot.
    pub first: Vec<u8>,
    /// Output for the second input slot, when one was requested.
    pub second: Option<Vec<u8>>,
}

/// A newly created platform credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCredential {
    /// Identifier of the created credential.
    pub credential_id: Vec<u8>,
    /// Raw client data JSON covering the registration challenge.
    pub client_data_json: Vec<u8>,
    /// Attestation object, when the platform produced one.
    pub attestation_object: Option<Vec<u8>>,
    /// PRF outputs, when the extension was requested and evaluated.
    pub prf_results: Option<PrfOutputValues>,
}

/// A platform assertion over an existing credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionCredential {
    /// Identifier of the asserted credential.
    pub credential_id: Vec<u8>,
    /// Raw client data JSON covering the login challenge.
    pub client_data_json: Vec<u8>,
    /// Authenticator data signed over during the assertion.
    pub authenticator_data: Vec<u8>,
    /// Assertion signature.
    pub signature: Vec<u8>,
    /// User handle the credential was registered with.
    pub user_handle: Vec<u8>,
    /// PRF outputs, when the extension was requested and evaluated.
    pub prf_results: Option<PrfOutputValues>,
}

/// The credential variants a completed authorization can carry.
///
/// A ceremony that receives the variant it did not ask for treats it as an
/// unsupported credential type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCredential {
    /// The authorization completed with a newly registered credential.
    Registration(RegistrationCredential),
    /// The authorization completed with an assertion.
    Assertion(AssertionCredential),
}
