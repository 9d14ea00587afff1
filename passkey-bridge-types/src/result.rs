//! Caller-facing result objects.
//!
//! Once one of these is handed across the boundary it belongs to the caller.
//! Text fields are Base64URL without padding; `prf_output` stays raw bytes
//! because it is key material, not display data.

use serde::Serialize;
use typeshare::typeshare;

/// Result of a completed registration ceremony.
#[typeshare]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResult {
    /// Base64URL credential identifier.
    pub id: String,
    /// Identical to `id`; kept separate to match the WebAuthn credential shape.
    pub raw_id: String,
    /// Base64URL client data JSON.
    pub client_data_json: String,
    /// Base64URL attestation object, empty when the platform produced none.
    pub attestation_object: String,
    /// Raw first PRF output slot, empty when PRF was not used.
    pub prf_output: Vec<u8>,
}

/// Result of a completed login ceremony.
#[typeshare]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    /// Base64URL credential identifier.
    pub id: String,
    /// Identical to `id`; kept separate to match the WebAuthn credential shape.
    pub raw_id: String,
    /// Base64URL client data JSON.
    pub client_data_json: String,
    /// Base64URL authenticator data.
    pub authenticator_data: String,
    /// Base64URL assertion signature.
    pub signature: String,
    /// Base64URL user handle.
    pub user_handle: String,
    /// Raw first PRF output slot, empty when PRF was not used.
    pub prf_output: Vec<u8>,
}
