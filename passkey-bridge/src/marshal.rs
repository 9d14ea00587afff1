//! Conversion of platform credentials into caller-facing result objects.
//!
//! Marshalling is pure and total: a well-formed credential always produces a
//! complete result. Text-bound fields are Base64URL without padding, the PRF
//! output stays raw, and optional platform fields collapse to empty rather
//! than partial results.

use passkey_bridge_types::{
    encoding, AssertionCredential, LoginResult, PrfOutputValues, RegistrationCredential,
    RegistrationResult,
};

/// Marshal a registration credential into a caller-ownable result.
pub fn from_registration(credential: &RegistrationCredential) -> RegistrationResult {
    let id = encoding::base64url(&credential.credential_id);
    RegistrationResult {
        raw_id: id.clone(),
        id,
        client_data_json: encoding::base64url(&credential.client_data_json),
        attestation_object: credential
            .attestation_object
            .as_deref()
            .map(encoding::base64url)
            .unwrap_or_default(),
        prf_output: first_prf_output(credential.prf_results.as_ref()),
    }
}

/// Marshal an assertion credential into a caller-ownable result.
pub fn from_assertion(assertion: &AssertionCredential) -> LoginResult {
    let id = encoding::base64url(&assertion.credential_id);
    LoginResult {
        raw_id: id.clone(),
        id,
        client_data_json: encoding::base64url(&assertion.client_data_json),
        authenticator_data: encoding::base64url(&assertion.authenticator_data),
        signature: encoding::base64url(&assertion.signature),
        user_handle: encoding::base64url(&assertion.user_handle),
        prf_output: first_prf_output(assertion.prf_results.as_ref()),
    }
}

fn first_prf_output(results: Option<&PrfOutputValues>) -> Vec<u8> {
    results.map(|values| values.first.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration_credential() -> RegistrationCredential {
        RegistrationCredential {
            credential_id: vec![0xDE, 0xAD],
            client_data_json: br#"{"type":"webauthn.create"}"#.to_vec(),
            attestation_object: Some(vec![0xA3, 0x63]),
            prf_results: None,
        }
    }

    #[test]
    fn registration_id_encodes_to_base64url() {
        let result = from_registration(&registration_credential());
        assert_eq!(result.id, "3q0");
        assert_eq!(result.raw_id, result.id);
        assert_eq!(
            encoding::try_from_base64url(&result.client_data_json).as_deref(),
            Some(&br#"{"type":"webauthn.create"}"#[..]),
        );
    }

    #[test]
    fn registration_without_prf_yields_empty_output() {
        let result = from_registration(&registration_credential());
        assert!(result.prf_output.is_empty());
    }

    #[test]
    fn registration_prf_output_stays_raw() {
        let mut credential = registration_credential();
        credential.prf_results = Some(PrfOutputValues {
            first: vec![0x01, 0x02, 0x03],
            second: Some(vec![0xFF]),
        });

        let result = from_registration(&credential);
        assert_eq!(result.prf_output, vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn absent_attestation_object_marshals_to_empty_string() {
        let mut credential = registration_credential();
        credential.attestation_object = None;

        let result = from_registration(&credential);
        assert_eq!(result.attestation_object, "");
    }

    #[test]
    fn assertion_fields_encode_to_base64url() {
        let assertion = AssertionCredential {
            credential_id: vec![0xDE, 0xAD],
            client_data_json: br#"{"type":"webauthn.get"}"#.to_vec(),
            authenticator_data: vec![0x01, 0x02],
            signature: vec![0xFB, 0xEF],
            user_handle: vec![0xAA],
            prf_results: Some(PrfOutputValues {
                first: vec![0x09],
                second: None,
            }),
        };

        let result = from_assertion(&assertion);
        assert_eq!(result.id, "3q0");
        assert_eq!(result.raw_id, result.id);
        assert_eq!(result.authenticator_data, "AQI");
        assert_eq!(result.user_handle, "qg");
        assert_eq!(result.prf_output, vec![0x09]);
        for field in [
            &result.client_data_json,
            &result.authenticator_data,
            &result.signature,
            &result.user_handle,
        ] {
            assert!(!field.contains('+') && !field.contains('/') && !field.contains('='));
        }
    }
}
