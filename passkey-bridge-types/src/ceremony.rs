//! Requests submitted to the platform's authorization subsystem.
//!
//! One request is built per ceremony, consumed once, and discarded. The PRF
//! extension is only attached when the caller supplied a non-empty salt; the
//! registration and assertion flavours are distinct types because the
//! platform distinguishes them.

/// Input slots for the pseudo-random function extension.
///
/// The platform evaluates a PRF over up to two inputs. A caller-supplied
/// salt always lands in the first slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrfInputValues {
    /// The first PRF input.
    pub first: Vec<u8>,
    /// The second PRF input, rarely used by the bridge's callers.
    pub second: Option<Vec<u8>>,
}

impl PrfInputValues {
    /// Build input values with `salt` as the first and only slot.
    pub fn first_salt(salt: impl Into<Vec<u8>>) -> Self {
        Self {
            first: salt.into(),
            second: None,
        }
    }
}

/// PRF extension input attached to a credential registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrfRegistrationInput {
    /// The salts to evaluate the PRF over once the credential exists.
    pub input_values: PrfInputValues,
}

/// PRF extension input attached to a credential assertion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrfAssertionInput {
    /// The salts to evaluate the PRF over during the assertion.
    pub input_values: PrfInputValues,
}

/// A platform credential registration request scoped to a relying party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRegistrationRequest {
    /// Relying party identifier the credential will be scoped to.
    pub relying_party_id: String,
    /// Relying-party challenge, passed through unmodified.
    pub challenge: Vec<u8>,
    /// Display name for the account being registered.
    pub user_name: String,
    /// Relying-party user handle, passed through unmodified.
    pub user_id: Vec<u8>,
    /// PRF extension input, when a salt was supplied.
    pub prf: Option<PrfRegistrationInput>,
}

impl CredentialRegistrationRequest {
    /// Build a registration request without a PRF extension.
    pub fn new(
        relying_party_id: impl Into<String>,
        challenge: impl Into<Vec<u8>>,
        user_name: impl Into<String>,
        user_id: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            relying_party_id: relying_party_id.into(),
            challenge: challenge.into(),
            user_name: user_name.into(),
            user_id: user_id.into(),
            prf: None,
        }
    }

    /// Attach a PRF extension whose first input slot is `salt`.
    ///
    /// An absent or zero-length salt attaches no extension.
    pub fn prf_salt(mut self, salt: Option<Vec<u8>>) -> Self {
        self.prf = salt
            .filter(|salt| !salt.is_empty())
            .map(|salt| PrfRegistrationInput {
                input_values: PrfInputValues::first_salt(salt),
            });
        self
    }
}

/// A platform credential assertion request scoped to a relying party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialAssertionRequest {
    /// Relying party identifier to assert against.
    pub relying_party_id: String,
    /// Relying-party challenge, passed through unmodified.
    pub challenge: Vec<u8>,
    /// PRF extension input, when a salt was supplied.
    pub prf: Option<PrfAssertionInput>,
}

impl CredentialAssertionRequest {
    /// Build an assertion request without a PRF extension.
    pub fn new(relying_party_id: impl Into<String>, challenge: impl Into<Vec<u8>>) -> Self {
        Self {
            relying_party_id: relying_party_id.into(),
            challenge: challenge.into(),
            prf: None,
        }
    }

    /// Attach a PRF extension whose first input slot is `salt`.
    ///
    /// An absent or zero-length salt attaches no extension.
    pub fn prf_salt(mut self, salt: Option<Vec<u8>>) -> Self {
        self.prf = salt
            .filter(|salt| !salt.is_empty())
            .map(|salt| PrfAssertionInput {
                input_values: PrfInputValues::first_salt(salt),
            });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_salt_attaches_no_prf() {
        let request = CredentialRegistrationRequest::new("example.com", [1, 2], "alice", [0xAA])
            .prf_salt(None);
        assert!(request.prf.is_none());
    }

    #[test]
    fn empty_salt_attaches_no_prf() {
        let request =
            CredentialAssertionRequest::new("example.com", [1, 2]).prf_salt(Some(Vec::new()));
        assert!(request.prf.is_none());
    }

    #[test]
    fn salt_becomes_first_input_slot() {
        let request = CredentialRegistrationRequest::new("example.com", [1, 2], "alice", [0xAA])
            .prf_salt(Some(vec![0x99]));
        let prf = request.prf.expect("PRF extension should be attached");
        assert_eq!(prf.input_values.first, vec![0x99]);
        assert!(prf.input_values.second.is_none());
    }

    #[test]
    fn inputs_pass_through_unmodified() {
        let request = CredentialRegistrationRequest::new("example.com", [1, 2], "alice", [0xAA]);
        assert_eq!(request.relying_party_id, "example.com");
        assert_eq!(request.challenge, vec![1, 2]);
        assert_eq!(request.user_name, "alice");
        assert_eq!(request.user_id, vec![0xAA]);
    }
}
