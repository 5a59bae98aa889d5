use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const VOTER_KEY_DOMAIN: &[u8] = b"classic-plus/voter/v1";

/// Opaque identifier of one voting identity.
///
/// Derived from the client-supplied session token and the network origin of
/// the request: `hex(SHA-256(domain || len(token) || token || origin))` with
/// the token length as a big-endian `u64`. Neither input is recoverable from
/// the key, and the length prefix keeps distinct (token, origin) pairs from
/// encoding to the same preimage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterKey(String);

impl VoterKey {
    pub fn derive(session_token: &str, origin: IpAddr) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(VOTER_KEY_DOMAIN);
        hasher.update((session_token.len() as u64).to_be_bytes());
        hasher.update(session_token.as_bytes());
        hasher.update(origin.to_string().as_bytes());
        VoterKey(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    const ORIGIN: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9));

    #[test]
    fn test_derive_is_deterministic() {
        assert_eq!(
            VoterKey::derive("session-a", ORIGIN),
            VoterKey::derive("session-a", ORIGIN)
        );
    }

    #[test]
    fn test_derive_is_hex_sha256() {
        let key = VoterKey::derive("session-a", ORIGIN);
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_derive_distinguishes_tokens_and_origins() {
        let base = VoterKey::derive("session-a", ORIGIN);
        assert_ne!(base, VoterKey::derive("session-b", ORIGIN));
        assert_ne!(
            base,
            VoterKey::derive("session-a", IpAddr::V6(Ipv6Addr::LOCALHOST))
        );
    }

    #[test]
    fn test_derive_does_not_leak_inputs() {
        let key = VoterKey::derive("very-secret-token", ORIGIN);
        assert!(!key.as_str().contains("secret"));
        assert!(!key.as_str().contains("203.0.113.9"));
    }
}
