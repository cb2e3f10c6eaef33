use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use sha2::{Digest, Sha256};
use wordle_types::{ANONYMOUS, Identity};

/// OpenSSH-style fingerprint: `SHA256:` followed by the unpadded base64
/// SHA-256 digest of the key material.
pub fn fingerprint(public_key: &str) -> String {
    let key = public_key.trim();

    // "ssh-ed25519 AAAA... comment" hashes the decoded blob, like ssh-keygen
    let material = key
        .split_whitespace()
        .nth(1)
        .and_then(|blob| base64::engine::general_purpose::STANDARD.decode(blob).ok())
        .unwrap_or_else(|| key.as_bytes().to_vec());

    let digest = Sha256::digest(&material);
    format!("SHA256:{}", STANDARD_NO_PAD.encode(digest))
}

/// Identity for an authenticating connection. A blank name or missing key
/// falls back to the anonymous placeholder.
pub fn resolve_identity(username: &str, public_key: Option<&str>) -> Identity {
    let display_name = match username.trim() {
        "" => ANONYMOUS.to_string(),
        name => name.to_string(),
    };

    let fingerprint = public_key
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(fingerprint)
        .unwrap_or_else(|| ANONYMOUS.to_string());

    Identity::new(display_name, fingerprint)
}
