use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Output of the password digest function.
pub type PasswordDigest = [u8; 32];

/// The opaque digest primitive: bytes in, fixed-size digest out.
pub fn digest(bytes: &[u8]) -> PasswordDigest {
    let hash = Sha256::digest(bytes);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash);
    out
}

/// Digest of `password || salt`, the form stored for each user.
pub fn salted_digest(password: &str, salt: &str) -> PasswordDigest {
    let mut salted = Vec::with_capacity(password.len() + salt.len());
    salted.extend_from_slice(password.as_bytes());
    salted.extend_from_slice(salt.as_bytes());
    digest(&salted)
}

pub fn hash_password(password: &str, salt: &str) -> String {
    hex::encode(salted_digest(password, salt))
}

pub fn parse_digest(encoded: &str) -> Option<PasswordDigest> {
    let bytes = hex::decode(encoded.trim()).ok()?;
    bytes.try_into().ok()
}

pub fn generate_salt(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salted_digest_depends_on_salt() {
        assert_eq!(salted_digest("pw", "abc"), salted_digest("pw", "abc"));
        assert_ne!(salted_digest("pw", "abc"), salted_digest("pw", "abd"));
        assert_eq!(salted_digest("pw", "abc"), digest(b"pwabc"));
    }

    #[test]
    fn test_hash_round_trips_through_hex() {
        let encoded = hash_password("secret", "salt");
        assert_eq!(encoded.len(), 64);
        assert_eq!(parse_digest(&encoded), Some(salted_digest("secret", "salt")));
        assert_eq!(parse_digest("abcd"), None);
        assert_eq!(parse_digest("not hex"), None);
    }

    #[test]
    fn test_generate_salt() {
        let salt = generate_salt(16);
        assert_eq!(salt.len(), 16);
        assert!(salt.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
