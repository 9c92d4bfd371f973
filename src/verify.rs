//! Encoded-string convenience wrappers (hash-then-pack, rehash-then-
//! compare) and constant-time tag comparison.

use crate::encoding::{decode, encode};
use crate::error::Error;
use crate::params::{Params, Variant};
use crate::Context;

/// Hashes `pwd` under `salt` with the given `params`/`threads` and returns
/// the full PHC-encoded string.
pub fn hash_encoded(params: Params, threads: u32, pwd: &[u8], salt: &[u8]) -> Result<String, Error> {
    let mut pwd_buf = pwd.to_vec();
    let mut secret_buf: [u8; 0] = [];
    let mut out = vec![0u8; params.outlen() as usize];

    let ctx = Context::new(params).with_threads(threads)?;
    ctx.hash(&mut out, &mut pwd_buf, salt, &mut secret_buf, &[])?;

    Ok(encode(&params, salt, &out))
}

/// Decodes `encoded` (requiring it to name `expected`), rehashes `pwd`
/// under the embedded parameters and salt, and compares the recomputed
/// tag to the embedded one in constant time. Returns `Ok(())` on a match
/// and `Err(Error::VerifyMismatch)` on a clean recomputation that simply
/// doesn't match — every other failure (bad encoding, bad parameters)
/// surfaces its own distinct `Error` variant instead.
pub fn verify_encoded(encoded: &str, pwd: &[u8], expected: Variant) -> Result<(), Error> {
    let (params, salt, expected_tag) = decode(encoded, expected)?;

    let mut pwd_buf = pwd.to_vec();
    let mut secret_buf: [u8; 0] = [];
    let mut out = vec![0u8; params.outlen() as usize];

    let ctx = Context::new(params);
    ctx.hash(&mut out, &mut pwd_buf, &salt, &mut secret_buf, &[])?;

    if constant_eq(&out, &expected_tag) {
        Ok(())
    } else {
        Err(Error::VerifyMismatch)
    }
}

/// Byte-wise constant-time equality: accumulates every XOR into a single
/// byte and tests it against zero at the very end, independent of where
/// (or whether) a mismatch occurs.
pub fn constant_eq(xs: &[u8], ys: &[u8]) -> bool {
    if xs.len() != ys.len() {
        return false;
    }
    let mut acc = 0u8;
    for (x, y) in xs.iter().zip(ys.iter()) {
        acc |= x ^ y;
    }
    acc == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Variant, Version};

    #[test]
    fn constant_eq_basic() {
        assert!(constant_eq(b"abc", b"abc"));
        assert!(!constant_eq(b"abc", b"abd"));
        assert!(!constant_eq(b"abc", b"ab"));
    }

    #[test]
    fn hash_then_verify_round_trip() {
        let params = Params::new_latest(Variant::Argon2i, 2, 32, 1, 32).unwrap();
        let encoded = hash_encoded(params, 1, b"hunter2", b"saltsalt").unwrap();
        assert!(verify_encoded(&encoded, b"hunter2", Variant::Argon2i).is_ok());
        assert_eq!(
            verify_encoded(&encoded, b"wrong", Variant::Argon2i),
            Err(Error::VerifyMismatch)
        );
    }

    #[test]
    fn verify_encoded_rejects_wrong_expected_variant() {
        let params = Params::new_latest(Variant::Argon2i, 2, 32, 1, 32).unwrap();
        let encoded = hash_encoded(params, 1, b"hunter2", b"saltsalt").unwrap();
        assert!(verify_encoded(&encoded, b"hunter2", Variant::Argon2d).is_err());
        assert!(verify_encoded(&encoded, b"hunter2", Variant::Argon2id).is_err());
    }

    #[test]
    fn version_0x10_vector() {
        let params = Params::new(Variant::Argon2i, Version::V0x10, 2, 65536, 1, 32).unwrap();
        let encoded = hash_encoded(params, 1, b"password", b"somesalt").unwrap();
        assert_eq!(
            encoded,
            "$argon2i$m=65536,t=2,p=1$c29tZXNhbHQ$9sTbSlTio3Biev89thdrlKKiCaYsjjYVJxGAL3swxpQ"
        );
    }

    #[test]
    fn version_0x13_vector() {
        let params = Params::new(Variant::Argon2i, Version::V0x13, 2, 65536, 1, 32).unwrap();
        let encoded = hash_encoded(params, 1, b"password", b"somesalt").unwrap();
        assert_eq!(
            encoded,
            "$argon2i$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$wWKIMhR9lyDFvRz9YTZweHKfbftvj+qf+YFY4NeBbtA"
        );
    }
}
