//! The PHC codec: `$argon2<type>$v=<dec>$m=<dec>,t=<dec>,p=<dec>$<salt>$<tag>`.
//!
//! Covers all three types (`d`/`i`/`id`) and the optional `v=` segment
//! (omitted for version `0x10`). Decoding is strict: decimal fields must be
//! minimal (no leading zeros), and the string must end exactly after the
//! tag field.

use crate::error::Error;
use crate::params::{Params, Variant, Version};

const LUT64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn lut(n: u8) -> u8 {
    LUT64[(n & 0x3f) as usize]
}

fn delut(c: u8) -> Option<u8> {
    match c {
        b'+' => Some(62),
        b'/' => Some(63),
        b'A'..=b'Z' => Some(c - b'A'),
        b'a'..=b'z' => Some(c - b'a' + 26),
        b'0'..=b'9' => Some(c - b'0' + 52),
        _ => None,
    }
}

fn quad(n: &[u8; 3]) -> [u8; 4] {
    let b = n[1] >> 4 | n[0] << 4;
    let c = n[2] >> 6 | n[1] << 2;
    [lut(n[0] >> 2), lut(b), lut(c), lut(n[2])]
}

fn triplet(n: &[u8; 4]) -> Option<[u8; 3]> {
    let a = delut(n[0])?;
    let b = delut(n[1])?;
    let c = delut(n[2])?;
    let d = delut(n[3])?;
    Some([a << 2 | b >> 4, b << 4 | c >> 2, c << 6 | d])
}

/// Standard-alphabet base64 without padding.
pub fn base64_no_pad(bytes: &[u8]) -> Vec<u8> {
    let mut rv = Vec::with_capacity(b64_len(bytes.len()));
    let mut chunks = bytes.chunks_exact(3);
    for c in &mut chunks {
        rv.extend_from_slice(&quad(c.try_into().unwrap()));
    }
    let rem = chunks.remainder();
    match rem.len() {
        1 => {
            rv.push(lut(rem[0] >> 2));
            rv.push(lut((rem[0] & 0x03) << 4));
        }
        2 => {
            let full = quad(&[rem[0], rem[1], 0]);
            rv.extend_from_slice(&full[..3]);
        }
        _ => {}
    }
    rv
}

fn debase64_no_pad(bytes: &[u8]) -> Option<Vec<u8>> {
    if !bytes.is_empty() && bytes.len() % 4 == 1 {
        return None;
    }
    let mut rv = Vec::new();
    let mut chunks = bytes.chunks_exact(4);
    for c in &mut chunks {
        rv.extend_from_slice(&triplet(c.try_into().unwrap())?);
    }
    let rem = chunks.remainder();
    match rem.len() {
        2 => {
            let a = delut(rem[0])?;
            let b = delut(rem[1])?;
            rv.push(a << 2 | b >> 4);
        }
        3 => {
            let a = delut(rem[0])?;
            let b = delut(rem[1])?;
            let c = delut(rem[2])?;
            rv.push(a << 2 | b >> 4);
            rv.push(b << 4 | c >> 2);
        }
        0 => {}
        _ => return None,
    }
    Some(rv)
}

/// Base64-no-pad length of an `n`-byte input.
pub fn b64_len(n: usize) -> usize {
    (n * 4 + 2) / 3
}

/// Minimal-decimal-representation length of `n`.
fn dec_len(n: u32) -> usize {
    let mut n = n;
    let mut len = 1;
    while n >= 10 {
        n /= 10;
        len += 1;
    }
    len
}

struct Parser<'a> {
    enc: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn expect(&mut self, exp: &[u8]) -> Result<(), Error> {
        if self.pos + exp.len() > self.enc.len() || &self.enc[self.pos..self.pos + exp.len()] != exp
        {
            Err(Error::DecodingFail)
        } else {
            self.pos += exp.len();
            Ok(())
        }
    }

    fn try_expect(&mut self, exp: &[u8]) -> bool {
        if self.pos + exp.len() <= self.enc.len() && &self.enc[self.pos..self.pos + exp.len()] == exp
        {
            self.pos += exp.len();
            true
        } else {
            false
        }
    }

    /// Consumes the `expected` type's tag, or fails — the string must name
    /// exactly the variant the caller asked to verify against, not merely
    /// one of `d`/`i`/`id`.
    fn expect_variant(&mut self, expected: Variant) -> Result<(), Error> {
        self.expect(expected.as_str().as_bytes())
    }

    /// Reads a minimal (no leading zeros, except a literal "0") decimal
    /// `u32`.
    fn read_u32(&mut self) -> Result<u32, Error> {
        let start = self.pos;
        let mut end = start;
        while end < self.enc.len() && self.enc[end].is_ascii_digit() {
            end += 1;
        }
        if end == start {
            return Err(Error::DecodingFail);
        }
        if self.enc[start] == b'0' && end - start > 1 {
            return Err(Error::DecodingFail);
        }
        let s = std::str::from_utf8(&self.enc[start..end]).map_err(|_| Error::DecodingFail)?;
        let n: u32 = s.parse().map_err(|_| Error::DecodingFail)?;
        self.pos = end;
        Ok(n)
    }

    /// Decodes a base64 field running up to (not including) `stop`, or to
    /// end-of-string if `stop` is `None`.
    fn decode64_till(&mut self, stop: Option<u8>) -> Result<Vec<u8>, Error> {
        let end = match stop {
            None => self.enc.len(),
            Some(c) => self.pos
                + self.enc[self.pos..]
                    .iter()
                    .take_while(|&&k| k != c)
                    .count(),
        };
        let rv = debase64_no_pad(&self.enc[self.pos..end]).ok_or(Error::DecodingFail)?;
        self.pos = end;
        Ok(rv)
    }

    fn at_end(&self) -> bool {
        self.pos == self.enc.len()
    }
}

/// Decodes `$argon2<type>[$v=<dec>]$m=<dec>,t=<dec>,p=<dec>$<salt>$<tag>`,
/// requiring the string to name exactly `expected` — a `$argon2d$...`
/// string handed to `decode(.., Variant::Argon2i)` fails rather than
/// silently decoding as the type it actually names.
///
/// Salt and tag are returned as owned `Vec<u8>`. Callers with a fixed-size
/// destination buffer should use [`decode_into`] instead, which enforces
/// the buffer-capacity check SPEC_FULL.md's codec section requires.
pub fn decode(encoded: &str, expected: Variant) -> Result<(Params, Vec<u8>, Vec<u8>), Error> {
    let mut p = Parser {
        enc: encoded.as_bytes(),
        pos: 0,
    };

    p.expect(b"$argon2")?;
    p.expect_variant(expected)?;
    let variant = expected;

    let version = if p.try_expect(b"$v=") {
        let v = p.read_u32()?;
        Version::from_u32(v).ok_or(Error::DecodingFail)?
    } else {
        Version::V0x10
    };

    p.expect(b"$m=")?;
    let m_cost = p.read_u32()?;
    p.expect(b",t=")?;
    let t_cost = p.read_u32()?;
    p.expect(b",p=")?;
    let lanes = p.read_u32()?;

    p.expect(b"$")?;
    let salt = p.decode64_till(Some(b'$'))?;
    p.expect(b"$")?;
    let tag = p.decode64_till(None)?;

    if !p.at_end() {
        return Err(Error::DecodingFail);
    }

    let params = Params::new(variant, version, t_cost, m_cost, lanes, tag.len() as u32)
        .map_err(|_| Error::DecodingFail)?;
    Ok((params, salt, tag))
}

/// Same grammar as [`decode`], but copies salt and tag into caller-provided
/// buffers instead of allocating. Fails with `Error::DecodingBufferTooSmall`
/// — without touching `salt_out`/`tag_out` — if either decoded field is
/// longer than the buffer meant to receive it.
pub fn decode_into(
    encoded: &str,
    expected: Variant,
    salt_out: &mut [u8],
    tag_out: &mut [u8],
) -> Result<(Params, usize, usize), Error> {
    let (params, salt, tag) = decode(encoded, expected)?;
    if salt.len() > salt_out.len() || tag.len() > tag_out.len() {
        return Err(Error::DecodingBufferTooSmall);
    }
    salt_out[..salt.len()].copy_from_slice(&salt);
    tag_out[..tag.len()].copy_from_slice(&tag);
    Ok((params, salt.len(), tag.len()))
}

/// Encodes `(params, salt, tag)` into the exact PHC wire format.
/// Omits the `v=` segment for version `0x10`.
pub fn encode(params: &Params, salt: &[u8], tag: &[u8]) -> String {
    let mut s = String::with_capacity(encoded_len(params, salt.len(), tag.len()));
    s.push_str("$argon2");
    s.push_str(params.variant().as_str());
    if params.version() != Version::V0x10 {
        s.push_str("$v=");
        s.push_str(&params.version().as_u32().to_string());
    }
    s.push_str("$m=");
    s.push_str(&params.m_cost().to_string());
    s.push_str(",t=");
    s.push_str(&params.t_cost().to_string());
    s.push_str(",p=");
    s.push_str(&params.lanes().to_string());
    s.push('$');
    s.push_str(&String::from_utf8(base64_no_pad(salt)).unwrap());
    s.push('$');
    s.push_str(&String::from_utf8(base64_no_pad(tag)).unwrap());
    s
}

/// Computes the encoded length without actually encoding.
pub fn encoded_len(params: &Params, saltlen: usize, hashlen: usize) -> usize {
    let fixed = "$argon2$m=,t=,p=$$".len();
    let version_part = if params.version() == Version::V0x10 {
        0
    } else {
        "$v=".len() + dec_len(params.version().as_u32())
    };
    fixed
        + params.variant().as_str().len()
        + dec_len(params.t_cost())
        + dec_len(params.m_cost())
        + dec_len(params.lanes())
        + version_part
        + b64_len(saltlen)
        + b64_len(hashlen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Variant, Version};

    #[test]
    fn base64_round_trips() {
        let cases: &[&[u8]] = &[
            b"any carnal pleasure.",
            b"any carnal pleasure",
            b"any carnal pleasur",
            b"any carnal pleasu",
            b"any carnal pleas",
        ];
        for &c in cases {
            let enc = base64_no_pad(c);
            assert_eq!(debase64_no_pad(&enc).unwrap(), c);
        }
    }

    #[test]
    fn base64_matches_known_vectors() {
        assert_eq!(
            &base64_no_pad(b"any carnal pleasure.")[..],
            b"YW55IGNhcm5hbCBwbGVhc3VyZS4"
        );
        assert_eq!(
            &base64_no_pad(b"any carnal pleasure")[..],
            b"YW55IGNhcm5hbCBwbGVhc3VyZQ"
        );
    }

    #[test]
    fn decode_reads_the_type_tag() {
        let encoded = "$argon2d$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$wWKIMhR9lyDFvRz9YTZweHKfbftvj+qf+YFY4NeBbtA";
        let (params, _, _) = decode(encoded, Variant::Argon2d).unwrap();
        assert_eq!(params.variant(), Variant::Argon2d);

        let encoded_id = "$argon2id$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$wWKIMhR9lyDFvRz9YTZweHKfbftvj+qf+YFY4NeBbtA";
        let (params_id, _, _) = decode(encoded_id, Variant::Argon2id).unwrap();
        assert_eq!(params_id.variant(), Variant::Argon2id);
    }

    #[test]
    fn decode_rejects_type_mismatch() {
        let encoded = "$argon2d$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$wWKIMhR9lyDFvRz9YTZweHKfbftvj+qf+YFY4NeBbtA";
        assert!(decode(encoded, Variant::Argon2i).is_err());
        assert!(decode(encoded, Variant::Argon2id).is_err());

        let encoded_id = "$argon2id$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$wWKIMhR9lyDFvRz9YTZweHKfbftvj+qf+YFY4NeBbtA";
        assert!(decode(encoded_id, Variant::Argon2i).is_err());
        assert!(decode(encoded_id, Variant::Argon2d).is_err());
    }

    #[test]
    fn decode_rejects_leading_zero() {
        assert!(decode(
            "$argon2i$m=065536,t=2,p=1$c29tZXNhbHQ$wWKIMhR9lyDFvRz9YTZweHKfbftvj+qf+YFY4NeBbtA",
            Variant::Argon2i
        )
        .is_err());
    }

    #[test]
    fn v0x10_omits_version_field() {
        let params = Params::new(Variant::Argon2i, Version::V0x10, 2, 65536, 1, 32).unwrap();
        let enc = encode(&params, b"somesalt", &[0u8; 32]);
        assert!(enc.starts_with("$argon2i$m=65536,t=2,p=1$"));
        assert!(!enc.contains("v="));
        assert_eq!(enc.len(), encoded_len(&params, 8, 32));
    }

    #[test]
    fn encode_decode_round_trip_rfc_vector() {
        let encoded = "$argon2i$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$wWKIMhR9lyDFvRz9YTZweHKfbftvj+qf+YFY4NeBbtA";
        let (params, salt, tag) = decode(encoded, Variant::Argon2i).unwrap();
        let re = encode(&params, &salt, &tag);
        assert_eq!(re, encoded);
    }

    #[test]
    fn encoded_len_matches_actual() {
        let params = Params::new(Variant::Argon2id, Version::V0x13, 3, 32, 4, 32).unwrap();
        let salt = [2u8; 16];
        let tag = [0u8; 32];
        let enc = encode(&params, &salt, &tag);
        assert_eq!(enc.len(), encoded_len(&params, salt.len(), tag.len()));
    }

    #[test]
    fn decode_into_copies_caller_buffers() {
        let encoded = "$argon2i$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$wWKIMhR9lyDFvRz9YTZweHKfbftvj+qf+YFY4NeBbtA";
        let mut salt_buf = [0u8; 8];
        let mut tag_buf = [0u8; 32];
        let (params, saltlen, taglen) =
            decode_into(encoded, Variant::Argon2i, &mut salt_buf, &mut tag_buf).unwrap();
        assert_eq!(params.variant(), Variant::Argon2i);
        assert_eq!(saltlen, 8);
        assert_eq!(taglen, 32);
        assert_eq!(&salt_buf[..saltlen], b"somesalt");
    }

    #[test]
    fn decode_into_rejects_buffer_too_small() {
        let encoded = "$argon2i$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$wWKIMhR9lyDFvRz9YTZweHKfbftvj+qf+YFY4NeBbtA";
        let mut salt_buf = [0u8; 8];
        let mut tag_buf = [0u8; 16]; // too small for the 32-byte tag
        assert_eq!(
            decode_into(encoded, Variant::Argon2i, &mut salt_buf, &mut tag_buf),
            Err(Error::DecodingBufferTooSmall)
        );
    }
}
