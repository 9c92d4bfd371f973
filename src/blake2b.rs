//! A from-scratch BLAKE2b (RFC 7693) implementation.
//!
//! Argon2's own block-mixing permutation (see [`crate::compression`]) reuses
//! the same quartet-rotation structure as BLAKE2b's compression function, just
//! with an extra multiplication mixed in. Keeping both built on the same IV
//! and rotation constants, in one place, is the only way to be sure the two
//! don't drift apart.

use std::mem;

pub const OUTBYTES: usize = 64;
pub const BLOCKBYTES: usize = 128;
const KEYBYTES: usize = 64;

const IV: [u64; 8] = [
    0x6a09e667f3bcc908,
    0xbb67ae8584caa73b,
    0x3c6ef372fe94f82b,
    0xa54ff53a5f1d36f1,
    0x510e527fade682d1,
    0x9b05688c2b3e6c1f,
    0x1f83d9abfb41bd6b,
    0x5be0cd19137e2179,
];

#[cfg_attr(rustfmt, rustfmt_skip)]
const SIGMA: [[usize; 16]; 12] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
];

macro_rules! g_mix {
    ($a: expr, $b: expr, $c: expr, $d: expr, $x: expr, $y: expr) => {
        $a = $a.wrapping_add($b).wrapping_add($x);
        $d = ($d ^ $a).rotate_right(32);
        $c = $c.wrapping_add($d);
        $b = ($b ^ $c).rotate_right(24);
        $a = $a.wrapping_add($b).wrapping_add($y);
        $d = ($d ^ $a).rotate_right(16);
        $c = $c.wrapping_add($d);
        $b = ($b ^ $c).rotate_right(63);
    };
}

fn compress(h: &mut [u64; 8], block: &[u8; BLOCKBYTES], t: [u64; 2], f: [u64; 2]) {
    let mut m = [0u64; 16];
    for (word, chunk) in m.iter_mut().zip(block.chunks_exact(8)) {
        *word = u64::from_le_bytes(chunk.try_into().unwrap());
    }

    let mut v = [0u64; 16];
    v[..8].copy_from_slice(h);
    v[8..].copy_from_slice(&IV);
    v[12] ^= t[0];
    v[13] ^= t[1];
    v[14] ^= f[0];
    v[15] ^= f[1];

    for round in 0..12 {
        let s = &SIGMA[round];
        g_mix!(v[0], v[4], v[8], v[12], m[s[0]], m[s[1]]);
        g_mix!(v[1], v[5], v[9], v[13], m[s[2]], m[s[3]]);
        g_mix!(v[2], v[6], v[10], v[14], m[s[4]], m[s[5]]);
        g_mix!(v[3], v[7], v[11], v[15], m[s[6]], m[s[7]]);
        g_mix!(v[0], v[5], v[10], v[15], m[s[8]], m[s[9]]);
        g_mix!(v[1], v[6], v[11], v[12], m[s[10]], m[s[11]]);
        g_mix!(v[2], v[7], v[8], v[13], m[s[12]], m[s[13]]);
        g_mix!(v[3], v[4], v[9], v[14], m[s[14]], m[s[15]]);
    }

    for i in 0..8 {
        h[i] ^= v[i] ^ v[i + 8];
    }
}

/// Streaming BLAKE2b state, unkeyed or keyed, output length 1..=64.
pub struct Blake2b {
    h: [u64; 8],
    t: [u64; 2],
    buf: [u8; BLOCKBYTES],
    buflen: usize,
    outlen: usize,
}

impl Blake2b {
    pub fn new(outlen: usize) -> Self {
        Self::with_key(outlen, &[])
    }

    pub fn with_key(outlen: usize, key: &[u8]) -> Self {
        assert!(outlen >= 1 && outlen <= OUTBYTES);
        assert!(key.len() <= KEYBYTES);

        let mut param_block = [0u8; BLOCKBYTES / 2];
        param_block[0] = outlen as u8;
        param_block[1] = key.len() as u8;
        param_block[2] = 1; // fanout
        param_block[3] = 1; // depth

        let mut h = IV;
        for i in 0..8 {
            let word = u64::from_le_bytes(
                param_block[i * 8..i * 8 + 8].try_into().unwrap(),
            );
            h[i] ^= word;
        }

        let mut state = Blake2b {
            h,
            t: [0, 0],
            buf: [0; BLOCKBYTES],
            buflen: 0,
            outlen,
        };

        if !key.is_empty() {
            let mut block = [0u8; BLOCKBYTES];
            block[..key.len()].copy_from_slice(key);
            state.update(&block);
        }

        state
    }

    fn increment_counter(&mut self, inc: u64) {
        let (sum, overflow) = self.t[0].overflowing_add(inc);
        self.t[0] = sum;
        if overflow {
            self.t[1] += 1;
        }
    }

    pub fn update(&mut self, mut input: &[u8]) {
        if input.is_empty() {
            return;
        }

        let left = self.buflen;
        let fill = BLOCKBYTES - left;

        if input.len() > fill {
            self.buf[left..].copy_from_slice(&input[..fill]);
            self.increment_counter(BLOCKBYTES as u64);
            let block = self.buf;
            compress(&mut self.h, &block, self.t, [0, 0]);
            self.buflen = 0;
            input = &input[fill..];

            while input.len() > BLOCKBYTES {
                self.increment_counter(BLOCKBYTES as u64);
                let block: [u8; BLOCKBYTES] = input[..BLOCKBYTES].try_into().unwrap();
                compress(&mut self.h, &block, self.t, [0, 0]);
                input = &input[BLOCKBYTES..];
            }
        }

        self.buf[self.buflen..self.buflen + input.len()].copy_from_slice(input);
        self.buflen += input.len();
    }

    pub fn finalize(mut self) -> [u8; OUTBYTES] {
        self.increment_counter(self.buflen as u64);
        for b in &mut self.buf[self.buflen..] {
            *b = 0;
        }
        let block = self.buf;
        compress(&mut self.h, &block, self.t, [u64::MAX, 0]);

        let mut out = [0u8; OUTBYTES];
        for (chunk, word) in out.chunks_mut(8).zip(self.h.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }

    /// Finalizes into exactly `self.outlen` bytes.
    pub fn finalize_into(self, out: &mut [u8]) {
        let outlen = self.outlen;
        debug_assert_eq!(out.len(), outlen);
        let full = self.finalize();
        out.copy_from_slice(&full[..outlen]);
    }
}

fn hash(outlen: usize, chunks: &[&[u8]]) -> [u8; OUTBYTES] {
    let mut b = Blake2b::new(outlen);
    for chunk in chunks {
        b.update(chunk);
    }
    b.finalize()
}

/// Convenience one-shot hash: feed a list of byte slices, get `outlen`
/// bytes back (`outlen <= 64`).
pub fn hash_into(out: &mut [u8], chunks: &[&[u8]]) {
    assert!(out.len() <= OUTBYTES);
    let mut b = Blake2b::new(out.len());
    for chunk in chunks {
        b.update(chunk);
    }
    let digest = b.finalize();
    out.copy_from_slice(&digest[..out.len()]);
}

/// BLAKE2b's variable-length extension `H'`, used by Argon2 to expand an
/// input into 1024-byte blocks and final tags of arbitrary length.
///
/// `outlen` may exceed 64 bytes: for those the extension chains BLAKE2b-64
/// calls two half-digests at a time (see RFC 9106 §3.3).
pub fn h_prime(out: &mut [u8], input: &[u8]) {
    let outlen_le = (out.len() as u32).to_le_bytes();

    if out.len() <= OUTBYTES {
        hash_into(out, &[&outlen_le, input]);
        return;
    }

    let mut v = hash(OUTBYTES, &[&outlen_le, input]);
    out[..32].copy_from_slice(&v[..32]);
    let mut written = 32;

    while out.len() - written > OUTBYTES {
        v = hash(OUTBYTES, &[&v]);
        out[written..written + 32].copy_from_slice(&v[..32]);
        written += 32;
    }

    let remaining = out.len() - written;
    hash_into(&mut out[written..written + remaining], &[&v]);
}

#[allow(dead_code)]
fn _assert_send_sync() {
    fn assert<T: Send + Sync>() {}
    assert::<Blake2b>();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    fn unhex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn empty_input_64() {
        let digest = hash(64, &[]);
        assert_eq!(
            hex(&digest),
            "786a02f742015903c6c6fd852552d272912f4740e15847618a86e217f71f5419\
             d25e1031afee585313896444934eb04b903a685b1448b755d56f701afe9be8"
        );
    }

    #[test]
    fn abc_64() {
        let digest = hash(64, &[b"abc"]);
        assert_eq!(
            hex(&digest),
            "ba80a53f981c4d0d6a2797b69f12f6e94c212f14685ac4b74b12bb6fdbffa2d17\
             d87c5392aab792dc252d5de4533cc9518d38aa8dbf1925ab92386edd4009923"
        );
    }

    #[test]
    fn keyed_hash_is_deterministic_and_key_dependent() {
        let key_a = unhex(
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f\
             202122232425262728292a2b2c2d2e2f303132333435363738393a3b3c3d3e3f",
        );
        let mut key_b = key_a.clone();
        key_b[0] ^= 1;

        let digest_a1 = {
            let mut b = Blake2b::with_key(64, &key_a);
            b.update(&[0u8]);
            b.finalize()
        };
        let digest_a2 = {
            let mut b = Blake2b::with_key(64, &key_a);
            b.update(&[0u8]);
            b.finalize()
        };
        let digest_b = {
            let mut b = Blake2b::with_key(64, &key_b);
            b.update(&[0u8]);
            b.finalize()
        };

        assert_eq!(digest_a1, digest_a2);
        assert_ne!(digest_a1, digest_b);
        assert_ne!(digest_a1, hash(64, &[&[0u8]]));
    }

    #[test]
    fn h_prime_matches_plain_hash_when_short() {
        let mut out = [0u8; 32];
        h_prime(&mut out, b"hello world");
        let mut expected = [0u8; 32];
        hash_into(&mut expected, &[&4u32.to_le_bytes(), b"hello world"]);
        assert_eq!(out, expected);
    }

    #[test]
    fn h_prime_long_output_is_deterministic() {
        let mut a = [0u8; 1024];
        let mut b = [0u8; 1024];
        h_prime(&mut a, b"same input");
        h_prime(&mut b, b"same input");
        assert_eq!(a, b);
        assert_ne!(a, [0u8; 1024]);
    }
}
