//! Memory initializer: the pre-hashing digest `H0` and the first two
//! blocks of every lane, plus the `Instance`/allocator capability that
//! owns the memory matrix for the run.

use crate::blake2b::{h_prime, Blake2b};
use crate::block::{Block, Matrix, BLOCK_BYTES};
use crate::error::Error;
use crate::params::Params;

const H0_LEN: usize = 64;

fn as32le(n: u32) -> [u8; 4] {
    n.to_le_bytes()
}

fn len32(bytes: &[u8]) -> [u8; 4] {
    as32le(bytes.len() as u32)
}

/// Absorbs `(lanes, outlen, m_cost, t_cost, version, type, pwd, salt,
/// secret, ad)` into BLAKE2b-64 in that order. Each length-prefixed field
/// absorbs only its length word when the buffer is empty.
pub fn initial_hash(
    params: &Params,
    pwd: &[u8],
    salt: &[u8],
    secret: &[u8],
    ad: &[u8],
) -> [u8; H0_LEN] {
    let mut b = Blake2b::new(H0_LEN);
    b.update(&as32le(params.lanes()));
    b.update(&as32le(params.outlen()));
    b.update(&as32le(params.m_cost()));
    b.update(&as32le(params.t_cost()));
    b.update(&as32le(params.version().as_u32()));
    b.update(&as32le(params.variant().as_u32()));

    b.update(&len32(pwd));
    b.update(pwd);
    b.update(&len32(salt));
    b.update(salt);
    b.update(&len32(secret));
    b.update(secret);
    b.update(&len32(ad));
    b.update(ad);

    let mut out = [0u8; H0_LEN];
    b.finalize_into(&mut out);
    out
}

/// Allocator capability: obtains the backing store for the memory matrix.
/// The default implementation goes through the global allocator via
/// `Matrix::new`; a caller with its own arena can implement this trait
/// instead.
pub trait MemoryAllocator {
    fn alloc(&self, lanes: u32, lanelen: u32) -> Result<Matrix, Error>;
}

/// The default allocator: the global allocator, with a `num * size`
/// overflow check before committing to the allocation.
pub struct DefaultAllocator;

impl MemoryAllocator for DefaultAllocator {
    fn alloc(&self, lanes: u32, lanelen: u32) -> Result<Matrix, Error> {
        (lanes as u64)
            .checked_mul(lanelen as u64)
            .and_then(|blocks| blocks.checked_mul(BLOCK_BYTES as u64))
            .ok_or(Error::MemoryAllocationError)?;
        Ok(Matrix::new(lanes, lanelen))
    }
}

/// The derived parameters plus the owned memory matrix for one hash run.
/// Carries no back-pointer to its caller; the finalizer is handed the
/// output slice directly instead.
pub struct Instance {
    pub params: Params,
    pub memory: Matrix,
}

impl Instance {
    pub fn new(params: Params, allocator: &dyn MemoryAllocator) -> Result<Instance, Error> {
        let memory = allocator.alloc(params.lanes(), params.lanelen())?;
        Ok(Instance { params, memory })
    }

    /// For every lane, the first two blocks are `H'_1024(H0 || LE32(i) ||
    /// LE32(lane))` for `i` in `{0, 1}`.
    pub fn fill_first_blocks(&mut self, h0: &[u8; H0_LEN]) {
        let mut seed = [0u8; H0_LEN + 8];
        seed[..H0_LEN].copy_from_slice(h0);

        for lane in 0..self.params.lanes() {
            seed[H0_LEN..H0_LEN + 4].copy_from_slice(&as32le(0));
            seed[H0_LEN + 4..].copy_from_slice(&as32le(lane));
            let mut bytes = [0u8; BLOCK_BYTES];
            h_prime(&mut bytes, &seed);
            self.memory[(lane, 0)] = Block::load_le(&bytes);

            seed[H0_LEN..H0_LEN + 4].copy_from_slice(&as32le(1));
            h_prime(&mut bytes, &seed);
            self.memory[(lane, 1)] = Block::load_le(&bytes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Variant, Version};

    #[test]
    fn initial_hash_is_deterministic_and_input_dependent() {
        let params = Params::new(Variant::Argon2i, Version::V0x13, 3, 32, 1, 32).unwrap();
        let a = initial_hash(&params, b"pwd", b"saltsalt", b"", b"");
        let b = initial_hash(&params, b"pwd", b"saltsalt", b"", b"");
        let c = initial_hash(&params, b"pwd2", b"saltsalt", b"", b"");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn first_two_blocks_per_lane_differ() {
        let params = Params::new(Variant::Argon2i, Version::V0x13, 3, 32, 2, 32).unwrap();
        let h0 = initial_hash(&params, b"pwd", b"saltsalt", b"", b"");
        let mut inst = Instance::new(params, &DefaultAllocator).unwrap();
        inst.fill_first_blocks(&h0);
        assert_ne!(inst.memory[(0, 0)].iter().collect::<Vec<_>>(),
                   inst.memory[(0, 1)].iter().collect::<Vec<_>>());
        assert_ne!(inst.memory[(0, 0)].iter().collect::<Vec<_>>(),
                   inst.memory[(1, 0)].iter().collect::<Vec<_>>());
    }
}
