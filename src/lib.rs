//! A pure-Rust implementation of the Argon2 memory-hard password-hashing
//! function (`d`, `i`, and `id`, versions `0x10` and `0x13`), built on a
//! from-scratch BLAKE2b.
//!
//! Fills a large working matrix under a strict reference-index schedule,
//! using lane-parallel workers synchronized at slice boundaries, then
//! extracts a tag. Also speaks the PHC encoded-string format. See
//! `DESIGN.md` for how the pieces fit together.
//!
//! ```
//! use argon2rs::{Context, Params, Variant};
//!
//! let params = Params::new_latest(Variant::Argon2i, 2, 65536, 1, 32).unwrap();
//! let mut pwd = b"hunter2".to_vec();
//! let mut out = vec![0u8; 32];
//! Context::new(params)
//!     .hash(&mut out, &mut pwd, b"somesaltsomesalt", &mut [], &[])
//!     .unwrap();
//! ```

mod blake2b;
mod block;
mod compression;
pub mod encoding;
pub mod error;
mod fill;
mod finalize;
mod index;
mod instance;
pub mod params;
pub mod verify;
mod workers;

pub use crate::block::set_wipe_enabled;
pub use crate::encoding::{decode, decode_into, encode};
pub use crate::error::Error;
pub use crate::instance::{DefaultAllocator, MemoryAllocator};
pub use crate::params::{Params, Variant, Version};
pub use crate::verify::{constant_eq, hash_encoded, verify_encoded};

use crate::block::BLOCK_BYTES;
use crate::fill::fill_segment;
use crate::finalize::finalize;
use crate::instance::{initial_hash, Instance};
use crate::workers::Workers;

/// Parameters matching the reference implementation's `run.c` defaults:
/// `t_cost=3`, `m_cost=4096` KiB, `lanes=1`, `outlen=32`.
pub mod defaults {
    pub const T_COST: u32 = 3;
    pub const M_COST: u32 = 4096;
    pub const LANES: u32 = 1;
    pub const OUTLEN: usize = 32;
}

/// A single hash invocation's full configuration: validated [`Params`],
/// a thread budget, and the password/secret wipe flags.
///
/// Buffers are passed directly to [`Context::hash`] rather than stored on
/// `Context` itself, since a self-referential "owns its borrowed buffers"
/// struct is awkward for what is otherwise a one-shot call.
#[derive(Debug, Clone)]
pub struct Context {
    params: Params,
    threads: u32,
    clear_password: bool,
    clear_secret: bool,
}

impl Context {
    /// Builds a context with `threads` defaulted to `params.lanes()`
    /// (maximum parallelism) and wiping disabled.
    pub fn new(params: Params) -> Context {
        let threads = params.lanes();
        Context {
            params,
            threads,
            clear_password: false,
            clear_secret: false,
        }
    }

    /// Caps in-flight lane workers at `threads`. Must be in `[1, 2^24 - 1]`.
    pub fn with_threads(mut self, threads: u32) -> Result<Context, Error> {
        if threads < 1 {
            return Err(Error::ThreadsTooFew);
        }
        if threads > 0x00ff_ffff {
            return Err(Error::ThreadsTooMany);
        }
        self.threads = threads;
        Ok(self)
    }

    /// If set, `pwd` is zeroed in place once it has been absorbed into the
    /// initial hash.
    pub fn clear_password(mut self, yes: bool) -> Context {
        self.clear_password = yes;
        self
    }

    /// If set, `secret` is zeroed in place once it has been absorbed into
    /// the initial hash.
    pub fn clear_secret(mut self, yes: bool) -> Context {
        self.clear_secret = yes;
        self
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn threads(&self) -> u32 {
        self.threads
    }

    /// Runs the full Argon2 pipeline: validates the buffer/salt shape,
    /// allocates the memory matrix, fills it under the lane/slice schedule,
    /// and writes the tag into `out`.
    ///
    /// `out.len()` must equal `self.params.outlen()` — the two are kept in
    /// lockstep deliberately, since the PHC codec and the initial hash
    /// both commit to `outlen` as part of the parameter block.
    pub fn hash(
        &self,
        out: &mut [u8],
        pwd: &mut [u8],
        salt: &[u8],
        secret: &mut [u8],
        ad: &[u8],
    ) -> Result<(), Error> {
        if out.len() != self.params.outlen() as usize {
            return Err(Error::OutputTooShort);
        }
        if salt.len() < 8 {
            return Err(Error::SaltTooShort);
        }

        let mut h0 = initial_hash(&self.params, pwd, salt, secret, ad);
        if self.clear_password {
            zeroize_slice(pwd);
        }
        if self.clear_secret {
            zeroize_slice(secret);
        }

        let mut instance = Instance::new(self.params, &DefaultAllocator)?;
        instance.fill_first_blocks(&h0);
        if block::wipe_enabled() {
            zeroize_slice(&mut h0);
        }

        let workers = Workers::new(self.params.lanes(), self.threads);
        let run_params = instance.params;
        for pass in 0..run_params.t_cost() {
            for slice in 0..params::SLICES_PER_LANE {
                workers.map(&mut instance.memory, move |memory, lane| {
                    fill_segment(&run_params, memory, pass, lane, slice)
                })?;
                log::trace!(
                    "argon2: pass {} slice {} done ({} lanes)",
                    pass,
                    slice,
                    run_params.lanes()
                );
            }
            log::debug!("argon2: pass {} of {} done", pass + 1, run_params.t_cost());
        }

        finalize(&instance.memory, out);
        Ok(())
    }
}

fn zeroize_slice(buf: &mut [u8]) {
    use zeroize::Zeroize;
    buf.zeroize();
}

/// Convenience wrapper around Argon2i for the common password/salt case.
pub fn argon2i_simple(password: &str, salt: &str) -> Result<[u8; defaults::OUTLEN], Error> {
    simple(Variant::Argon2i, password, salt)
}

/// Convenience wrapper around Argon2d for the common password/salt case.
pub fn argon2d_simple(password: &str, salt: &str) -> Result<[u8; defaults::OUTLEN], Error> {
    simple(Variant::Argon2d, password, salt)
}

/// Convenience wrapper around Argon2id for the common password/salt case.
pub fn argon2id_simple(password: &str, salt: &str) -> Result<[u8; defaults::OUTLEN], Error> {
    simple(Variant::Argon2id, password, salt)
}

fn simple(variant: Variant, password: &str, salt: &str) -> Result<[u8; defaults::OUTLEN], Error> {
    let params = Params::new_latest(
        variant,
        defaults::T_COST,
        defaults::M_COST,
        defaults::LANES,
        defaults::OUTLEN as u32,
    )?;
    let mut out = [0u8; defaults::OUTLEN];
    let mut pwd = password.as_bytes().to_vec();
    Context::new(params).hash(&mut out, &mut pwd, salt.as_bytes(), &mut [], &[])?;
    Ok(out)
}

#[allow(dead_code)]
fn _assert_sizes() {
    debug_assert_eq!(BLOCK_BYTES, 1024);
}
