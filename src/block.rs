//! The 1024-byte Argon2 memory block and the lane×length memory matrix.
//!
//! Storage is plain `[u64; 128]` rather than `repr(simd)` lanes: nightly-only
//! compiler internals aren't worth it when a scalar loop already
//! autovectorizes fine on a release build.

use std::ops::{BitXorAssign, Index, IndexMut};
use std::sync::atomic::{AtomicBool, Ordering};
use zeroize::Zeroize;

pub const BLOCK_BYTES: usize = 1024;
pub const BLOCK_WORDS: usize = BLOCK_BYTES / 8;

/// Process-wide switch for the internal-scratch wiping this crate performs
/// by default (matrix blocks, prehash, final-tag scratch). Enabled unless
/// [`set_wipe_enabled`] has been called with `false`.
static WIPE_ENABLED: AtomicBool = AtomicBool::new(true);

/// Enables or disables zeroization of internal scratch buffers (the memory
/// matrix, the prehash, and the finalizer's scratch block) before they're
/// released. Wiping is on by default; callers who manage their own process
/// hygiene (e.g. a short-lived sandboxed worker) may disable it to skip the
/// extra writes.
pub fn set_wipe_enabled(enabled: bool) {
    WIPE_ENABLED.store(enabled, Ordering::Relaxed);
}

pub(crate) fn wipe_enabled() -> bool {
    WIPE_ENABLED.load(Ordering::Relaxed)
}

#[derive(Clone)]
pub struct Block(pub [u64; BLOCK_WORDS]);

impl Block {
    pub fn zero() -> Self {
        Block([0u64; BLOCK_WORDS])
    }

    pub fn load_le(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), BLOCK_BYTES);
        let mut words = [0u64; BLOCK_WORDS];
        for (w, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
            *w = u64::from_le_bytes(chunk.try_into().unwrap());
        }
        Block(words)
    }

    pub fn store_le(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), BLOCK_BYTES);
        for (chunk, w) in out.chunks_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&w.to_le_bytes());
        }
    }

    pub fn iter(&self) -> std::slice::Iter<u64> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<u64> {
        self.0.iter_mut()
    }
}

impl Index<usize> for Block {
    type Output = u64;
    #[inline(always)]
    fn index(&self, idx: usize) -> &u64 {
        &self.0[idx]
    }
}

impl IndexMut<usize> for Block {
    #[inline(always)]
    fn index_mut(&mut self, idx: usize) -> &mut u64 {
        &mut self.0[idx]
    }
}

impl<'a> BitXorAssign<&'a Block> for Block {
    #[inline(always)]
    fn bitxor_assign(&mut self, rhs: &Block) {
        for (d, r) in self.0.iter_mut().zip(rhs.0.iter()) {
            *d ^= *r;
        }
    }
}

impl Zeroize for Block {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        if wipe_enabled() {
            self.zeroize();
        }
    }
}

/// The lane × lane-length memory matrix the whole fill operates over.
///
/// Row-major storage. `get3` hands out one mutable write target plus two
/// immutable read references without tripping the borrow checker (the fill
/// schedule guarantees the three indices are always distinct), and `Drop`
/// wipes every block before the backing allocation is released.
pub struct Matrix {
    blocks: Vec<Block>,
    lanes: u32,
    lanelen: u32,
}

impl Matrix {
    pub fn new(lanes: u32, lanelen: u32) -> Self {
        debug_assert!(lanes > 0 && lanelen > 0);
        Matrix {
            blocks: (0..(lanes as u64 * lanelen as u64)).map(|_| Block::zero()).collect(),
            lanes,
            lanelen,
        }
    }

    pub fn lanes(&self) -> u32 {
        self.lanes
    }

    pub fn lanelen(&self) -> u32 {
        self.lanelen
    }

    pub fn len(&self) -> u32 {
        self.lanes * self.lanelen
    }

    #[inline(always)]
    fn flat(&self, row: u32, col: u32) -> usize {
        debug_assert!(row < self.lanes && col < self.lanelen);
        row as usize * self.lanelen as usize + col as usize
    }

    /// Borrow one write target and two read targets simultaneously. The
    /// fill schedule guarantees `wr` is never equal to `rd0` or `rd1`.
    pub fn get3(
        &mut self,
        wr: (u32, u32),
        rd0: (u32, u32),
        rd1: (u32, u32),
    ) -> (&mut Block, &Block, &Block) {
        let (wr, rd0, rd1) = (self.flat(wr.0, wr.1), self.flat(rd0.0, rd0.1), self.flat(rd1.0, rd1.1));
        assert!(wr != rd0 && wr != rd1);
        let p: *mut Vec<Block> = &mut self.blocks;
        unsafe { (&mut (*p)[wr], &(*p)[rd0], &(*p)[rd1]) }
    }

    /// One mutable reference to the whole matrix with an unbounded
    /// lifetime, handed to a lane worker that the caller has proven (via
    /// the slice barrier) will never race with any other live reference.
    ///
    /// # Safety
    /// Callers must guarantee that concurrently live `mut_ref()`s touch
    /// disjoint lanes' current segments only, and that all of them are
    /// joined before the matrix (or any other reference to it) is used
    /// again.
    pub unsafe fn mut_ref<'a>(&mut self) -> &'a mut Self {
        &mut *(self as *mut Self)
    }

    pub fn xor_column(&self, col: u32) -> Block {
        debug_assert!(col < self.lanelen);
        let mut rv = self[(0, col)].clone();
        for row in 1..self.lanes {
            rv ^= &self[(row, col)];
        }
        rv
    }
}

impl Index<(u32, u32)> for Matrix {
    type Output = Block;
    #[inline(always)]
    fn index(&self, (row, col): (u32, u32)) -> &Block {
        &self.blocks[self.flat(row, col)]
    }
}

impl IndexMut<(u32, u32)> for Matrix {
    #[inline(always)]
    fn index_mut(&mut self, (row, col): (u32, u32)) -> &mut Block {
        let idx = self.flat(row, col);
        &mut self.blocks[idx]
    }
}
