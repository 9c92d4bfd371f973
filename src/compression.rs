//! The Argon2 compression function `G` and its block permutation `P`.
//!
//! `P` reuses BLAKE2b's rotate-and-add quartet (see [`crate::blake2b`]) but
//! splices a 32×32→64 multiplication into both additions of each `G` call —
//! the one change that turns a BLAKE2b round into the Argon2 block mixer.
//! Kept as a single scalar implementation rather than also carrying a
//! SIMD copy: the nightly intrinsics it would need aren't worth it on a
//! published crate.

use crate::block::Block;

macro_rules! g_argon2 {
    ($a: expr, $b: expr, $c: expr, $d: expr) => {
        $a = $a.wrapping_add($b).wrapping_add(lower_mult($a, $b));
        $d = ($d ^ $a).rotate_right(32);
        $c = $c.wrapping_add($d).wrapping_add(lower_mult($c, $d));
        $b = ($b ^ $c).rotate_right(24);
        $a = $a.wrapping_add($b).wrapping_add(lower_mult($a, $b));
        $d = ($d ^ $a).rotate_right(16);
        $c = $c.wrapping_add($d).wrapping_add(lower_mult($c, $d));
        $b = ($b ^ $c).rotate_right(63);
    };
}

macro_rules! permute16 {
    ($v0: expr, $v1: expr, $v2: expr, $v3: expr,
     $v4: expr, $v5: expr, $v6: expr, $v7: expr,
     $v8: expr, $v9: expr, $v10: expr, $v11: expr,
     $v12: expr, $v13: expr, $v14: expr, $v15: expr) => {
        g_argon2!($v0, $v4, $v8, $v12);
        g_argon2!($v1, $v5, $v9, $v13);
        g_argon2!($v2, $v6, $v10, $v14);
        g_argon2!($v3, $v7, $v11, $v15);
        g_argon2!($v0, $v5, $v10, $v15);
        g_argon2!($v1, $v6, $v11, $v12);
        g_argon2!($v2, $v7, $v8, $v13);
        g_argon2!($v3, $v4, $v9, $v14);
    };
}

#[inline(always)]
fn lower_mult(a: u64, b: u64) -> u64 {
    let lo = |k: u64| k & 0xffff_ffff;
    lo(a).wrapping_mul(lo(b)).wrapping_mul(2)
}

#[cfg_attr(rustfmt, rustfmt_skip)]
fn permute_row(row: usize, b: &mut Block) {
    permute16!(
        b[16 * row], b[16 * row + 1], b[16 * row + 2], b[16 * row + 3],
        b[16 * row + 4], b[16 * row + 5], b[16 * row + 6], b[16 * row + 7],
        b[16 * row + 8], b[16 * row + 9], b[16 * row + 10], b[16 * row + 11],
        b[16 * row + 12], b[16 * row + 13], b[16 * row + 14], b[16 * row + 15]
    );
}

#[cfg_attr(rustfmt, rustfmt_skip)]
fn permute_col(col: usize, b: &mut Block) {
    permute16!(
        b[2 * col], b[2 * col + 1],
        b[2 * col + 16], b[2 * col + 17],
        b[2 * col + 32], b[2 * col + 33],
        b[2 * col + 48], b[2 * col + 49],
        b[2 * col + 64], b[2 * col + 65],
        b[2 * col + 80], b[2 * col + 81],
        b[2 * col + 96], b[2 * col + 97],
        b[2 * col + 112], b[2 * col + 113]
    );
}

fn permute(b: &mut Block) {
    for row in 0..8 {
        permute_row(row, b);
    }
    for col in 0..8 {
        permute_col(col, b);
    }
}

/// `G(prev, ref, dest, with_xor)`: `dest ← (with_xor ? dest : 0) XOR R XOR
/// P(P(R))` where `R = prev XOR ref`.
pub fn g(dest: &mut Block, prev: &Block, refb: &Block, with_xor: bool) {
    let mut r = Block::zero();
    for (d, (p, q)) in r.iter_mut().zip(prev.iter().zip(refb.iter())) {
        *d = p ^ q;
    }

    let mut z = r.clone();
    permute(&mut z);

    for (d, (rr, zz)) in dest.iter_mut().zip(r.iter().zip(z.iter())) {
        let base = if with_xor { *d } else { 0 };
        *d = base ^ rr ^ zz;
    }
}

/// `G_2(src) = G(0, G(0, src))`, used only to advance the Argon2i/Argon2id
/// address-block stream.
pub fn g_twice(dest: &mut Block, src: &Block) {
    let zero = Block::zero();
    g(dest, &zero, src, false);
    let tmp = dest.clone();
    g(dest, &zero, &tmp, false);
}
