//! The finalizer: XORs the last block of every lane and extracts the tag
//! via `H'`.

use crate::blake2b::h_prime;
use crate::block::{wipe_enabled, Matrix, BLOCK_BYTES};
use zeroize::Zeroize;

/// `C = memory[0, lanelen-1] XOR memory[1, lanelen-1] XOR ...`, then `tag =
/// H'_{outlen}(serialize_LE(C))`.
pub fn finalize(memory: &Matrix, out: &mut [u8]) {
    let last_col = memory.lanelen() - 1;
    let c = memory.xor_column(last_col);

    let mut bytes = [0u8; BLOCK_BYTES];
    c.store_le(&mut bytes);
    h_prime(out, &bytes);
    if wipe_enabled() {
        bytes.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;

    #[test]
    fn finalize_depends_on_every_lane() {
        let mut m = Matrix::new(2, 4);
        m[(0, 3)] = {
            let mut b = Block::zero();
            b[0] = 1;
            b
        };
        let mut out_a = [0u8; 32];
        finalize(&m, &mut out_a);

        m[(1, 3)] = {
            let mut b = Block::zero();
            b[0] = 2;
            b
        };
        let mut out_b = [0u8; 32];
        finalize(&m, &mut out_b);

        assert_ne!(out_a, out_b);
    }
}
