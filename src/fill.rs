//! The segment filler: fills one `(pass, slice, lane)` segment, deriving
//! each block's reference index via [`crate::index`] and compressing via
//! [`crate::compression::g`].

use crate::block::Matrix;
use crate::compression::g;
use crate::index::{index_alpha, split_u64, AddressGen};
use crate::params::Params;

/// Fills `segment_length` consecutive blocks of lane `lane`'s `(pass,
/// slice)` segment. When `(pass, slice) == (0, 0)`, the first two blocks
/// are assumed already filled by [`crate::instance::Instance::fill_first_blocks`]
/// and the loop starts at index 2.
pub fn fill_segment(params: &Params, memory: &mut Matrix, pass: u32, lane: u32, slice: u32) {
    let segment_length = params.segment_length();
    let lanelen = params.lanelen();
    let lanes = params.lanes();

    let starting_index = if pass == 0 && slice == 0 { 2 } else { 0 };

    let data_independent = params.variant().data_independent_addressing(pass, slice);
    let mut address_gen = if data_independent {
        Some(AddressGen::new(
            starting_index as usize,
            pass,
            lane,
            slice,
            params.memory_blocks(),
            params.t_cost(),
            params.variant(),
        ))
    } else {
        None
    };

    for index in starting_index..segment_length {
        let curr_col = slice * segment_length + index;
        let prev_col = if curr_col == 0 { lanelen - 1 } else { curr_col - 1 };

        let (j1, j2) = match address_gen {
            Some(ref mut gen) => gen.next_j(),
            None => split_u64(memory[(lane, prev_col)][0]),
        };

        // Reference lane is forced to the current lane during the first
        // slice of the first pass: no other lane has any finalized blocks
        // yet to reference.
        let ref_lane = if pass == 0 && slice == 0 {
            lane
        } else {
            j2 % lanes
        };
        let same_lane = ref_lane == lane;

        let ref_col = index_alpha(pass, slice, index, segment_length, lanelen, j1, same_lane);

        let with_xor = params.version().with_xor(pass);
        let (wr, prev, refb) = memory.get3((lane, curr_col), (lane, prev_col), (ref_lane, ref_col));
        g(wr, prev, refb, with_xor);
    }
}
