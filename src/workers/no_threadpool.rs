use crate::block::Matrix;
use crate::error::Error;

/// Non-threaded scheduler: runs every lane's segment inline, in lane
/// order, on the calling thread. Used when the `threaded` feature is
/// disabled.
pub struct Workers {
    lanes: u32,
}

impl Workers {
    pub fn new(lanes: u32, _threads: u32) -> Workers {
        Workers { lanes }
    }

    pub fn map<F>(&self, matrix: &mut Matrix, f: F) -> Result<(), Error>
    where
        F: Fn(&mut Matrix, u32) + Sync,
    {
        for lane in 0..self.lanes {
            f(matrix, lane);
        }
        Ok(())
    }
}
