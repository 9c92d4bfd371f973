use crate::block::Matrix;
use crate::error::Error;

/// Dispatches up to `min(threads, lanes)` lane workers per epoch via
/// `crossbeam::scope`, joining the whole scope before returning. With a
/// single lane, the segment is filled inline on the calling thread — no
/// scope is even opened.
pub struct Workers {
    lanes: u32,
    threads: u32,
}

impl Workers {
    pub fn new(lanes: u32, threads: u32) -> Workers {
        Workers {
            lanes,
            threads: std::cmp::min(threads, lanes).max(1),
        }
    }

    /// Runs `f(lane)` for every lane in `0..lanes`, at most `threads` at a
    /// time, returning only once every lane has finished (or the first
    /// thread failure is observed).
    pub fn map<F>(&self, matrix: &mut Matrix, f: F) -> Result<(), Error>
    where
        F: Fn(&mut Matrix, u32) + Sync,
    {
        if self.lanes == 1 {
            f(matrix, 0);
            return Ok(());
        }

        let chunk = self.threads as usize;
        let mut lane = 0u32;
        let f = &f;
        let result = crossbeam::scope(|scope| {
            while lane < self.lanes {
                let batch_end = std::cmp::min(lane + chunk as u32, self.lanes);
                let mut handles = Vec::with_capacity((batch_end - lane) as usize);
                for l in lane..batch_end {
                    // SAFETY: within one epoch, distinct lanes only write
                    // to their own segment and only read blocks finalized
                    // in earlier epochs; the scope join below is the
                    // barrier that makes those writes visible before the
                    // next epoch's reads.
                    let m = unsafe { matrix.mut_ref() };
                    handles.push(scope.spawn(move |_| f(m, l)));
                }
                for h in handles {
                    if h.join().is_err() {
                        return Err(Error::ThreadFail);
                    }
                }
                lane = batch_end;
            }
            Ok(())
        });

        match result {
            Ok(inner) => inner,
            Err(_) => Err(Error::ThreadFail),
        }
    }
}
