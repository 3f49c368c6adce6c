use rayon::prelude::*;

/// Elements per chunk in the parallel scan and scatter passes
const CHUNK_SIZE: usize = 4096;

/// Stable stream compaction.
///
/// Runs a predicate pass into a flag buffer, an exclusive prefix sum over per-chunk counts and
/// a scatter that writes each chunk into its own disjoint slice of the output. Both outputs keep
/// the input order.
#[derive(Default)]
pub struct StreamCompactor {
    flags: Vec<bool>,
}

impl StreamCompactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits `items` into `kept` and `removed` by `predicate`, preserving order within both.
    /// Returns the number of kept items.
    pub fn compact<T, P>(
        &mut self,
        items: &[T],
        predicate: P,
        kept: &mut Vec<T>,
        removed: &mut Vec<T>,
    ) -> usize
    where
        T: Copy + Default + Send + Sync,
        P: Fn(&T) -> bool + Sync,
    {
        self.flags.clear();
        self.flags.par_extend(items.par_iter().map(&predicate));

        let kept_counts: Vec<u32> = self
            .flags
            .par_chunks(CHUNK_SIZE)
            .map(|chunk| chunk.iter().filter(|&&f| f).count() as u32)
            .collect();
        let removed_counts: Vec<u32> = self
            .flags
            .par_chunks(CHUNK_SIZE)
            .zip(kept_counts.par_iter())
            .map(|(chunk, &kept)| chunk.len() as u32 - kept)
            .collect();

        let mut kept_offsets = vec![0; kept_counts.len()];
        let kept_total = exclusive_scan(&kept_counts, &mut kept_offsets) as usize;
        let mut removed_offsets = vec![0; removed_counts.len()];
        let removed_total = exclusive_scan(&removed_counts, &mut removed_offsets) as usize;

        kept.clear();
        kept.resize(kept_total, T::default());
        removed.clear();
        removed.resize(removed_total, T::default());

        let kept_slices = split_at_offsets(kept, &kept_offsets);
        let removed_slices = split_at_offsets(removed, &removed_offsets);

        items
            .par_chunks(CHUNK_SIZE)
            .zip(self.flags.par_chunks(CHUNK_SIZE))
            .zip(kept_slices.into_par_iter().zip(removed_slices.into_par_iter()))
            .for_each(|((items, flags), (kept, removed))| {
                let mut k = 0;
                let mut r = 0;
                for (item, &flag) in items.iter().zip(flags) {
                    if flag {
                        kept[k] = *item;
                        k += 1;
                    } else {
                        removed[r] = *item;
                        r += 1;
                    }
                }
                debug_assert_eq!(k, kept.len());
                debug_assert_eq!(r, removed.len());
            });

        kept_total
    }
}

/// Writes the exclusive prefix sum of `values` into `out` and returns the total. Large inputs
/// are summed in parallel chunks that are then offset by the scanned chunk totals.
pub fn exclusive_scan(values: &[u32], out: &mut [u32]) -> u32 {
    assert_eq!(values.len(), out.len());

    let chunk_totals: Vec<u32> = values
        .par_chunks(CHUNK_SIZE)
        .map(|chunk| chunk.iter().sum())
        .collect();
    let mut chunk_offsets = Vec::with_capacity(chunk_totals.len());
    let mut total = 0;
    for t in &chunk_totals {
        chunk_offsets.push(total);
        total += t;
    }

    out.par_chunks_mut(CHUNK_SIZE)
        .zip(values.par_chunks(CHUNK_SIZE))
        .zip(chunk_offsets.par_iter())
        .for_each(|((out, values), &offset)| {
            let mut sum = offset;
            for (o, &v) in out.iter_mut().zip(values) {
                *o = sum;
                sum += v;
            }
        });

    total
}

/// Splits `out` into consecutive slices starting at each of the ascending `offsets`
fn split_at_offsets<'a, T>(mut out: &'a mut [T], offsets: &[u32]) -> Vec<&'a mut [T]> {
    let mut slices = Vec::with_capacity(offsets.len());
    let mut start = 0;
    for i in 0..offsets.len() {
        let end = offsets.get(i + 1).map_or(start + out.len(), |&o| o as usize);
        let (head, tail) = std::mem::take(&mut out).split_at_mut(end - start);
        slices.push(head);
        out = tail;
        start = end;
    }
    slices
}
