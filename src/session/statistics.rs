//! Statistics for a completed (or flushed) uplink burst. Both functions are pure and operate on
//!  the samples in arrival order.

/// Number of pairs `(i, j)` with `i < j` and `packet_nums[i] > packet_nums[j]`, i.e. how far the
///  arrival order deviates from the sending order. Duplicates are not inversions of each other.
///
/// This counts inversions while merge-sorting a copy of the input: whenever an element from the
///  right half is merged before the remaining elements of the left half, it forms an inversion
///  with each of them. The input itself is left in arrival order.
pub fn inversion_count(packet_nums: &[i32]) -> u64 {
    let mut buf = packet_nums.to_vec();
    let mut scratch = Vec::with_capacity(buf.len());
    sort_and_count(&mut buf, &mut scratch)
}

fn sort_and_count(buf: &mut [i32], scratch: &mut Vec<i32>) -> u64 {
    if buf.len() < 2 {
        return 0;
    }

    let mid = buf.len() / 2;
    let mut count = sort_and_count(&mut buf[..mid], scratch) + sort_and_count(&mut buf[mid..], scratch);

    scratch.clear();
    {
        let (left, right) = buf.split_at(mid);
        let (mut l, mut r) = (0, 0);
        while l < left.len() && r < right.len() {
            if left[l] > right[r] {
                count += (left.len() - l) as u64;
                scratch.push(right[r]);
                r += 1;
            }
            else {
                scratch.push(left[l]);
                l += 1;
            }
        }
        scratch.extend_from_slice(&left[l..]);
        scratch.extend_from_slice(&right[r..]);
    }
    buf.copy_from_slice(scratch);

    count
}

/// Jitter as the sample standard deviation (dividing by `n - 1`) of the offsetted one-way delays,
///  truncated to whole millis. An offsetted delay is the server's receive time minus the client's
///  send timestamp; the unknown clock offset between client and server is the same for all
///  samples, so it cancels out here.
///
/// Fewer than two samples have no variance, and the jitter is 0.
pub fn jitter(offsetted_delays: &[i64]) -> i64 {
    let n = offsetted_delays.len();
    if n < 2 {
        return 0;
    }

    // accumulated term by term as d / n
    let mean: f64 = offsetted_delays.iter()
        .map(|&d| d as f64 / n as f64)
        .sum();

    let variance: f64 = offsetted_delays.iter()
        .map(|&d| {
            let diff = d as f64 - mean;
            diff * diff / (n - 1) as f64
        })
        .sum();

    variance.sqrt() as i64
}
