//! Exact-sum integer partitioning.
//!
//! Every macro aggregate that becomes several cards goes through
//! [`partition`]; the fragments must sum back to the source exactly, so all
//! arithmetic here is integer and the only rounding is the explicit remainder
//! assignment to the final part.

use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Splits `total` into `parts` integers summing exactly to `total`.
///
/// Every element is at least `min_part` (negative minimums are treated as
/// zero), except on the degraded path: when `parts * min_part` exceeds
/// `|total|` the split is infeasible under the minimum, so `parts - 1`
/// elements take the minimum and the last absorbs the remainder, possibly
/// below the minimum or negative. That degradation is deliberate; the
/// function never fails and never introduces rounding error.
///
/// A negative `total` is partitioned by magnitude and the sign reapplied to
/// every element, so an inventory draw-down stays negative in every fragment.
/// The output order is shuffled on every call. `parts == 0` yields an empty
/// vector.
pub fn partition(rng: &mut SmallRng, total: i64, parts: usize, min_part: i64) -> Vec<i64> {
    if parts == 0 {
        return Vec::new();
    }

    let negative = total < 0;
    let magnitude = total.checked_abs().unwrap_or(i64::MAX);
    let min_part = min_part.max(0);
    let parts_i = parts as i64;

    let mut out = Vec::with_capacity(parts);
    let feasible = min_part
        .checked_mul(parts_i)
        .is_some_and(|floor| floor <= magnitude);

    if feasible {
        let mut remainder = magnitude - min_part * parts_i;
        for taken in 0..parts - 1 {
            let left = (parts - taken) as i64;
            // Cap each draw near twice the even share so fragments stay
            // random but comparable in size.
            let cap = ((remainder * 2) / left).min(remainder);
            let extra = if cap > 0 { rng.random_range(0..=cap) } else { 0 };
            out.push(min_part + extra);
            remainder -= extra;
        }
        out.push(min_part + remainder);
    } else {
        for _ in 0..parts - 1 {
            out.push(min_part);
        }
        out.push(magnitude - min_part * (parts_i - 1));
    }

    out.shuffle(rng);

    if negative {
        for value in &mut out {
            *value = -*value;
        }
    }
    out
}
