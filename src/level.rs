//! Level progression curve.
//!
//! A level `L` is reached once a skill holds `floor(50*L + 5*L^1.5)` xp.
//! The curve is strictly increasing, so the inverse is a simple search.

/// Minimum xp required to reach `level`.
pub fn xp_threshold(level: u32) -> u64 {
    let l = f64::from(level);
    (50.0 * l + 5.0 * l * l.sqrt()).floor() as u64
}

/// The highest level whose threshold `xp` has reached.
///
/// Returns 0 for any xp below `xp_threshold(1)`.
pub fn level_for_xp(xp: u64) -> u32 {
    // threshold(L) >= 50L, so no level above xp/50 can be reached.
    let upper = (xp / 50).min(u64::from(u32::MAX - 1)) as u32 + 1;

    let (mut lo, mut hi) = (0u32, upper);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if xp_threshold(mid) <= xp {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Xp still missing before the next level is reached.
pub fn xp_to_next_level(xp: u64) -> u64 {
    xp_threshold(level_for_xp(xp) + 1).saturating_sub(xp)
}
