//! Sliding-window confidence trimming.
//!
//! The per-residue confidence profile of a predicted structure (e.g. pLDDT)
//! typically degrades towards both termini. These functions locate the
//! boundaries of the sustained-confidence region: a sliding window of means
//! finds a neighborhood of sustained confidence first, and a single-residue
//! walk then reclaims any immediately adjacent high-confidence residues the
//! window conservatively excluded. A single lucky residue inside an otherwise
//! poor terminus is therefore never trusted on its own.
//!
//! Both functions are deterministic and side-effect free. A window larger
//! than the profile is clamped to the profile length.

fn window_mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Returns the inclusive start index of the confident region of `confidence`.
///
/// Slides a window of length `window` from the left and takes the first
/// position whose mean reaches `threshold` (falling back to the last possible
/// position when no window qualifies), then walks backward from the window's
/// right edge over individually passing residues.
pub fn trim_left(confidence: &[f64], threshold: f64, window: usize) -> usize {
    let n = confidence.len();
    if n == 0 {
        return 0;
    }
    let window = window.clamp(1, n);

    let last_start = n - window;
    let mut start = last_start;
    for i in 0..=last_start {
        if window_mean(&confidence[i..i + window]) >= threshold {
            start = i;
            break;
        }
    }

    let mut cursor = start + window;
    while cursor > 0 && confidence[cursor - 1] >= threshold {
        cursor -= 1;
    }
    cursor
}

/// Returns the exclusive end index of the confident region of `confidence`.
///
/// Mirror of [`trim_left`]: slides the window from the right and takes the
/// rightmost qualifying position (falling back to the first possible position
/// when no window qualifies), then walks forward from the window's left edge
/// over individually passing residues.
pub fn trim_right(confidence: &[f64], threshold: f64, window: usize) -> usize {
    let n = confidence.len();
    if n == 0 {
        return 0;
    }
    let window = window.clamp(1, n);

    let mut end = window;
    for j in (window..=n).rev() {
        if window_mean(&confidence[j - window..j]) >= threshold {
            end = j;
            break;
        }
    }

    let mut cursor = end - window;
    while cursor < n && confidence[cursor] >= threshold {
        cursor += 1;
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confident_run_boundaries_are_recovered_exactly() {
        // A run of length >= window, surrounded by failing residues, must be
        // returned with exactly its own boundaries.
        let c = [10.0, 20.0, 90.0, 95.0, 85.0, 88.0, 30.0, 15.0];
        assert_eq!(trim_left(&c, 70.0, 3), 2);
        assert_eq!(trim_right(&c, 70.0, 3), 6);
    }

    #[test]
    fn fully_confident_profile_is_untouched() {
        let c = [90.0; 12];
        assert_eq!(trim_left(&c, 70.0, 3), 0);
        assert_eq!(trim_right(&c, 70.0, 3), 12);
    }

    #[test]
    fn all_failing_profile_crosses_over() {
        // No window qualifies anywhere, so the left boundary lands past the
        // right one. The loader turns this into a rejection.
        let c = [10.0; 10];
        assert_eq!(trim_left(&c, 70.0, 3), 10);
        assert_eq!(trim_right(&c, 70.0, 3), 0);
    }

    #[test]
    fn lucky_single_residue_inside_poor_terminus_is_not_trusted() {
        let c = [10.0, 99.0, 10.0, 10.0, 80.0, 85.0, 90.0, 88.0];
        assert_eq!(trim_left(&c, 70.0, 3), 4);
    }

    #[test]
    fn backward_walk_reclaims_passing_residues_inside_the_window() {
        // The first qualifying window is [1, 5); every residue under it passes
        // individually, so the walk runs back to the window's own start.
        let c = [10.0, 75.0, 72.0, 90.0, 95.0, 85.0, 88.0];
        assert_eq!(trim_left(&c, 70.0, 4), 1);
    }

    #[test]
    fn failing_residue_at_window_edge_is_not_reclaimed() {
        // The leading window qualifies on average, but its right-edge residue
        // fails individually and the walk must not step over it.
        let c = [90.0, 92.0, 40.0, 88.0, 91.0, 89.0];
        assert_eq!(trim_left(&c, 70.0, 3), 3);
    }

    #[test]
    fn window_of_one_stops_at_first_passing_residue() {
        let c = [10.0, 80.0, 10.0, 90.0];
        assert_eq!(trim_left(&c, 70.0, 1), 1);
        assert_eq!(trim_right(&c, 70.0, 1), 4);
    }

    #[test]
    fn window_larger_than_profile_is_clamped() {
        let c = [90.0, 92.0];
        assert_eq!(trim_left(&c, 70.0, 5), 0);
        assert_eq!(trim_right(&c, 70.0, 5), 2);
    }

    #[test]
    fn empty_profile_yields_empty_interval() {
        assert_eq!(trim_left(&[], 70.0, 3), 0);
        assert_eq!(trim_right(&[], 70.0, 3), 0);
    }
}
