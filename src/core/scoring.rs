//! Line-clear scoring, level progression and gravity speed.

use crate::types::{LINES_PER_LEVEL, SOFT_DROP_MULTIPLIER};

/// Base points for clearing 1-4 rows at once, multiplied by level.
const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Milliseconds per row of gravity fall, by level. Levels past the table
/// reuse the last (fastest) entry.
const GRAVITY_TABLE_MS: [u32; 20] = [
    1000, 793, 618, 473, 355, 262, 190, 135, 94, 64, 43, 28, 18, 11, 7, 5, 3, 2, 1, 1,
];

/// Points for a simultaneous clear of `lines` rows at `level`. Counts
/// outside 1-4 score zero.
pub fn line_clear_score(lines: u32, level: u32) -> u32 {
    let base = match lines {
        1..=4 => LINE_SCORES[lines as usize],
        _ => 0,
    };
    base * level
}

/// Points for descending `rows` cells: 1 per row soft dropped, 2 per row
/// hard dropped.
pub fn drop_score(rows: u32, hard: bool) -> u32 {
    if hard {
        rows * 2
    } else {
        rows
    }
}

/// Level after `total_lines` cleared, counting up from `start_level` one
/// level per [`LINES_PER_LEVEL`] lines.
pub fn level_for_lines(total_lines: u32, start_level: u32) -> u32 {
    start_level + total_lines / LINES_PER_LEVEL
}

/// Gravity interval in milliseconds per row at `level` (1-based).
pub fn gravity_ms(level: u32) -> u32 {
    let idx = (level.saturating_sub(1) as usize).min(GRAVITY_TABLE_MS.len() - 1);
    GRAVITY_TABLE_MS[idx]
}

/// Gravity interval while soft drop is held. Clamped to 1 ms so the divisor
/// never produces a zero interval.
pub fn soft_drop_gravity_ms(level: u32) -> u32 {
    (gravity_ms(level) / SOFT_DROP_MULTIPLIER).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_lines_scores_zero_at_any_level() {
        for level in [1, 5, 20, 100] {
            assert_eq!(line_clear_score(0, level), 0);
        }
    }

    #[test]
    fn base_scores_scale_with_level() {
        assert_eq!(line_clear_score(1, 1), 100);
        assert_eq!(line_clear_score(2, 1), 300);
        assert_eq!(line_clear_score(3, 1), 500);
        assert_eq!(line_clear_score(4, 1), 800);

        assert_eq!(line_clear_score(2, 3), 900);
        assert_eq!(line_clear_score(4, 5), 4000);
    }

    #[test]
    fn out_of_range_clear_counts_score_zero() {
        assert_eq!(line_clear_score(5, 3), 0);
        assert_eq!(line_clear_score(99, 1), 0);
    }

    #[test]
    fn drop_scores() {
        assert_eq!(drop_score(10, false), 10);
        assert_eq!(drop_score(10, true), 20);
        assert_eq!(drop_score(0, true), 0);
    }

    #[test]
    fn level_advances_every_ten_lines() {
        assert_eq!(level_for_lines(0, 1), 1);
        assert_eq!(level_for_lines(9, 1), 1);
        assert_eq!(level_for_lines(10, 1), 2);
        assert_eq!(level_for_lines(25, 1), 3);
        assert_eq!(level_for_lines(10, 5), 6);
    }

    #[test]
    fn gravity_table_endpoints() {
        assert_eq!(gravity_ms(1), 1000);
        assert_eq!(gravity_ms(2), 793);
        assert_eq!(gravity_ms(19), 1);
        assert_eq!(gravity_ms(20), 1);
        // Levels beyond the table reuse the fastest entry.
        assert_eq!(gravity_ms(25), 1);
    }

    #[test]
    fn soft_drop_divides_gravity() {
        assert_eq!(soft_drop_gravity_ms(1), 50);
        // Fast levels clamp to 1 ms rather than dropping to zero.
        assert_eq!(soft_drop_gravity_ms(20), 1);
    }
}
