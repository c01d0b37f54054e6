//! Scoring module - line-clear points and level progression
//!
//! The rule is the plain one from the harness's reference game: every
//! cleared row is worth 100 points times the current level, and the level
//! rises by one for every ten rows cleared (starting at 1).
//!
//! Counters are telemetry only; no engine rule reads them.

/// Points per cleared row at level 1.
pub const LINE_POINTS: u32 = 100;

/// Rows needed to advance one level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Points awarded for this clear.
    pub points: u32,
    /// Level after the clear is counted.
    pub level: u32,
}

/// Level reached after `total_lines` rows have been cleared.
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Calculate line clear score
/// `level` is the level in force before these rows are added.
pub fn calculate_line_score(lines: u32, level: u32) -> u32 {
    lines.saturating_mul(LINE_POINTS).saturating_mul(level)
}

/// Score a clear of `lines` rows on top of `prior_lines` already cleared.
pub fn score_clear(lines: u32, prior_lines: u32) -> ScoreResult {
    let level = level_for_lines(prior_lines);
    ScoreResult {
        points: calculate_line_score(lines, level),
        level: level_for_lines(prior_lines + lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_starts_at_one_and_steps_every_ten() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(25), 3);
    }

    #[test]
    fn no_lines_no_points() {
        assert_eq!(calculate_line_score(0, 5), 0);
        assert_eq!(score_clear(0, 12), ScoreResult { points: 0, level: 2 });
    }

    #[test]
    fn clear_uses_level_before_the_clear() {
        // 9 prior lines: still level 1 while scoring, level 2 afterwards.
        assert_eq!(score_clear(2, 9), ScoreResult { points: 200, level: 2 });
        assert_eq!(score_clear(4, 10), ScoreResult { points: 800, level: 2 });
    }
}
