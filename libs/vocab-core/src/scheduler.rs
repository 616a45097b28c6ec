//! Spaced repetition scheduler.
//!
//! Maps (level, answer, interval modifier) to a new mastery level and a new
//! due date from a fixed interval table. Pure given an injected `now`.

use chrono::{DateTime, Duration, Utc};

use crate::error::{Result, ScheduleError};
use crate::types::{Answer, IntervalModifier};

/// Review-due offsets in minutes: 1min, 10min, 1d, 3d, 7d, 16d, 35d.
pub const OPTIMAL_INTERVALS: [i64; 7] = [1, 10, 1440, 4320, 10_080, 23_040, 50_400];

/// Lowest mastery level (just missed / brand new).
pub const MIN_LEVEL: i8 = -1;
/// Highest mastery level.
pub const MAX_LEVEL: i8 = 5;

/// Result of advancing a flashcard after a graded answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub new_level: i8,
    pub due_date: DateTime<Utc>,
    pub history: Vec<Answer>,
}

/// Advance a card's mastery level and due date for a graded answer.
///
/// `Perfected` and `Blacklist` remove a card from rotation rather than
/// rescheduling it and are rejected here. The new history is the input
/// history with `answer` appended, never truncated.
pub fn advance(
    level: i8,
    answer: Answer,
    modifier: IntervalModifier,
    history: &[Answer],
    now: DateTime<Utc>,
) -> Result<Progress> {
    let new_level = next_level(level, answer)?;
    let due_date = due_date_for(new_level, modifier, now)?;

    let mut new_history = history.to_vec();
    new_history.push(answer);

    Ok(Progress {
        new_level,
        due_date,
        history: new_history,
    })
}

/// Level transition for a graded answer, clamped to [-1, 5].
pub fn next_level(level: i8, answer: Answer) -> Result<i8> {
    let raw = match answer {
        Answer::Forgot => MIN_LEVEL,
        Answer::Hard => level - 1,
        Answer::Good => level + 1,
        Answer::Easy => level + 2,
        Answer::Perfected | Answer::Blacklist => {
            return Err(ScheduleError::Unschedulable(answer))
        }
    };
    Ok(raw.clamp(MIN_LEVEL, MAX_LEVEL))
}

/// Due date for a level: `now + ceil(base * modifier)` minutes.
pub fn due_date_for(
    level: i8,
    modifier: IntervalModifier,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    // Map the level to the table: levels -1 and 0 share the short end.
    let index = if level <= 0 {
        i32::from(level) + 1
    } else {
        i32::from(level) - 1
    };
    let base = usize::try_from(index)
        .ok()
        .and_then(|i| OPTIMAL_INTERVALS.get(i))
        .ok_or(ScheduleError::LevelOutOfRange { index })?;

    let minutes = (*base as f64 * modifier.factor()).ceil() as i64;
    Ok(now + Duration::minutes(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn forgot_always_resets_to_minus_one() {
        for level in MIN_LEVEL..=MAX_LEVEL {
            let result = advance(level, Answer::Forgot, IntervalModifier::Standard, &[], now())
                .unwrap();
            assert_eq!(result.new_level, -1);
        }
    }

    #[test]
    fn levels_stay_clamped_for_all_graded_answers() {
        let graded = [Answer::Forgot, Answer::Hard, Answer::Good, Answer::Easy];
        for level in MIN_LEVEL..=MAX_LEVEL {
            for answer in graded {
                let result =
                    advance(level, answer, IntervalModifier::Standard, &[], now()).unwrap();
                assert!((MIN_LEVEL..=MAX_LEVEL).contains(&result.new_level));
            }
        }
    }

    #[test]
    fn good_from_zero_is_due_in_one_minute() {
        // Level 0 + GOOD -> level 1, which maps to the first table entry.
        let result = advance(0, Answer::Good, IntervalModifier::Standard, &[], now()).unwrap();
        assert_eq!(result.new_level, 1);
        assert_eq!(result.due_date, now() + Duration::minutes(1));
    }

    #[test]
    fn easy_jumps_two_levels() {
        let result = advance(1, Answer::Easy, IntervalModifier::Standard, &[], now()).unwrap();
        assert_eq!(result.new_level, 3);
        // Level 3 maps to index 2: one day.
        assert_eq!(result.due_date, now() + Duration::minutes(1440));
    }

    #[test]
    fn modifier_scales_and_rounds_up() {
        // 1 minute * 1.5 = 1.5, rounded up to 2 minutes.
        let result = advance(0, Answer::Good, IntervalModifier::Longer, &[], now()).unwrap();
        assert_eq!(result.due_date, now() + Duration::minutes(2));

        // 10 minutes * 0.75 = 7.5, rounded up to 8 minutes.
        let result = advance(-1, Answer::Good, IntervalModifier::Shorter, &[], now()).unwrap();
        assert_eq!(result.new_level, 0);
        assert_eq!(result.due_date, now() + Duration::minutes(8));
    }

    #[test]
    fn history_is_appended_never_truncated() {
        let history = vec![Answer::Forgot, Answer::Good];
        let result = advance(0, Answer::Hard, IntervalModifier::Standard, &history, now())
            .unwrap();
        assert_eq!(
            result.history,
            vec![Answer::Forgot, Answer::Good, Answer::Hard]
        );
    }

    #[test]
    fn terminal_answers_are_unschedulable() {
        for answer in [Answer::Perfected, Answer::Blacklist] {
            let result = advance(3, answer, IntervalModifier::Standard, &[], now());
            assert_eq!(result, Err(ScheduleError::Unschedulable(answer)));
        }
    }

    #[test]
    fn out_of_table_level_is_rejected() {
        let result = due_date_for(-3, IntervalModifier::Standard, now());
        assert_eq!(result, Err(ScheduleError::LevelOutOfRange { index: -2 }));
    }
}
