use super::model::FoodsRecord;
use crate::grid::RawGrid;

const BREAKFAST: &str = "صبحانه";
const LUNCH: &str = "ناهار";
const DINNER: &str = "شام";
const LATE_SNACK: &str = "پس شام";
/// Late snack written with a zero-width non-joiner.
const LATE_SNACK_ZWNJ: &str = "پس\u{200c}شام";
const NOTES: &str = "توضیحات";

const LABELS: [&str; 5] = [BREAKFAST, LUNCH, DINNER, LATE_SNACK, LATE_SNACK_ZWNJ];

/// Map the meals table.
///
/// Each meal label has its value in the column before it; the notes label has
/// its value in the column after it or after a `:` in the same cell. The late
/// snack label contains the dinner label, so it is tested first.
pub fn map_foods(grid: &RawGrid) -> FoodsRecord {
    let mut foods = FoodsRecord::default();

    for row in grid.rows() {
        let Some(max_column) = row.max_column() else {
            continue;
        };
        for i in 0..=max_column {
            let key = row.trimmed(i);
            let prev = if i > 0 { row.trimmed(i - 1) } else { "" };
            let next = row.trimmed(i + 1);

            if key.contains(BREAKFAST) && !prev.is_empty() {
                foods.breakfast = prev.to_string();
            } else if key.contains(LUNCH) && !prev.is_empty() {
                foods.lunch = prev.to_string();
            } else if (key.contains(LATE_SNACK) || key.contains(LATE_SNACK_ZWNJ)) && !prev.is_empty() {
                foods.late_snack = prev.to_string();
            } else if key.contains(DINNER) && !prev.is_empty() {
                foods.dinner = prev.to_string();
            } else if key.contains(NOTES) {
                if !next.is_empty() {
                    foods.notes = next.to_string();
                } else if let Some((_, rest)) = key.split_once(':') {
                    foods.notes = rest.trim().to_string();
                }
            }
        }
    }

    if foods.notes.is_empty() {
        if let Some(notes) = notes_fallback(grid) {
            foods.notes = notes;
        }
    }
    foods
}

/// Best effort: the first longer free-text cell of the last row.
fn notes_fallback(grid: &RawGrid) -> Option<String> {
    let last = grid.rows().last()?;
    last.iter()
        .map(|(_, value)| value.trim())
        .find(|value| {
            !value.is_empty()
                && !value.contains(NOTES)
                && !LABELS.contains(value)
                && value.chars().count() > 5
        })
        .map(str::to_string)
}
