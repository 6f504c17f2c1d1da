//! Column layouts of the form rows.
//!
//! The forms are laid out right to left, so the counters occupy the lowest
//! column indices and the person's name the highest.

use super::model::{CounterSet, PersonRecord};
use crate::grid::RawRow;
use crate::numeric::to_int;

/// Columns 4..0 hold the five counters.
pub struct CounterColumns;

impl CounterColumns {
    pub const BREAKFAST: usize = 4;
    pub const LUNCH: usize = 3;
    pub const DINNER: usize = 2;
    pub const LATE_SNACK: usize = 1;
    pub const LODGING: usize = 0;

    pub fn read(row: &RawRow) -> CounterSet {
        CounterSet {
            breakfast: to_int(row.cell(Self::BREAKFAST)),
            lunch: to_int(row.cell(Self::LUNCH)),
            dinner: to_int(row.cell(Self::DINNER)),
            late_snack: to_int(row.cell(Self::LATE_SNACK)),
            lodging: to_int(row.cell(Self::LODGING)),
        }
    }
}

/// Shift table row: name in column 6, position in column 5.
pub struct ShiftRowShape;

impl ShiftRowShape {
    pub const NAME: usize = 6;
    pub const POSITION: usize = 5;
    /// Label marking the shift's total row, found in the position column.
    pub const TOTAL_LABEL: &'static str = "مجموع آمار شیفت";

    pub fn is_total(row: &RawRow) -> bool {
        row.trimmed(Self::POSITION).contains(Self::TOTAL_LABEL)
    }

    /// The person on this row, or `None` when name and position are both empty.
    pub fn person(row: &RawRow) -> Option<PersonRecord> {
        let name = row.trimmed(Self::NAME);
        let position = row.trimmed(Self::POSITION);
        if name.is_empty() && position.is_empty() {
            return None;
        }
        Some(PersonRecord {
            name: name.to_string(),
            position: position.to_string(),
            company: None,
            counters: CounterColumns::read(row),
        })
    }
}

/// Employer and drilling roster row: name, position and company in columns 7, 6, 5.
pub struct RosterRowShape;

impl RosterRowShape {
    pub const NAME: usize = 7;
    pub const POSITION: usize = 6;
    pub const COMPANY: usize = 5;

    pub fn person(row: &RawRow) -> Option<PersonRecord> {
        let name = row.trimmed(Self::NAME);
        let position = row.trimmed(Self::POSITION);
        if name.is_empty() && position.is_empty() {
            return None;
        }
        Some(PersonRecord {
            name: name.to_string(),
            position: position.to_string(),
            company: Some(row.trimmed(Self::COMPANY).to_string()),
            counters: CounterColumns::read(row),
        })
    }
}
