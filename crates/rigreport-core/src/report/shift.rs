use super::model::{CounterSet, PersonRecord, ShiftEntry, ShiftLetter};
use super::rows::{CounterColumns, ShiftRowShape};
use crate::grid::RawGrid;

/// Persons and total parsed from one shift table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftTable {
    pub persons: Vec<PersonRecord>,
    pub total: Option<CounterSet>,
}

impl ShiftTable {
    /// Parse a shift table.
    ///
    /// The first two rows are the shift title and the column header. The last
    /// row labelled as the shift total supplies the total, and rows from it on
    /// are not read as persons.
    pub fn parse(grid: &RawGrid) -> Self {
        if grid.len() < 3 {
            return Self::default();
        }
        let mut data = &grid.rows()[2..];

        let mut total = None;
        if let Some(pos) = data.iter().rposition(ShiftRowShape::is_total) {
            total = Some(CounterColumns::read(&data[pos]));
            data = &data[..pos];
        }

        let persons = data.iter().filter_map(ShiftRowShape::person).collect();
        Self { persons, total }
    }

    /// Shift list for the output: persons, then `{"Total<Shift>": total}`.
    pub fn into_entries(self, letter: ShiftLetter) -> Vec<ShiftEntry> {
        let mut entries: Vec<ShiftEntry> = self.persons.into_iter().map(ShiftEntry::Person).collect();
        if let Some(counters) = self.total {
            entries.push(ShiftEntry::Total {
                label: format!("Total{}", letter.key()),
                counters,
            });
        }
        entries
    }
}

pub fn map_shift(grid: &RawGrid, letter: ShiftLetter) -> Vec<ShiftEntry> {
    ShiftTable::parse(grid).into_entries(letter)
}

/// Grand-total tables: the counters of row 3, or of the last row when shorter.
///
/// Yields `None` for an empty grid or a selected row without columns.
pub fn map_counter_total(grid: &RawGrid) -> Option<CounterSet> {
    let index = grid.len().min(3).checked_sub(1)?;
    let row = grid.row(index)?;
    (!row.is_empty()).then(|| CounterColumns::read(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> RawGrid {
        let table: Vec<Vec<Option<String>>> = rows
            .iter()
            .map(|r| r.iter().map(|v| Some(v.to_string())).collect())
            .collect();
        RawGrid::from_extracted(&table)
    }

    const TITLE: &[&str] = &["", "", "", "", "", "", "شیفت A"];
    const HEAD: &[&str] = &["خ", "پ", "ش", "ن", "ص", "سمت", "نام"];

    #[test]
    fn persons_and_total() {
        let g = grid(&[
            TITLE,
            HEAD,
            &["1", "0", "1", "1", "1", "حفار", "علی"],
            &["0", "0", "1", "1", "0", "مکانیک", "رضا"],
            &["1", "0", "2", "2", "1", "مجموع آمار شیفت", ""],
        ]);
        let table = ShiftTable::parse(&g);
        assert_eq!(table.persons.len(), 2);
        assert_eq!(table.persons[1].name, "رضا");
        let total = table.total.unwrap();
        assert_eq!((total.breakfast, total.lunch, total.dinner, total.late_snack, total.lodging), (1, 2, 2, 0, 1));
    }

    #[test]
    fn total_entry_is_appended_with_shift_name() {
        let g = grid(&[
            TITLE,
            HEAD,
            &["1", "0", "1", "1", "1", "حفار", "علی"],
            &["1", "0", "1", "1", "1", "مجموع آمار شیفت", ""],
        ]);
        let entries = map_shift(&g, ShiftLetter::C);
        assert_eq!(entries.len(), 2);
        assert!(matches!(&entries[1], ShiftEntry::Total { label, .. } if label == "TotalShiftC"));
    }

    #[test]
    fn rows_after_total_are_dropped() {
        let g = grid(&[
            TITLE,
            HEAD,
            &["1", "0", "1", "1", "1", "حفار", "علی"],
            &["1", "0", "1", "1", "1", "مجموع آمار شیفت", ""],
            &["", "", "", "", "", "امضا", "سرپرست"],
        ]);
        let table = ShiftTable::parse(&g);
        assert_eq!(table.persons.len(), 1);
        assert!(table.total.is_some());
    }

    #[test]
    fn without_total_row_there_is_no_total_entry() {
        let g = grid(&[TITLE, HEAD, &["1", "0", "1", "1", "1", "حفار", "علی"], &["", "", "", "", "", "", ""]]);
        let entries = map_shift(&g, ShiftLetter::A);
        assert_eq!(entries.len(), 1);
        assert!(matches!(entries[0], ShiftEntry::Person(_)));
    }

    #[test]
    fn short_tables_are_empty() {
        assert!(map_shift(&grid(&[TITLE, HEAD]), ShiftLetter::A).is_empty());
        assert!(map_shift(&RawGrid::default(), ShiftLetter::A).is_empty());
    }

    #[test]
    fn grand_total_row_selection() {
        let three = grid(&[&["9"], &["8"], &["7"], &["6"]]);
        assert_eq!(map_counter_total(&three).unwrap().lodging, 7);
        let two = grid(&[&["9"], &["8"]]);
        assert_eq!(map_counter_total(&two).unwrap().lodging, 8);
        let one = grid(&[&["9"]]);
        assert_eq!(map_counter_total(&one).unwrap().lodging, 9);
        assert_eq!(map_counter_total(&RawGrid::default()), None);
    }
}
