use super::model::{OrderedMap, PersonRecord};
use super::rows::RosterRowShape;
use crate::grid::RawGrid;

/// Employer or drilling roster: every row after the column header.
pub fn map_roster(grid: &RawGrid) -> Vec<PersonRecord> {
    if grid.len() < 2 {
        return Vec::new();
    }
    grid.rows()[1..]
        .iter()
        .filter_map(RosterRowShape::person)
        .collect()
}

/// Supervisor strip: non-empty cells of row 2 (or row 1 when it is the only
/// one), keyed by their column index.
pub fn map_supervisor(grid: &RawGrid) -> OrderedMap<String> {
    let row = if grid.len() >= 2 { grid.row(1) } else { grid.row(0) };
    row.into_iter()
        .flat_map(|row| row.iter())
        .map(|(column, value)| (column.to_string(), value.trim()))
        .filter(|(_, value)| !value.is_empty())
        .map(|(column, value)| (column, value.to_string()))
        .collect()
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

    #[test]
    fn roster_skips_header_and_blank_rows() {
        let g = grid(&[
            &["خ", "پ", "ش", "ن", "ص", "شرکت", "سمت", "نام"],
            &["1", "1", "1", "1", "1", "پیمانکار", "ناظر", "حسن"],
            &["0", "0", "0", "0", "0", "پیمانکار", "", ""],
        ]);
        let roster = map_roster(&g);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "حسن");
        assert_eq!(roster[0].company.as_deref(), Some("پیمانکار"));
    }

    #[test]
    fn header_only_roster_is_empty() {
        assert!(map_roster(&grid(&[&["نام"]])).is_empty());
    }

    #[test]
    fn supervisor_uses_second_row() {
        let g = grid(&[&["عنوان", "", "x"], &[" علی ", "", "امضا"]]);
        let sup = map_supervisor(&g);
        let entries: Vec<(&str, &str)> = sup.iter().map(|(k, v)| (k, v.as_str())).collect();
        assert_eq!(entries, vec![("0", "علی"), ("2", "امضا")]);
    }

    #[test]
    fn supervisor_falls_back_to_first_row() {
        let sup = map_supervisor(&grid(&[&["", "رضا"]]));
        assert_eq!(sup.get("1").map(String::as_str), Some("رضا"));
        assert!(map_supervisor(&RawGrid::default()).is_empty());
    }
}
