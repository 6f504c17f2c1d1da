use super::model::{TotalsRecord, TotalsRow};
use crate::grid::{RawGrid, RawRow};
use crate::numeric::{looks_numeric, to_int};

/// Most label rows read below the header.
const MAX_LABEL_ROWS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Breakfast,
    Lunch,
    Dinner,
    LateSnack,
    Services,
}

impl Category {
    /// Positional order used when the table has no header row.
    const ORDER: [Category; 5] = [
        Category::Breakfast,
        Category::Lunch,
        Category::Dinner,
        Category::LateSnack,
        Category::Services,
    ];

    /// Recognize a header cell. Spaces are often inserted inside words by the
    /// text layer, so they are removed before matching.
    fn from_header(cell: &str) -> Option<Self> {
        let clean: String = cell
            .chars()
            .filter(|c| !matches!(c, ' ' | '\t' | '\n' | '،'))
            .collect();
        if clean.contains("صبحانه") {
            Some(Category::Breakfast)
        } else if clean.contains("ناهار") {
            Some(Category::Lunch)
        } else if clean.contains("پسشام") || (clean.contains("پس") && clean.contains("شام")) {
            Some(Category::LateSnack)
        } else if clean.contains("شام") {
            Some(Category::Dinner)
        } else if clean.contains("خدمات") {
            Some(Category::Services)
        } else {
            None
        }
    }

    fn set(self, row: &mut TotalsRow, value: i64) {
        match self {
            Category::Breakfast => row.breakfast = value,
            Category::Lunch => row.lunch = value,
            Category::Dinner => row.dinner = value,
            Category::LateSnack => row.late_snack = value,
            Category::Services => row.services = value,
        }
    }
}

/// Category → column, in order of first discovery; later columns win.
#[derive(Debug, Default)]
struct HeaderColumns(Vec<(Category, usize)>);

impl HeaderColumns {
    fn scan(row: &RawRow) -> Self {
        let mut columns = Self::default();
        let Some(max_column) = row.max_column() else {
            return columns;
        };
        for i in 0..=max_column {
            if let Some(category) = Category::from_header(row.trimmed(i)) {
                match columns.0.iter_mut().find(|(c, _)| *c == category) {
                    Some(slot) => slot.1 = i,
                    None => columns.0.push((category, i)),
                }
            }
        }
        columns
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Map the aggregate meal totals table to `label → per-category counts`.
///
/// Row 0 is checked for category headers. Up to seven rows after it are then
/// read; each row's label is its first non-numeric cell longer than one
/// character, and its counts come from the header columns or, without a header,
/// from the five cells right after the label.
pub fn map_totals(grid: &RawGrid) -> TotalsRecord {
    let mut totals = TotalsRecord::new();
    let Some(first) = grid.row(0) else {
        return totals;
    };

    let header = HeaderColumns::scan(first);
    let start = if header.is_empty() { 0 } else { 1 };
    let end = (start + MAX_LABEL_ROWS).min(grid.len());

    for row in grid.rows().get(start..end).unwrap_or_default() {
        let Some((label_column, label)) = row_label(row) else {
            continue;
        };

        let mut values = TotalsRow::default();
        if header.is_empty() {
            for (k, category) in Category::ORDER.into_iter().enumerate() {
                let column = label_column + 1 + k;
                if row.has_column(column) {
                    category.set(&mut values, to_int(row.trimmed(column)));
                }
            }
        } else {
            for &(category, column) in &header.0 {
                if row.has_column(column) {
                    category.set(&mut values, to_int(row.trimmed(column)));
                }
            }
        }
        totals.insert(label, values);
    }
    totals
}

fn row_label(row: &RawRow) -> Option<(usize, &str)> {
    let max_column = row.max_column()?;
    (0..=max_column)
        .map(|i| (i, row.trimmed(i)))
        .find(|(_, value)| !value.is_empty() && !looks_numeric(value) && value.chars().count() > 1)
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
    fn header_columns_drive_values() {
        let g = grid(&[
            &["خدمات", "پس شام", "شام", "ناهار", "صبحانه", ""],
            &["5", "4", "3", "2", "1", "پرسنل"],
            &["50", "40", "30", "20", "10", "مهمان"],
        ]);
        let totals = map_totals(&g);
        let labels: Vec<&str> = totals.keys().collect();
        assert_eq!(labels, vec!["پرسنل", "مهمان"]);
        let staff = totals.get("پرسنل").unwrap();
        assert_eq!(
            (staff.breakfast, staff.lunch, staff.dinner, staff.late_snack, staff.services),
            (1, 2, 3, 4, 5)
        );
    }

    #[test]
    fn spaced_header_words_are_recognized() {
        let g = grid(&[&["خدما ت", "شا م", "پس  شام"], &["1", "2", "3", "کل"]]);
        let totals = map_totals(&g);
        let row = totals.get("کل").unwrap();
        assert_eq!((row.services, row.dinner, row.late_snack), (1, 2, 3));
    }

    #[test]
    fn without_header_values_follow_label() {
        let g = grid(&[&["جمع", "1", "2", "3", "4", "5"]]);
        let row = *map_totals(&g).get("جمع").unwrap();
        assert_eq!((row.breakfast, row.services), (1, 5));
    }

    #[test]
    fn numeric_and_single_char_cells_are_not_labels() {
        let g = grid(&[&["12", "x", "-3", "کارگر", "7"]]);
        let totals = map_totals(&g);
        assert_eq!(totals.keys().collect::<Vec<_>>(), vec!["کارگر"]);
        assert_eq!(totals.get("کارگر").unwrap().breakfast, 7);
    }

    #[test]
    fn at_most_seven_rows_after_header() {
        let mut rows: Vec<Vec<String>> = vec![vec!["صبحانه".into(), "".into()]];
        for i in 0..9 {
            rows.push(vec![i.to_string(), format!("ردیف{i}")]);
        }
        let table: Vec<Vec<Option<String>>> = rows
            .into_iter()
            .map(|r| r.into_iter().map(Some).collect())
            .collect();
        let totals = map_totals(&RawGrid::from_extracted(&table));
        assert_eq!(totals.len(), 7);
        assert_eq!(totals.get("ردیف0").unwrap().breakfast, 0);
    }

    #[test]
    fn repeated_label_overwrites() {
        let g = grid(&[&["جمع", "1"], &["جمع", "2"]]);
        let totals = map_totals(&g);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals.get("جمع").unwrap().breakfast, 2);
    }

    #[test]
    fn empty_grid_is_empty() {
        assert!(map_totals(&RawGrid::default()).is_empty());
    }
}
