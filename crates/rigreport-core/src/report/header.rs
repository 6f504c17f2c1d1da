use super::model::HeaderRecord;
use crate::grid::RawGrid;

/// Key the date fragments are stored under.
pub const DATE_KEY: &str = "تاریخ";

/// Map the header strip to `label → value` pairs.
///
/// Only the first row is read, positionally. Columns 0..3 are date fragments
/// joined into [`DATE_KEY`]. The remaining cells pair a `label:` with its value
/// in the neighbouring cell on either side, or carry `label: value` in one cell.
pub fn map_header(grid: &RawGrid) -> HeaderRecord {
    let mut result = HeaderRecord::new();
    let Some(first) = grid.row(0) else {
        return result;
    };
    let cells: Vec<&str> = first.values().into_iter().map(str::trim).collect();

    let date: String = cells
        .iter()
        .take(4)
        .map(|part| part.replace([' ', '/', ':'], ""))
        .map(|part| part.trim().to_string())
        .collect();
    if !date.is_empty() {
        result.insert(DATE_KEY, date);
    }

    let mut i = 0;
    while i < cells.len() {
        let current = cells[i];
        let next = cells.get(i + 1).copied().unwrap_or("");

        if current.is_empty() || i < 4 || (current.contains(DATE_KEY) && current.contains(':')) {
            i += 1;
            continue;
        }

        if current.ends_with(':') && !next.is_empty() && !next.ends_with(':') {
            result.insert(strip_label(current), next.to_string());
            i += 2;
            continue;
        }

        if next.ends_with(':') && !current.ends_with(':') {
            result.insert(strip_label(next), current.to_string());
            i += 2;
            continue;
        }

        if let Some((key, value)) = current.split_once(':') {
            let (key, value) = (key.trim(), value.trim());
            if !key.is_empty() && !value.is_empty() {
                result.insert(key, value.to_string());
            }
        }
        i += 1;
    }

    result
}

fn strip_label(label: &str) -> &str {
    label.trim_end_matches(':').trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cells: &[&str]) -> RawGrid {
        let row = cells.iter().map(|v| Some(v.to_string())).collect();
        RawGrid::from_extracted(&[row])
    }

    fn entries(record: &HeaderRecord) -> Vec<(&str, &str)> {
        record.iter().map(|(k, v)| (k, v.as_str())).collect()
    }

    #[test]
    fn inline_and_trailing_labels() {
        let record = map_header(&grid(&["1404", "07", "10", "", "مسوول اردوگاه: نام", "O3", "دستگاه حفاری:"]));
        assert_eq!(
            entries(&record),
            vec![("تاریخ", "14040710"), ("مسوول اردوگاه", "نام"), ("دستگاه حفاری", "O3")]
        );
    }

    #[test]
    fn label_followed_by_value() {
        let record = map_header(&grid(&["", "", "", "", "روز هفته:", "شنبه"]));
        assert_eq!(entries(&record), vec![("روز هفته", "شنبه")]);
    }

    #[test]
    fn date_fragments_are_cleaned() {
        let record = map_header(&grid(&["1404/", "07 /", ":10", "x"]));
        assert_eq!(record.get(DATE_KEY).map(String::as_str), Some("14040710x"));
    }

    #[test]
    fn date_label_cell_is_skipped() {
        let record = map_header(&grid(&["", "", "", "", "تاریخ:", "1404"]));
        assert!(!record.contains_key("تاریخ:"));
        assert_eq!(record.len(), 0);
    }

    #[test]
    fn pruned_column_shifts_cells_left() {
        let extracted = vec![
            vec![
                Some("1404".to_string()),
                Some("07".to_string()),
                None,
                Some("10".to_string()),
                Some("x".to_string()),
                Some("روز هفته:".to_string()),
                Some("شنبه".to_string()),
            ],
            vec![None; 7],
        ];
        let pruned = RawGrid::from_extracted(&extracted);
        assert!(!pruned.row(0).unwrap().has_column(2));

        let record = map_header(&pruned);
        assert_eq!(
            entries(&record),
            vec![("تاریخ", "14040710x"), ("روز هفته", "شنبه")]
        );
    }

    #[test]
    fn empty_grid_gives_empty_header() {
        assert!(map_header(&RawGrid::default()).is_empty());
    }

    #[test]
    fn mapping_is_idempotent() {
        let g = grid(&["1404", "07", "10", "", "رییس دستگاه: احمد", "O3", "دستگاه حفاری:"]);
        assert_eq!(map_header(&g), map_header(&g));
    }
}
