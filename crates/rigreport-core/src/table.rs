//! Ruled-table detection.
//!
//! Tables are found from painted lines only: edges are snapped and joined,
//! their crossings become intersections, the smallest closed rectangles between
//! connected intersections become cells, and cells sharing corners are grouped
//! into tables.

use std::collections::{HashMap, HashSet};

use crate::edges::Edge;
use crate::geometry::{BBox, Orientation};
use crate::text::Char;
use crate::words::{WordOptions, extract_text};

/// Configuration for table detection.
///
/// The defaults are tuned for the report forms: snap 4, join 4, intersection 5,
/// minimum edge length 3 and text tolerance 3.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSettings {
    /// Snap tolerance for vertical edges (clustering by x).
    pub snap_x_tolerance: f64,
    /// Snap tolerance for horizontal edges (clustering by y).
    pub snap_y_tolerance: f64,
    /// Join tolerance for horizontal edges.
    pub join_x_tolerance: f64,
    /// Join tolerance for vertical edges.
    pub join_y_tolerance: f64,
    /// Minimum edge length kept after merging.
    pub edge_min_length: f64,
    pub intersection_x_tolerance: f64,
    pub intersection_y_tolerance: f64,
    /// Word gap tolerance for cell text.
    pub text_x_tolerance: f64,
    /// Line clustering tolerance for cell text.
    pub text_y_tolerance: f64,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            snap_x_tolerance: 4.0,
            snap_y_tolerance: 4.0,
            join_x_tolerance: 4.0,
            join_y_tolerance: 4.0,
            edge_min_length: 3.0,
            intersection_x_tolerance: 5.0,
            intersection_y_tolerance: 5.0,
            text_x_tolerance: 3.0,
            text_y_tolerance: 3.0,
        }
    }
}

impl TableSettings {
    /// Set the snap, join and intersection tolerances on both axes.
    pub fn with_tolerances(snap: f64, join: f64, intersection: f64) -> Self {
        Self {
            snap_x_tolerance: snap,
            snap_y_tolerance: snap,
            join_x_tolerance: join,
            join_y_tolerance: join,
            intersection_x_tolerance: intersection,
            intersection_y_tolerance: intersection,
            ..Self::default()
        }
    }

    fn word_options(&self) -> WordOptions {
        WordOptions {
            x_tolerance: self.text_x_tolerance,
            y_tolerance: self.text_y_tolerance,
        }
    }
}

/// A detected table: a connected group of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Bounding box enclosing the entire table.
    pub bbox: BBox,
    /// Cell boxes in detection order.
    pub cells: Vec<BBox>,
}

impl Table {
    fn from_cells(cells: Vec<BBox>) -> Self {
        let mut bbox = cells[0];
        for cell in &cells[1..] {
            bbox = bbox.union(cell);
        }
        Self { bbox, cells }
    }

    /// Cells arranged as rows over the table's column positions.
    ///
    /// Rows are the distinct cell tops; columns are the distinct cell left edges
    /// of the whole table. A row holds `None` where no cell starts at a column,
    /// which is how merged cells show up.
    pub fn rows(&self) -> Vec<Vec<Option<BBox>>> {
        let mut xs: Vec<f64> = self.cells.iter().map(|c| c.x0).collect();
        xs.sort_by(f64::total_cmp);
        xs.dedup();

        let mut sorted = self.cells.clone();
        sorted.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.x0.total_cmp(&b.x0)));

        let mut rows: Vec<Vec<Option<BBox>>> = Vec::new();
        let mut i = 0;
        while i < sorted.len() {
            let top = sorted[i].top;
            let mut by_x: HashMap<u64, BBox> = HashMap::new();
            while i < sorted.len() && sorted[i].top == top {
                by_x.insert(sorted[i].x0.to_bits(), sorted[i]);
                i += 1;
            }
            rows.push(xs.iter().map(|x| by_x.get(&x.to_bits()).copied()).collect());
        }
        rows
    }

    /// Extract cell text row by row.
    ///
    /// A char belongs to a cell when its center lies in the cell (left/top
    /// inclusive, right/bottom exclusive). A present cell without chars yields
    /// `Some("")`; an absent cell yields `None`.
    pub fn extract(&self, chars: &[Char], settings: &TableSettings) -> Vec<Vec<Option<String>>> {
        let options = settings.word_options();
        self.rows()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        cell.map(|cell| {
                            let cell_chars: Vec<Char> = chars
                                .iter()
                                .filter(|ch| center_in_cell(ch, &cell))
                                .cloned()
                                .collect();
                            extract_text(&cell_chars, &options)
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

fn center_in_cell(ch: &Char, cell: &BBox) -> bool {
    let (cx, cy) = ch.bbox.center();
    cx >= cell.x0 && cx < cell.x1 && cy >= cell.top && cy < cell.bottom
}

/// Snap nearby parallel edges to aligned positions.
///
/// Vertical edges are clustered by `x0` and horizontal edges by `top`. A cluster
/// grows while each next value is within tolerance of the previous one, and every
/// member moves to the cluster mean. Edges are only aligned here, not merged.
pub fn snap_edges(edges: Vec<Edge>, snap_x_tolerance: f64, snap_y_tolerance: f64) -> Vec<Edge> {
    let (mut verticals, mut horizontals): (Vec<Edge>, Vec<Edge>) = edges
        .into_iter()
        .filter(|e| e.orientation != Orientation::Diagonal)
        .partition(|e| e.orientation == Orientation::Vertical);

    snap_group(&mut verticals, snap_x_tolerance, |e| e.x0, |e, v| {
        e.x0 = v;
        e.x1 = v;
    });
    snap_group(&mut horizontals, snap_y_tolerance, |e| e.top, |e, v| {
        e.top = v;
        e.bottom = v;
    });

    verticals.extend(horizontals);
    verticals
}

fn snap_group<F, G>(edges: &mut [Edge], tolerance: f64, key: F, mut set: G)
where
    F: Fn(&Edge) -> f64,
    G: FnMut(&mut Edge, f64),
{
    if edges.is_empty() || tolerance <= 0.0 {
        return;
    }
    edges.sort_by(|a, b| key(a).total_cmp(&key(b)));

    let mut start = 0;
    for i in 1..=edges.len() {
        let end_of_cluster = i == edges.len() || key(&edges[i]) > key(&edges[i - 1]) + tolerance;
        if end_of_cluster {
            let sum: f64 = edges[start..i].iter().map(&key).sum();
            let mean = sum / (i - start) as f64;
            for edge in &mut edges[start..i] {
                set(edge, mean);
            }
            start = i;
        }
    }
}

/// Merge overlapping or nearly touching collinear edges.
///
/// Horizontal edges on the same `top` merge when the gap along x is within
/// `join_x_tolerance`; vertical edges on the same `x0` merge when the gap along
/// y is within `join_y_tolerance`.
pub fn join_edge_group(edges: Vec<Edge>, join_x_tolerance: f64, join_y_tolerance: f64) -> Vec<Edge> {
    let (verticals, horizontals): (Vec<Edge>, Vec<Edge>) = edges
        .into_iter()
        .filter(|e| e.orientation != Orientation::Diagonal)
        .partition(|e| e.orientation == Orientation::Vertical);

    let mut result = join_collinear(
        horizontals,
        |e| e.top,
        |e| (e.x0, e.x1),
        |e, start, end| {
            e.x0 = start;
            e.x1 = end;
        },
        join_x_tolerance,
    );
    result.extend(join_collinear(
        verticals,
        |e| e.x0,
        |e| (e.top, e.bottom),
        |e, start, end| {
            e.top = start;
            e.bottom = end;
        },
        join_y_tolerance,
    ));
    result
}

fn join_collinear<K, S, R>(mut edges: Vec<Edge>, key: K, span: S, resize: R, tolerance: f64) -> Vec<Edge>
where
    K: Fn(&Edge) -> f64,
    S: Fn(&Edge) -> (f64, f64),
    R: Fn(&mut Edge, f64, f64),
{
    edges.sort_by(|a, b| key(a).total_cmp(&key(b)).then(span(a).0.total_cmp(&span(b).0)));

    let mut result: Vec<Edge> = Vec::new();
    let mut group_key: Option<f64> = None;
    for edge in edges {
        let same_line = group_key == Some(key(&edge));
        let (start, end) = span(&edge);
        if let Some(last) = result.last_mut().filter(|_| same_line) {
            let (last_start, last_end) = span(last);
            if start <= last_end + tolerance {
                if end > last_end {
                    resize(last, last_start, end);
                }
                continue;
            }
        }
        group_key = Some(key(&edge));
        result.push(edge);
    }
    result
}

/// A crossing of at least one vertical and one horizontal edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    pub x: f64,
    pub y: f64,
    /// Indices of the vertical edges passing through this point.
    pub v_edges: Vec<usize>,
    /// Indices of the horizontal edges passing through this point.
    pub h_edges: Vec<usize>,
}

/// Find the points where vertical and horizontal edges meet.
///
/// A vertex `(v.x0, h.top)` exists when the vertical's x lies within the
/// horizontal's span and the horizontal's y within the vertical's span, each
/// widened by its tolerance. The result is sorted by `(x, y)`; edge indices refer
/// to `edges`.
pub fn edges_to_intersections(edges: &[Edge], x_tolerance: f64, y_tolerance: f64) -> Vec<Intersection> {
    let mut points: Vec<Intersection> = Vec::new();
    let mut index: HashMap<(u64, u64), usize> = HashMap::new();

    for (vi, v) in edges.iter().enumerate() {
        if v.orientation != Orientation::Vertical {
            continue;
        }
        for (hi, h) in edges.iter().enumerate() {
            if h.orientation != Orientation::Horizontal {
                continue;
            }
            let meets = v.top <= h.top + y_tolerance
                && v.bottom >= h.top - y_tolerance
                && v.x0 >= h.x0 - x_tolerance
                && v.x0 <= h.x1 + x_tolerance;
            if !meets {
                continue;
            }
            let slot = *index.entry((v.x0.to_bits(), h.top.to_bits())).or_insert_with(|| {
                points.push(Intersection {
                    x: v.x0,
                    y: h.top,
                    v_edges: Vec::new(),
                    h_edges: Vec::new(),
                });
                points.len() - 1
            });
            let point = &mut points[slot];
            if !point.v_edges.contains(&vi) {
                point.v_edges.push(vi);
            }
            if !point.h_edges.contains(&hi) {
                point.h_edges.push(hi);
            }
        }
    }

    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points
}

/// Build cells from intersections.
///
/// For each point, the first point below it and the first point right of it that
/// are joined to it by a shared edge, and whose opposite corner exists and is
/// joined to both, close the smallest cell anchored at that point.
pub fn intersections_to_cells(intersections: &[Intersection]) -> Vec<BBox> {
    let lookup: HashMap<(u64, u64), &Intersection> = intersections
        .iter()
        .map(|p| ((p.x.to_bits(), p.y.to_bits()), p))
        .collect();

    let shares = |a: &[usize], b: &[usize]| a.iter().any(|e| b.contains(e));
    let connects = |p: &Intersection, q: &Intersection| {
        (p.x == q.x && shares(&p.v_edges, &q.v_edges)) || (p.y == q.y && shares(&p.h_edges, &q.h_edges))
    };

    let mut cells = Vec::new();
    for (i, pt) in intersections.iter().enumerate() {
        let rest = &intersections[i + 1..];
        let below = rest.iter().filter(|p| p.x == pt.x);
        let cell = below
            .filter(|b| connects(pt, b))
            .find_map(|below_pt| {
                rest.iter()
                    .filter(|p| p.y == pt.y && connects(pt, p))
                    .find_map(|right_pt| {
                        let corner = lookup.get(&(right_pt.x.to_bits(), below_pt.y.to_bits()))?;
                        (connects(corner, right_pt) && connects(corner, below_pt))
                            .then(|| BBox::new(pt.x, pt.y, corner.x, corner.y))
                    })
            });
        if let Some(cell) = cell {
            cells.push(cell);
        }
    }
    cells
}

/// Group cells that share corners into tables.
///
/// Tables with a single cell are discarded; the rest are ordered by their
/// top-most, then left-most cell.
pub fn cells_to_tables(cells: Vec<BBox>) -> Vec<Table> {
    fn corners(c: &BBox) -> [(u64, u64); 4] {
        [
            (c.x0.to_bits(), c.top.to_bits()),
            (c.x0.to_bits(), c.bottom.to_bits()),
            (c.x1.to_bits(), c.top.to_bits()),
            (c.x1.to_bits(), c.bottom.to_bits()),
        ]
    }

    let mut remaining = cells;
    let mut groups: Vec<Vec<BBox>> = Vec::new();
    while !remaining.is_empty() {
        let mut group = vec![remaining.remove(0)];
        let mut seen: HashSet<(u64, u64)> = corners(&group[0]).into_iter().collect();
        loop {
            let before = group.len();
            let mut i = 0;
            while i < remaining.len() {
                let cell_corners = corners(&remaining[i]);
                if cell_corners.iter().any(|c| seen.contains(c)) {
                    seen.extend(cell_corners);
                    group.push(remaining.remove(i));
                } else {
                    i += 1;
                }
            }
            if group.len() == before {
                break;
            }
        }
        groups.push(group);
    }

    let mut tables: Vec<Table> = groups
        .into_iter()
        .filter(|g| g.len() > 1)
        .map(Table::from_cells)
        .collect();
    tables.sort_by(|a, b| top_left(a).partial_cmp(&top_left(b)).unwrap_or(std::cmp::Ordering::Equal));
    tables
}

fn top_left(table: &Table) -> (f64, f64) {
    table
        .cells
        .iter()
        .map(|c| (c.top, c.x0))
        .fold((f64::INFINITY, f64::INFINITY), |acc, p| if p < acc { p } else { acc })
}

/// Orchestrator for the table detection pipeline.
pub struct TableFinder {
    edges: Vec<Edge>,
    settings: TableSettings,
}

impl TableFinder {
    pub fn new(edges: Vec<Edge>, settings: TableSettings) -> Self {
        Self { edges, settings }
    }

    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    /// The edges after snapping, joining and length filtering.
    pub fn merged_edges(&self) -> Vec<Edge> {
        let s = &self.settings;
        let edges: Vec<Edge> = self.edges.iter().filter(|e| e.length() >= 1.0).cloned().collect();
        let edges = snap_edges(edges, s.snap_x_tolerance, s.snap_y_tolerance);
        let edges = join_edge_group(edges, s.join_x_tolerance, s.join_y_tolerance);
        edges
            .into_iter()
            .filter(|e| e.length() >= s.edge_min_length)
            .collect()
    }

    /// Run the pipeline: merge edges → intersections → cells → tables.
    pub fn find_tables(&self) -> Vec<Table> {
        let edges = self.merged_edges();
        let intersections = edges_to_intersections(
            &edges,
            self.settings.intersection_x_tolerance,
            self.settings.intersection_y_tolerance,
        );
        cells_to_tables(intersections_to_cells(&intersections))
    }

    /// The table with the most cells; ties go to the top-most, then left-most.
    pub fn largest_table(&self) -> Option<Table> {
        self.find_tables().into_iter().min_by(|a, b| {
            b.cells
                .len()
                .cmp(&a.cells.len())
                .then(a.bbox.top.total_cmp(&b.bbox.top))
                .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        })
    }
}
