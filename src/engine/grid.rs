// src/engine/grid.rs
//! Table layout: rows of spanned cells → dense `(row, col)` grid.
//!
//! Follows the browser's table layout. A cell is placed at the first free
//! column; a `colspan` replicates it across contiguous columns and a
//! `rowspan` keeps those columns occupied in following rows. Only the
//! top-left slot of a span is the origin; every other slot it covers is
//! flagged `inherited`.

use std::collections::{BTreeMap, HashMap};

use super::types::SpanCell;

/// One grid slot: borrowed cell content plus whether this slot is a copy.
#[derive(Debug)]
pub struct GridCell<'a, C> {
    pub content: &'a C,
    pub inherited: bool,
}

impl<C> Clone for GridCell<'_, C> {
    fn clone(&self) -> Self { *self }
}
impl<C> Copy for GridCell<'_, C> {}

pub type GridRow<'a, C> = BTreeMap<usize, GridCell<'a, C>>;

#[derive(Debug)]
pub struct Grid<'a, C> {
    rows: Vec<GridRow<'a, C>>,
}

impl<'a, C> Grid<'a, C> {
    pub fn rows(&self) -> &[GridRow<'a, C>] { &self.rows }

    pub fn get(&self, row: usize, col: usize) -> Option<GridCell<'a, C>> {
        self.rows.get(row)?.get(&col).copied()
    }

    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

/// Cells still covering future rows: column → (content, rows left).
struct Active<'a, C> {
    cols: HashMap<usize, (&'a C, usize)>,
}

impl<'a, C> Active<'a, C> {
    /// Copy the live entry at `col` (if any) into `row` and count it down.
    fn take(&mut self, col: usize, row: &mut GridRow<'a, C>) -> bool {
        let Some((content, remaining)) = self.cols.get(&col).copied() else {
            return false;
        };
        row.insert(col, GridCell { content, inherited: true });
        if remaining <= 1 {
            self.cols.remove(&col);
        } else {
            self.cols.insert(col, (content, remaining - 1));
        }
        true
    }

    /// Consume consecutive live columns starting at `col`; returns the first gap.
    fn consume_until_gap(&mut self, mut col: usize, row: &mut GridRow<'a, C>) -> usize {
        while self.take(col, row) {
            col += 1;
        }
        col
    }

    fn next_live_after(&self, col: usize) -> Option<usize> {
        self.cols.keys().copied().filter(|&k| k > col).min()
    }
}

pub fn expand<C>(rows: &[Vec<SpanCell<C>>]) -> Grid<'_, C> {
    let mut active = Active { cols: HashMap::new() };
    let mut out = Vec::with_capacity(rows.len());

    for tr in rows {
        let mut row: GridRow<'_, C> = BTreeMap::new();
        let mut col = active.consume_until_gap(0, &mut row);

        for cell in tr {
            col = active.consume_until_gap(col, &mut row);
            let row_span = cell.row_span.max(1);
            let col_span = cell.col_span.max(1);

            for offset in 0..col_span {
                let idx = col + offset;
                row.insert(idx, GridCell { content: &cell.content, inherited: offset > 0 });
                if row_span > 1 {
                    active.cols.insert(idx, (&cell.content, row_span - 1));
                } else {
                    // a fresh cell placed over a stale span ends that span
                    active.cols.remove(&idx);
                }
            }
            col += col_span;
            col = active.consume_until_gap(col, &mut row);
        }

        // spans hanging to the right of the last real cell
        loop {
            if active.take(col, &mut row) {
                col += 1;
                continue;
            }
            match active.next_live_after(col) {
                Some(next) => col = next,
                None => break,
            }
        }

        out.push(row);
    }

    Grid { rows: out }
}
