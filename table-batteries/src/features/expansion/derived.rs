//! Render-time expansion helpers

use super::ExpandableVariant;
use super::ExpandedCell;
use super::ExpansionState;
use crate::types::ColumnKey;
use crate::types::TableItem;

/// Expansion helpers; single and compound expansion share one map.
#[derive(Debug, Clone)]
pub struct ExpansionDerivedState {
    state: ExpansionState,
}

impl ExpansionDerivedState {
    pub fn new(state: ExpansionState) -> Self {
        Self { state }
    }

    /// With no column, whether anything is expanded for `item`; with a
    /// column, whether that compound cell is the expanded one.
    pub fn is_cell_expanded<T: TableItem>(&self, item: &T, column_key: Option<&ColumnKey>) -> bool {
        let cells = self.state.expanded_cells();
        match (cells.get(&item.item_id().to_string()), column_key) {
            (None, _) => false,
            (Some(ExpandedCell::Row(expanded)), None) => *expanded,
            (Some(ExpandedCell::Row(_)), Some(_)) => false,
            (Some(ExpandedCell::Cell(_)), None) => true,
            (Some(ExpandedCell::Cell(expanded)), Some(column)) => expanded == column,
        }
    }

    /// Expands or collapses a row (no column) or a compound cell.
    ///
    /// Collapsing removes the item's entry whichever cell was expanded.
    pub fn set_cell_expanded<T: TableItem>(
        &self,
        item: &T,
        is_expanding: bool,
        column_key: Option<ColumnKey>,
    ) {
        let mut cells = self.state.expanded_cells();
        let id = item.item_id().to_string();

        if is_expanding {
            let cell = column_key.map_or(ExpandedCell::Row(true), ExpandedCell::Cell);
            cells.insert(id, cell);
        } else {
            cells.remove(&id);
        }
        self.state.set_expanded_cells(cells);
    }

    pub fn toggle_row_expanded<T: TableItem>(&self, item: &T) {
        let expanded = self.is_cell_expanded(item, None);
        self.set_cell_expanded(item, !expanded, None);
    }

    /// Toggles a compound cell; expanding it collapses any other cell of the
    /// same item.
    pub fn toggle_cell_expanded<T: TableItem>(&self, item: &T, column_key: &ColumnKey) {
        let expanded = self.is_cell_expanded(item, Some(column_key));
        self.set_cell_expanded(item, !expanded, Some(column_key.clone()));
    }

    /// The expanded compound column of `item`, if any.
    pub fn expanded_column<T: TableItem>(&self, item: &T) -> Option<ColumnKey> {
        match self.state.expanded_cells().remove(&item.item_id().to_string()) {
            Some(ExpandedCell::Cell(column)) => Some(column),
            _ => None,
        }
    }

    pub fn variant(&self) -> Option<ExpandableVariant> {
        self.state.variant()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }
}
