#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use std::collections::HashSet;

use crate::net::types::{Id, Table};

/// Whether a table can be picked for the current query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Availability {
    Available,
    #[default]
    Unavailable,
}

/// Visual template for a table, bucketed by seating capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableShape {
    /// Up to two seats.
    Round,
    /// Three or four seats.
    Square,
    /// Five or more seats.
    Rect,
}

impl TableShape {
    #[must_use]
    pub fn for_capacity(capacity: u32) -> Self {
        match capacity {
            0..=2 => Self::Round,
            3..=4 => Self::Square,
            _ => Self::Rect,
        }
    }

    /// Footprint in layout pixels as `(width, height)`.
    #[must_use]
    pub fn size(self) -> (f64, f64) {
        match self {
            Self::Round => (40.0, 40.0),
            Self::Square => (50.0, 50.0),
            Self::Rect => (70.0, 50.0),
        }
    }

    /// Chairs drawn around the template.
    #[must_use]
    pub fn chairs(self) -> u32 {
        match self {
            Self::Round => 2,
            Self::Square => 4,
            Self::Rect => 6,
        }
    }
}

/// One table as the grid renders it.
#[derive(Clone, Debug, PartialEq)]
pub struct TableView {
    pub id: Id,
    pub label: String,
    pub capacity: u32,
    pub shape: TableShape,
    /// Chairs drawn around the table.
    pub chairs: u32,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub availability: Availability,
    pub selected: bool,
}

impl TableView {
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.availability == Availability::Available
    }
}

/// Static layout merged with the latest availability result.
///
/// Holds at most one selected table, and only ever an available one.
#[derive(Clone, Debug, Default)]
pub struct TableGrid {
    tables: Vec<Table>,
    available: HashSet<Id>,
    selected: Option<Id>,
}

impl TableGrid {
    #[must_use]
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables, available: HashSet::new(), selected: None }
    }

    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    #[must_use]
    pub fn table(&self, id: Id) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    /// Replace the layout. Availability and selection refer to the old
    /// layout, so both are cleared.
    pub fn set_layout(&mut self, tables: Vec<Table>) {
        self.tables = tables;
        self.available.clear();
        self.selected = None;
    }

    /// Adopt a new availability result. A selection that is no longer
    /// available is dropped.
    pub fn set_available<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = Id>,
    {
        self.available = ids.into_iter().collect();
        if let Some(id) = self.selected {
            if self.classify(id) == Availability::Available {
                return;
            }
            self.selected = None;
        }
    }

    /// Forget availability entirely (parameters changed, result pending).
    pub fn clear_available(&mut self) {
        self.available.clear();
        self.selected = None;
    }

    /// Mark one table as taken without refetching.
    pub fn mark_unavailable(&mut self, id: Id) {
        self.available.remove(&id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Available iff the table is in the layout and in the latest result.
    #[must_use]
    pub fn classify(&self, id: Id) -> Availability {
        if self.available.contains(&id) && self.table(id).is_some() {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }

    #[must_use]
    pub fn available_count(&self) -> usize {
        self.tables
            .iter()
            .filter(|t| self.classify(t.id) == Availability::Available)
            .count()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Table> {
        self.selected.and_then(|id| self.table(id))
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<Id> {
        self.selected
    }

    /// Select `id` if it is available, replacing any prior selection.
    /// Unavailable or unknown tables are ignored and `false` is returned.
    pub fn select(&mut self, id: Id) -> bool {
        if self.classify(id) != Availability::Available {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Render-ready projection of every table, in layout order.
    #[must_use]
    pub fn project(&self) -> Vec<TableView> {
        self.tables
            .iter()
            .map(|t| {
                let shape = TableShape::for_capacity(t.capacity);
                let (width, height) = shape.size();
                TableView {
                    id: t.id,
                    label: t.table_number.clone(),
                    capacity: t.capacity,
                    shape,
                    chairs: shape.chairs(),
                    width,
                    height,
                    x: t.x,
                    y: t.y,
                    availability: self.classify(t.id),
                    selected: self.selected == Some(t.id),
                }
            })
            .collect()
    }
}
