use super::*;

fn table(id: Id, label: &str, capacity: u32) -> Table {
    Table { id, table_number: label.into(), capacity, x: f64::from(u32::try_from(id).unwrap_or(0) * 60), y: 20.0 }
}

fn layout() -> Vec<Table> {
    vec![table(1, "A1", 2), table(2, "A2", 4), table(7, "A3", 4), table(9, "B1", 6)]
}

// =============================================================
// TableShape
// =============================================================

#[test]
fn shape_buckets_by_capacity() {
    assert_eq!(TableShape::for_capacity(1), TableShape::Round);
    assert_eq!(TableShape::for_capacity(2), TableShape::Round);
    assert_eq!(TableShape::for_capacity(3), TableShape::Square);
    assert_eq!(TableShape::for_capacity(4), TableShape::Square);
    assert_eq!(TableShape::for_capacity(5), TableShape::Rect);
    assert_eq!(TableShape::for_capacity(12), TableShape::Rect);
}

#[test]
fn shape_sizes_and_chairs() {
    assert_eq!(TableShape::Round.size(), (40.0, 40.0));
    assert_eq!(TableShape::Square.size(), (50.0, 50.0));
    assert_eq!(TableShape::Rect.size(), (70.0, 50.0));
    assert_eq!(TableShape::Round.chairs(), 2);
    assert_eq!(TableShape::Square.chairs(), 4);
    assert_eq!(TableShape::Rect.chairs(), 6);
}

// =============================================================
// Classification
// =============================================================

#[test]
fn default_classification_is_unavailable() {
    let grid = TableGrid::new(layout());
    for t in grid.tables() {
        assert_eq!(grid.classify(t.id), Availability::Unavailable);
    }
    assert_eq!(Availability::default(), Availability::Unavailable);
}

#[test]
fn tables_outside_result_are_never_selectable() {
    let mut grid = TableGrid::new(layout());
    grid.set_available([2, 7]);
    for t in layout() {
        let in_result = t.id == 2 || t.id == 7;
        assert_eq!(grid.classify(t.id) == Availability::Available, in_result, "table {}", t.id);
        assert_eq!(grid.clone().select(t.id), in_result, "table {}", t.id);
    }
}

#[test]
fn unknown_ids_in_result_are_ignored() {
    let mut grid = TableGrid::new(layout());
    grid.set_available([99]);
    assert_eq!(grid.classify(99), Availability::Unavailable);
    assert!(!grid.select(99));
    assert_eq!(grid.available_count(), 0);
}

#[test]
fn available_count_matches_result() {
    let mut grid = TableGrid::new(layout());
    grid.set_available([1, 7, 9]);
    assert_eq!(grid.available_count(), 3);
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selecting_unavailable_is_noop() {
    let mut grid = TableGrid::new(layout());
    grid.set_available([7]);
    assert!(grid.select(7));
    assert!(!grid.select(1));
    assert_eq!(grid.selected_id(), Some(7));
}

#[test]
fn selecting_replaces_previous_selection() {
    let mut grid = TableGrid::new(layout());
    grid.set_available([1, 2, 7, 9]);
    for id in [1, 9, 2, 7, 7, 1] {
        assert!(grid.select(id));
        let selected: Vec<_> = grid.project().into_iter().filter(|v| v.selected).map(|v| v.id).collect();
        assert_eq!(selected, vec![id]);
    }
}

#[test]
fn new_result_drops_selection_no_longer_available() {
    let mut grid = TableGrid::new(layout());
    grid.set_available([2, 7]);
    grid.select(7);
    grid.set_available([2]);
    assert!(grid.selected().is_none());
}

#[test]
fn new_result_keeps_selection_still_available() {
    let mut grid = TableGrid::new(layout());
    grid.set_available([2, 7]);
    grid.select(7);
    grid.set_available([7, 9]);
    assert_eq!(grid.selected().map(|t| t.table_number.as_str()), Some("A3"));
}

#[test]
fn mark_unavailable_clears_matching_selection() {
    let mut grid = TableGrid::new(layout());
    grid.set_available([2, 7]);
    grid.select(7);
    grid.mark_unavailable(7);
    assert!(grid.selected_id().is_none());
    assert_eq!(grid.classify(7), Availability::Unavailable);
    assert_eq!(grid.classify(2), Availability::Available);
}

#[test]
fn set_layout_resets_everything() {
    let mut grid = TableGrid::new(layout());
    grid.set_available([7]);
    grid.select(7);
    grid.set_layout(vec![table(3, "C1", 2)]);
    assert!(grid.selected_id().is_none());
    assert_eq!(grid.available_count(), 0);
}

// =============================================================
// Projection
// =============================================================

#[test]
fn projection_is_deterministic() {
    let mut grid = TableGrid::new(layout());
    grid.set_available([7]);
    grid.select(7);
    assert_eq!(grid.project(), grid.project());
}

#[test]
fn projection_carries_geometry_and_state() {
    let mut grid = TableGrid::new(layout());
    grid.set_available([7, 9]);
    grid.select(9);
    let views = grid.project();
    assert_eq!(views.len(), 4);

    let b1 = views.iter().find(|v| v.id == 9).unwrap();
    assert_eq!(b1.label, "B1");
    assert_eq!(b1.shape, TableShape::Rect);
    assert_eq!(b1.chairs, 6);
    assert_eq!((b1.width, b1.height), (70.0, 50.0));
    assert_eq!((b1.x, b1.y), (540.0, 20.0));
    assert!(b1.selected);
    assert!(b1.is_selectable());

    let a1 = views.iter().find(|v| v.id == 1).unwrap();
    assert_eq!(a1.shape, TableShape::Round);
    assert_eq!(a1.chairs, 2);
    assert!(!a1.is_selectable());
    assert!(!a1.selected);
}
