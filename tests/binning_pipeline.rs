use std::collections::HashSet;

use numeric_binner::binning::{compute_intervals, CancelFlag};
use numeric_binner::data::loader::load_file;
use numeric_binner::data::writer::write_csv;
use numeric_binner::node::{BinnerNode, OUTPUT_COLUMN_NAME};
use numeric_binner::{BinnerSettings, BinningError, HiliteAuthority, HiliteHandler, RowKey, SelectionCoordinator};

const CSV: &str = "\
row_id,reading,site
r0,0.0,north
r1,3.0,south
r2,3.0001,north
r3,,east
r4,6.5,south
r5,9.0,north
r6,1.0,east
";

fn write_input(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("input.csv");
    std::fs::write(&path, CSV).unwrap();
    path
}

fn keys(names: &[&str]) -> HashSet<RowKey> {
    names.iter().map(|n| RowKey::from(*n)).collect()
}

#[test]
fn csv_to_labels_and_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let table = load_file(&write_input(dir.path())).unwrap();

    let mut node = BinnerNode::new(BinnerSettings::new("reading", 3));
    node.configure(&table).unwrap();
    let labels = node.execute(&table, &CancelFlag::new()).unwrap();
    assert_eq!(
        labels,
        vec![Some(0), Some(0), Some(1), None, Some(2), Some(2), Some(0)]
    );

    let bins = node.bins().unwrap();
    let sizes: Vec<usize> = bins.bins().iter().map(|b| b.size()).collect();
    assert_eq!(sizes, vec![3, 1, 2]);
    assert_eq!(bins.intervals().unwrap(), compute_intervals(0.0, 9.0, 3).unwrap().as_slice());

    let out = dir.path().join("out.csv");
    write_csv(&table, &labels, OUTPUT_COLUMN_NAME, &out).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("row_id,reading,site,Bin Number"));
    assert_eq!(lines.nth(3), Some("r3,,east,"));
}

#[test]
fn restored_bins_drive_selection_and_hilite() {
    let dir = tempfile::tempdir().unwrap();
    let table = load_file(&write_input(dir.path())).unwrap();

    let mut node = BinnerNode::new(BinnerSettings::new("reading", 3));
    node.execute(&table, &CancelFlag::new()).unwrap();
    let internals = dir.path().join("internals");
    std::fs::create_dir(&internals).unwrap();
    node.save_internals(&internals).unwrap();

    let mut restored = BinnerNode::new(BinnerSettings::new("reading", 3));
    restored.load_internals(&internals).unwrap();
    let bins = restored.bins_mut().unwrap();

    let mut handler = HiliteHandler::new();
    let events = handler.subscribe();
    let mut coordinator = SelectionCoordinator::new(handler);

    coordinator.select(bins, 0, false).unwrap();
    coordinator.select(bins, 1, true).unwrap();
    let requested = coordinator.request_hilite(bins);
    assert_eq!(requested, keys(&["r0", "r1", "r6", "r2"]));

    for event in events.try_iter() {
        coordinator.apply(bins, &event);
    }
    assert_eq!(bins.highlighted_indices(), vec![0, 1]);

    // Another view unhilites one row of bin 2 that was never hilit: no change.
    coordinator.authority_mut().fire_unhilite(&keys(&["r4"]));
    // ...then one row of bin 0: bin 0 goes dark, bin 1 stays lit.
    coordinator.authority_mut().fire_unhilite(&keys(&["r6"]));
    for event in events.try_iter() {
        coordinator.apply(bins, &event);
    }
    assert_eq!(bins.highlighted_indices(), vec![1]);

    coordinator.request_clear_all();
    for event in events.try_iter() {
        coordinator.apply(bins, &event);
    }
    assert!(bins.highlighted_indices().is_empty());
    assert_eq!(bins.selected_indices(), vec![0, 1]);
}

#[test]
fn configuration_errors_block_execution() {
    let dir = tempfile::tempdir().unwrap();
    let table = load_file(&write_input(dir.path())).unwrap();

    let mut node = BinnerNode::new(BinnerSettings::new("site", 3));
    assert!(matches!(
        node.execute(&table, &CancelFlag::new()),
        Err(BinningError::ColumnNotFound(_))
    ));
    assert!(node.bins().is_none());

    assert!(matches!(
        node.load_settings(BinnerSettings::new("reading", 0)),
        Err(BinningError::InvalidBinCount(0))
    ));
}
