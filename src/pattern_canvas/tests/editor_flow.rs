mod common;

use common::{MARKET_CSV, TestDir, draw, dt, editor, viewport};
use pattern_canvas::config::{EditorConfig, load_config_str};
use pattern_canvas::{PatternEditor, PatternError};

#[test]
fn pixel_centre_maps_to_mid_range() {
    let editor = editor();
    let mapper = editor.mapper().unwrap();

    let mid = mapper.to_data(500.0, 250.0);
    assert_eq!(mid.datetime, dt(1, 5, 12, 0));
    assert!((mid.price - 150.0).abs() < 1e-9);

    let top_left = mapper.to_data(0.0, 0.0);
    assert_eq!(top_left.datetime, dt(1, 1, 0, 0));
    assert!((top_left.price - 200.0).abs() < 1e-9);
}

#[test]
fn three_point_gesture_exports_one_stroke() {
    let mut editor = editor();
    draw(&mut editor, &[(10.0, 10.0), (20.0, 20.0), (30.0, 10.0)]);

    let csv = editor.export_patterns().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "stroke_id,datetime,open,high,low,close,volume");
    assert_eq!(lines.len(), 4);
    for line in &lines[1..] {
        let cols: Vec<&str> = line.split(',').collect();
        assert_eq!(cols[0], "0");
        assert_eq!(cols[6], "0");
        assert_eq!(cols[2], cols[5]);
    }
    // y=10 on a 500px canvas over 100..200
    assert!(lines[1].ends_with(",198.0,198.0,198.0,198.0,0"));
}

#[test]
fn clearing_restarts_ids_at_zero() {
    let mut editor = editor();
    draw(&mut editor, &[(10.0, 10.0), (20.0, 20.0)]);
    draw(&mut editor, &[(40.0, 40.0), (50.0, 50.0)]);
    assert_eq!(editor.strokes()[1].id, 1);

    editor.clear_patterns();
    assert!(editor.strokes().is_empty());

    draw(&mut editor, &[(60.0, 60.0), (70.0, 70.0)]);
    assert_eq!(editor.strokes().len(), 1);
    assert_eq!(editor.strokes()[0].id, 0);
}

#[test]
fn click_without_drag_creates_no_stroke() {
    let mut editor = editor();
    assert_eq!(editor.pointer_down(100.0, 100.0).unwrap(), Some(0));
    assert_eq!(editor.pointer_up().unwrap(), None);

    assert!(editor.strokes().is_empty());
    let csv = editor.export_patterns().unwrap();
    assert_eq!(csv.lines().count(), 1);

    draw(&mut editor, &[(10.0, 10.0), (20.0, 20.0)]);
    assert_eq!(editor.strokes()[0].id, 0);
}

#[test]
fn click_keeps_nothing_even_with_duplicates_kept() {
    let config = load_config_str("[session]\nskip_duplicate_points = false\n").unwrap();
    let mut editor = PatternEditor::new(config);
    editor.load_series(MARKET_CSV).unwrap();
    editor.set_viewport(viewport());
    editor.set_drawing_enabled(true).unwrap();

    editor.pointer_down(100.0, 100.0).unwrap();
    editor.pointer_up().unwrap();
    assert!(editor.strokes().is_empty());

    // release at the last move position adds no row
    draw(&mut editor, &[(10.0, 10.0), (20.0, 20.0), (30.0, 10.0)]);
    assert_eq!(editor.export_patterns().unwrap().lines().count(), 4);
}

#[test]
fn disabled_drawing_ignores_pointer_events() {
    let mut editor = editor();
    editor.set_drawing_enabled(false).unwrap();

    assert_eq!(editor.pointer_down(10.0, 10.0).unwrap(), None);
    assert!(!editor.pointer_move(20.0, 20.0).unwrap());
    assert_eq!(editor.pointer_up().unwrap(), None);
    assert!(editor.strokes().is_empty());
}

#[test]
fn disabling_mid_gesture_seals_the_stroke() {
    let mut editor = editor();
    editor.pointer_down(10.0, 10.0).unwrap();
    editor.pointer_move(20.0, 20.0).unwrap();
    editor.set_drawing_enabled(false).unwrap();

    assert!(!editor.session().is_drawing());
    assert_eq!(editor.strokes().len(), 1);
    assert_eq!(editor.strokes()[0].len(), 2);
}

#[test]
fn lost_pointer_up_is_recovered_on_next_down() {
    let mut editor = editor();
    editor.pointer_down(10.0, 10.0).unwrap();
    editor.pointer_move(20.0, 20.0).unwrap();
    let second = editor.pointer_down(100.0, 100.0).unwrap();
    editor.pointer_move(120.0, 120.0).unwrap();
    editor.pointer_up().unwrap();

    assert_eq!(second, Some(1));
    let ids: Vec<_> = editor.strokes().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![0, 1]);
}

#[test]
fn pointer_before_data_is_series_not_loaded() {
    let mut editor = PatternEditor::default();
    editor.set_viewport(viewport());
    editor.set_drawing_enabled(true).unwrap();

    let err = editor.pointer_down(10.0, 10.0).unwrap_err();
    assert!(matches!(err, PatternError::SeriesNotLoaded));
    assert!(editor.strokes().is_empty());
    assert!(editor.summary().is_none());
}

#[test]
fn export_import_preserves_strokes() {
    let mut source = editor();
    draw(&mut source, &[(10.0, 10.0), (20.0, 20.0), (30.0, 10.0)]);
    draw(&mut source, &[(300.0, 400.0), (310.0, 380.0)]);
    let exported = source.export_patterns().unwrap();

    let mut target = editor();
    target.import_patterns(&exported).unwrap();

    assert_eq!(target.strokes().len(), 2);
    assert_eq!(target.store().point_count(), 5);
    assert_eq!(target.export_patterns().unwrap(), exported);

    // ids continue after the imported maximum
    draw(&mut target, &[(500.0, 250.0), (510.0, 260.0)]);
    assert_eq!(target.strokes()[2].id, 2);
}

#[test]
fn import_groups_by_first_appearance() {
    let mut editor = editor();
    editor
        .import_patterns(
            "stroke_id,datetime,open,high,low,close,volume\n\
             7,01/02/2025 00:00,0,0,0,150.0,0\n\
             3,01/03/2025 00:00,0,0,0,160.0,0\n\
             7,01/04/2025 00:00,0,0,0,170.0,0\n",
        )
        .unwrap();

    let strokes = editor.strokes();
    assert_eq!(strokes[0].id, 7);
    assert_eq!(strokes[0].len(), 2);
    assert_eq!(strokes[1].id, 3);
    assert_eq!(strokes[0].points[1].price, 170.0);
}

#[test]
fn bad_datetime_reports_row_and_keeps_existing_strokes() {
    let mut editor = editor();
    draw(&mut editor, &[(10.0, 10.0), (20.0, 20.0)]);

    let err = editor
        .import_patterns(
            "stroke_id,datetime,open,high,low,close,volume\n\
             0,01/01/2025 00:00,1,1,1,1,0\n\
             0,13/45/2025,1,1,1,1,0\n",
        )
        .unwrap_err();

    match err {
        PatternError::DateParse { row, raw } => {
            assert_eq!(row, 2);
            assert_eq!(raw, "13/45/2025");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(editor.strokes().len(), 1);
}

#[test]
fn largest_stroke_id_is_rejected_on_import() {
    let mut editor = editor();
    draw(&mut editor, &[(10.0, 10.0), (20.0, 20.0)]);

    let err = editor
        .import_patterns(
            "stroke_id,datetime,open,high,low,close,volume\n\
             4294967295,01/02/2025 00:00,1,1,1,1.0,0\n",
        )
        .unwrap_err();
    assert!(matches!(err, PatternError::InvalidStroke { id: u32::MAX }));
    assert_eq!(editor.strokes().len(), 1);

    editor
        .import_patterns(
            "stroke_id,datetime,open,high,low,close,volume\n\
             4294967294,01/02/2025 00:00,1,1,1,1.0,0\n",
        )
        .unwrap();
    assert!(matches!(
        editor.pointer_down(10.0, 10.0),
        Err(PatternError::InvalidStroke { .. })
    ));
}

#[test]
fn non_finite_pointer_samples_keep_export_importable() {
    let mut editor = editor();
    editor.pointer_down(10.0, 10.0).unwrap();
    editor.pointer_move(f64::NAN, 20.0).unwrap();
    editor.pointer_move(30.0, 30.0).unwrap();
    editor.pointer_up().unwrap();

    let exported = editor.export_patterns().unwrap();
    assert!(!exported.contains("NaN"));
    let mut target = common::editor();
    target.import_patterns(&exported).unwrap();
    assert_eq!(target.strokes()[0].len(), 2);
}

#[test]
fn wrong_header_is_a_schema_error() {
    let mut editor = editor();
    let err = editor.import_patterns(MARKET_CSV).unwrap_err();
    assert!(matches!(err, PatternError::Schema { .. }));
}

#[test]
fn legacy_patterns_split_on_time_gaps() {
    let mut editor = editor();
    editor
        .import_legacy_patterns(
            "datetime,open,high,low,close,volume\n\
             01/03/2025 10:00:00,0,0,0,150,0\n\
             01/03/2025 10:00:20,0,0,0,151,0\n\
             01/03/2025 10:05:00,0,0,0,152,0\n",
        )
        .unwrap();

    let lens: Vec<_> = editor.strokes().iter().map(|s| s.len()).collect();
    assert_eq!(lens, vec![2, 1]);
}

#[test]
fn legacy_gap_follows_config() {
    let config = load_config_str("[import]\nlegacy_gap_secs = 600\n").unwrap();
    let mut editor = PatternEditor::new(config);
    editor
        .import_legacy_patterns(
            "datetime,open,high,low,close,volume\n\
             01/03/2025 10:00:00,0,0,0,150,0\n\
             01/03/2025 10:05:00,0,0,0,152,0\n",
        )
        .unwrap();
    assert_eq!(editor.strokes().len(), 1);
}

#[test]
fn summary_counts_strokes() {
    let mut editor = editor();
    draw(&mut editor, &[(10.0, 10.0), (20.0, 20.0)]);

    let summary = editor.summary().unwrap();
    assert_eq!(
        summary.to_string(),
        "10 data points, 01/01/2025 00:00 to 01/10/2025 00:00, $125.00 to $190.00, 1 pattern strokes"
    );
}

#[test]
fn resize_changes_mapping_not_strokes() {
    let mut editor = editor();
    draw(&mut editor, &[(500.0, 250.0), (600.0, 250.0)]);
    let before = editor.strokes().to_vec();

    editor.set_viewport(pattern_canvas::models::viewport::Viewport::new(2000.0, 1000.0));
    assert_eq!(editor.strokes(), before.as_slice());

    let (x, y) = editor.mapper().unwrap().to_pixel(&before[0].points[0]);
    assert!((x - 1000.0).abs() < 1e-6);
    assert!((y - 500.0).abs() < 1e-6);
}

#[test]
fn files_round_trip_through_paths() {
    let dir = TestDir::new();
    let data = dir.file("market.csv", MARKET_CSV);
    let out = dir.path("patterns.csv");

    let mut source = PatternEditor::new(EditorConfig::default());
    source.load_series_path(&data).unwrap();
    source.set_viewport(viewport());
    source.set_drawing_enabled(true).unwrap();
    draw(&mut source, &[(10.0, 10.0), (20.0, 20.0), (30.0, 10.0)]);
    source.export_patterns_to_path(&out).unwrap();

    let mut target = editor();
    target.import_patterns_from_path(&out).unwrap();
    assert_eq!(target.strokes().len(), 1);
    assert_eq!(target.strokes()[0].len(), 3);

    let missing = target.import_patterns_from_path(dir.path("nope.csv"));
    assert!(matches!(missing, Err(PatternError::Io(_))));
}
