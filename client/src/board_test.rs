use super::*;

fn begin_pen(log: &mut StrokeLog, id: &str, x: f32, y: f32) {
    log.begin_stroke(
        id.to_string(),
        Tool::Pen,
        "#ff0000".to_string(),
        5.0,
        Point::new(x, y),
    );
}

#[test]
fn extend_appends_points_in_call_order() {
    let mut log = StrokeLog::new();
    begin_pen(&mut log, "s1", 0.0, 0.0);
    log.extend_stroke("s1", Point::new(10.0, 0.0));
    log.extend_stroke("s1", Point::new(10.0, 10.0));

    let strokes = log.snapshot();
    assert_eq!(strokes.len(), 1);
    let stroke = &strokes[0];
    assert_eq!(stroke.tool, Tool::Pen);
    assert_eq!(stroke.color, "#ff0000");
    assert_eq!(stroke.width, 5.0);
    assert_eq!(
        stroke.points,
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0)
        ]
    );
}

#[test]
fn extend_unknown_stroke_is_a_no_op() {
    let mut log = StrokeLog::new();
    log.extend_stroke("ghost", Point::new(1.0, 1.0));
    assert!(log.is_empty());
}

#[test]
fn ended_stroke_is_immutable() {
    let mut log = StrokeLog::new();
    begin_pen(&mut log, "s1", 0.0, 0.0);
    log.end_stroke("s1");
    log.extend_stroke("s1", Point::new(5.0, 5.0));
    assert_eq!(log.snapshot()[0].points.len(), 1);
    assert!(!log.is_open("s1"));
}

#[test]
fn duplicate_begin_is_idempotent() {
    let mut log = StrokeLog::new();
    begin_pen(&mut log, "s1", 0.0, 0.0);
    begin_pen(&mut log, "s1", 99.0, 99.0);
    assert_eq!(log.len(), 1);
    assert_eq!(log.snapshot()[0].points[0], Point::new(0.0, 0.0));
}

#[test]
fn clear_then_begin_starts_fresh() {
    let mut log = StrokeLog::new();
    begin_pen(&mut log, "s1", 0.0, 0.0);
    log.clear();
    assert!(log.is_empty());
    // A point for the cleared stroke arriving late is dropped.
    log.extend_stroke("s1", Point::new(1.0, 1.0));
    assert!(log.is_empty());

    begin_pen(&mut log, "s2", 3.0, 4.0);
    assert_eq!(log.len(), 1);
    assert_eq!(log.snapshot()[0].id, "s2");
}

#[test]
fn insertion_order_is_paint_order() {
    let mut log = StrokeLog::new();
    begin_pen(&mut log, "bottom", 0.0, 0.0);
    log.begin_stroke(
        "top".to_string(),
        Tool::Eraser,
        String::new(),
        8.0,
        Point::new(0.0, 0.0),
    );
    let ids: Vec<&str> = log.snapshot().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["bottom", "top"]);
}

#[test]
fn adopt_replaces_state_wholesale() {
    let mut log = StrokeLog::new();
    begin_pen(&mut log, "local", 0.0, 0.0);
    let snapshot = vec![
        Stroke {
            id: "a".to_string(),
            tool: Tool::Pen,
            color: "#123456".to_string(),
            width: 2.0,
            points: vec![Point::new(1.0, 1.0)],
        },
        Stroke {
            id: "b".to_string(),
            tool: Tool::Eraser,
            color: String::new(),
            width: 9.0,
            points: vec![Point::new(2.0, 2.0), Point::new(f32::NAN, 0.0)],
        },
        Stroke {
            id: "c".to_string(),
            tool: Tool::Pen,
            color: "#000000".to_string(),
            width: 3.0,
            points: vec![Point::new(5.0, 5.0)],
        },
    ];
    log.adopt(snapshot);
    assert_eq!(log.len(), 3);
    // The open local stroke did not survive the snapshot.
    assert!(!log.is_open("local"));
    // Non-finite points were filtered during adoption.
    assert_eq!(log.snapshot()[1].points.len(), 1);
}

#[test]
fn adopted_strokes_keep_accepting_points() {
    let mut log = StrokeLog::new();
    log.adopt(vec![Stroke {
        id: "remote".to_string(),
        tool: Tool::Pen,
        color: "#000000".to_string(),
        width: 5.0,
        points: vec![Point::new(0.0, 0.0)],
    }]);
    assert!(log.is_open("remote"));

    log.extend_stroke("remote", Point::new(10.0, 0.0));
    assert_eq!(log.snapshot()[0].points.len(), 2);

    log.end_stroke("remote");
    log.extend_stroke("remote", Point::new(20.0, 0.0));
    assert_eq!(log.snapshot()[0].points.len(), 2);
}

#[test]
fn non_finite_points_never_enter_the_log() {
    let mut log = StrokeLog::new();
    log.begin_stroke(
        "s1".to_string(),
        Tool::Pen,
        "#000".to_string(),
        5.0,
        Point::new(f32::NAN, 0.0),
    );
    assert!(log.is_empty());

    begin_pen(&mut log, "s2", 0.0, 0.0);
    log.extend_stroke("s2", Point::new(f32::INFINITY, 1.0));
    assert_eq!(log.snapshot()[0].points.len(), 1);
}
