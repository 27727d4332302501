use scrawl_shared::Tool;
use tokio::sync::mpsc;

use super::*;

fn start(id: &str, x: f32, y: f32) -> ClientMessage {
    ClientMessage::StrokeStart {
        id: id.to_string(),
        tool: Tool::Pen,
        color: "#ff0000".to_string(),
        width: 5.0,
        point: Point { x, y },
    }
}

#[test]
fn start_then_points_builds_the_stroke() {
    let mut session = Session::default();
    let alice = Uuid::new_v4();

    let relayed = apply_client_message(&mut session, alice, start("s1", 0.0, 0.0));
    assert!(matches!(
        relayed.as_deref(),
        Some([ServerMessage::StrokeStart { .. }])
    ));

    apply_client_message(
        &mut session,
        alice,
        ClientMessage::StrokePoint {
            id: "s1".to_string(),
            point: Point { x: 10.0, y: 0.0 },
        },
    )
    .expect("point accepted");
    apply_client_message(
        &mut session,
        alice,
        ClientMessage::StrokePoints {
            id: "s1".to_string(),
            points: vec![Point { x: 10.0, y: 10.0 }],
        },
    )
    .expect("points accepted");

    assert_eq!(session.strokes.len(), 1);
    assert_eq!(session.strokes[0].points.len(), 3);
}

#[test]
fn invalid_payloads_are_rejected() {
    let mut session = Session::default();
    let alice = Uuid::new_v4();

    assert!(apply_client_message(&mut session, alice, start("", 0.0, 0.0)).is_none());
    assert!(
        apply_client_message(&mut session, alice, start(&"x".repeat(65), 0.0, 0.0)).is_none()
    );
    assert!(apply_client_message(&mut session, alice, start("s1", f32::NAN, 0.0)).is_none());
    assert!(session.strokes.is_empty());

    // Point for a stroke that was never started.
    let relayed = apply_client_message(
        &mut session,
        alice,
        ClientMessage::StrokePoint {
            id: "ghost".to_string(),
            point: Point { x: 1.0, y: 1.0 },
        },
    );
    assert!(relayed.is_none());
}

#[test]
fn color_and_width_are_sanitized_before_relaying() {
    let mut session = Session::default();
    let alice = Uuid::new_v4();

    let relayed = apply_client_message(
        &mut session,
        alice,
        ClientMessage::StrokeStart {
            id: "s1".to_string(),
            tool: Tool::Pen,
            color: String::new(),
            width: f32::INFINITY,
            point: Point { x: 0.0, y: 0.0 },
        },
    )
    .expect("start accepted");
    match &relayed[0] {
        ServerMessage::StrokeStart { color, width, .. } => {
            assert_eq!(color, scrawl_shared::DEFAULT_COLOR);
            assert!(width.is_finite());
        }
        other => panic!("unexpected relay {other:?}"),
    }
}

#[test]
fn only_the_owner_may_extend_or_end_a_stroke() {
    let mut session = Session::default();
    let alice = Uuid::new_v4();
    let mallory = Uuid::new_v4();

    apply_client_message(&mut session, alice, start("s1", 0.0, 0.0)).expect("start");
    let hijack = apply_client_message(
        &mut session,
        mallory,
        ClientMessage::StrokePoint {
            id: "s1".to_string(),
            point: Point { x: 5.0, y: 5.0 },
        },
    );
    assert!(hijack.is_none());
    assert_eq!(session.strokes[0].points.len(), 1);

    let end = apply_client_message(
        &mut session,
        mallory,
        ClientMessage::StrokeEnd {
            id: "s1".to_string(),
        },
    );
    assert!(end.is_none());
    assert!(session.open_ids.contains("s1"));
}

#[test]
fn points_after_end_are_dropped() {
    let mut session = Session::default();
    let alice = Uuid::new_v4();

    apply_client_message(&mut session, alice, start("s1", 0.0, 0.0)).expect("start");
    apply_client_message(
        &mut session,
        alice,
        ClientMessage::StrokeEnd {
            id: "s1".to_string(),
        },
    )
    .expect("end");

    let late = apply_client_message(
        &mut session,
        alice,
        ClientMessage::StrokePoint {
            id: "s1".to_string(),
            point: Point { x: 9.0, y: 9.0 },
        },
    );
    assert!(late.is_none());
    assert_eq!(session.strokes[0].points.len(), 1);
}

#[test]
fn duplicate_start_is_not_applied_twice() {
    let mut session = Session::default();
    let alice = Uuid::new_v4();

    apply_client_message(&mut session, alice, start("s1", 0.0, 0.0)).expect("start");
    assert!(apply_client_message(&mut session, alice, start("s1", 9.0, 9.0)).is_none());
    assert_eq!(session.strokes.len(), 1);
    assert_eq!(session.strokes[0].points[0], Point { x: 0.0, y: 0.0 });
}

#[test]
fn clear_empties_the_session() {
    let mut session = Session::default();
    let alice = Uuid::new_v4();

    apply_client_message(&mut session, alice, start("s1", 0.0, 0.0)).expect("start");
    let relayed = apply_client_message(&mut session, alice, ClientMessage::Clear);
    assert!(matches!(relayed.as_deref(), Some([ServerMessage::Clear])));
    assert!(session.strokes.is_empty());
    assert!(session.open_ids.is_empty());
    assert!(session.owners.is_empty());

    // A fresh stroke after the clear starts an independent log.
    apply_client_message(&mut session, alice, start("s2", 1.0, 1.0)).expect("start");
    assert_eq!(session.strokes.len(), 1);
    assert_eq!(session.strokes[0].id, "s2");
}

#[test]
fn point_batches_filter_non_finite_and_respect_the_cap() {
    let mut session = Session::default();
    let alice = Uuid::new_v4();

    apply_client_message(&mut session, alice, start("s1", 0.0, 0.0)).expect("start");
    let relayed = apply_client_message(
        &mut session,
        alice,
        ClientMessage::StrokePoints {
            id: "s1".to_string(),
            points: vec![
                Point { x: 1.0, y: 1.0 },
                Point {
                    x: f32::NAN,
                    y: 2.0,
                },
                Point { x: 3.0, y: 3.0 },
            ],
        },
    )
    .expect("batch accepted");
    match &relayed[0] {
        ServerMessage::StrokePoints { points, .. } => assert_eq!(points.len(), 2),
        other => panic!("unexpected relay {other:?}"),
    }
    assert_eq!(session.strokes[0].points.len(), 3);

    // Fill the stroke to its cap; further points are refused.
    let bulk = vec![Point { x: 0.0, y: 0.0 }; MAX_POINTS_PER_STROKE];
    apply_client_message(
        &mut session,
        alice,
        ClientMessage::StrokePoints {
            id: "s1".to_string(),
            points: bulk,
        },
    )
    .expect("partial batch accepted");
    assert_eq!(session.strokes[0].points.len(), MAX_POINTS_PER_STROKE);
    let refused = apply_client_message(
        &mut session,
        alice,
        ClientMessage::StrokePoint {
            id: "s1".to_string(),
            point: Point { x: 1.0, y: 1.0 },
        },
    );
    assert!(refused.is_none());
}

#[test]
fn broadcast_skips_the_sender_and_prunes_dead_peers() {
    let mut session = Session::default();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let carol = Uuid::new_v4();
    let (alice_tx, mut alice_rx) = mpsc::unbounded_channel();
    let (bob_tx, mut bob_rx) = mpsc::unbounded_channel();
    let (carol_tx, carol_rx) = mpsc::unbounded_channel();
    drop(carol_rx);
    session.peers.insert(alice, alice_tx);
    session.peers.insert(bob, bob_tx);
    session.peers.insert(carol, carol_tx);

    broadcast_except(&mut session, alice, ServerMessage::Clear);

    assert!(alice_rx.try_recv().is_err());
    assert_eq!(bob_rx.try_recv().ok(), Some(ServerMessage::Clear));
    assert!(!session.peers.contains_key(&carol));
    assert_eq!(session.peers.len(), 2);
}

#[test]
fn stroke_overflow_evicts_oldest_strokes() {
    let mut session = Session::default();
    let alice = Uuid::new_v4();

    for index in 0..=MAX_STROKES {
        let id = format!("s{index}");
        apply_client_message(&mut session, alice, start(&id, 0.0, 0.0)).expect("start");
    }
    assert_eq!(session.strokes.len(), MAX_STROKES);
    assert_eq!(session.strokes[0].id, "s1");
    assert!(!session.owners.contains_key("s0"));
}
