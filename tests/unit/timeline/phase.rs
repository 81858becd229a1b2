use super::*;
use crate::{foundation::core::Size, geometry::layout::VertexLayout};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn stage_200() -> Stage {
    let layout = VertexLayout::compute(Size::new(200, 200), 20).unwrap();
    Stage {
        center: layout.center,
        vertices: layout.vertices.to_vec(),
        alpha: AlphaState::default(),
    }
}

#[test]
fn cycle_is_collapse_pulse_explode_pulse() {
    let mut stage = stage_200();
    let phases = PhaseBuilder::new(CycleTiming::default()).cycle(&mut stage.vertices);
    let kinds: Vec<PhaseKind> = phases.iter().map(Phase::kind).collect();
    assert_eq!(
        kinds,
        vec![
            PhaseKind::Collapse,
            PhaseKind::VertexPulse,
            PhaseKind::Explode,
            PhaseKind::CenterPulse
        ]
    );
    let events: Vec<Option<AnimationEvent>> = phases.iter().map(Phase::completion_event).collect();
    assert_eq!(
        events,
        vec![
            Some(AnimationEvent::Collapsed),
            None,
            Some(AnimationEvent::Exploded),
            None
        ]
    );
}

#[test]
fn delays_are_staggered_and_length_follows_slowest_vertex() {
    let mut stage = stage_200();
    let builder = PhaseBuilder::new(CycleTiming::default());
    let phases = builder.cycle(&mut stage.vertices);

    let delays: Vec<Duration> = stage.vertices.iter().map(Vertex::start_delay).collect();
    assert_eq!(delays, vec![ms(0), ms(200), ms(400), ms(600)]);

    assert_eq!(phases[0].length(), ms(1600));
    assert_eq!(phases[1].length(), ms(2000));
    assert_eq!(phases[2].length(), ms(1600));
    assert_eq!(phases[3].length(), ms(2000));
}

#[test]
fn collapse_moves_each_vertex_after_its_own_delay() {
    let mut stage = stage_200();
    let phases = PhaseBuilder::new(CycleTiming::default()).cycle(&mut stage.vertices);
    let collapse = &phases[0];

    collapse.apply(ms(100), &mut stage);
    // vertex 0 is 10% along its path; vertex 1 has not started.
    assert_eq!(stage.vertices[0].current(), Point::new(20, 36));
    assert_eq!(stage.vertices[1].current(), Point::new(20, 180));

    collapse.apply(ms(1600), &mut stage);
    for v in &stage.vertices {
        assert_eq!(v.current(), Point::new(100, 100));
    }
}

#[test]
fn explode_returns_vertices_to_corners() {
    let mut stage = stage_200();
    let phases = PhaseBuilder::new(CycleTiming::default()).cycle(&mut stage.vertices);
    phases[0].apply(phases[0].length(), &mut stage);
    phases[2].apply(ms(0), &mut stage);
    assert_eq!(stage.vertices[0].current(), Point::new(100, 100));
    // vertex 3 still waits at the center during its delay
    phases[2].apply(ms(500), &mut stage);
    assert_eq!(stage.vertices[3].current(), Point::new(100, 100));

    phases[2].apply(phases[2].length(), &mut stage);
    let corners: Vec<Point> = stage.vertices.iter().map(Vertex::current).collect();
    assert_eq!(
        corners,
        vec![
            Point::new(20, 20),
            Point::new(20, 180),
            Point::new(180, 180),
            Point::new(180, 20)
        ]
    );
}

#[test]
fn faster_speed_gives_shorter_phases() {
    let slow = CycleTiming::new(Speed::new(1.0).unwrap());
    let fast = CycleTiming::new(Speed::new(4.0).unwrap());
    assert!(fast.phase_duration < slow.phase_duration);
    assert_eq!(PhaseBuilder::new(fast).vertex_pulse().length(), ms(500));
}

#[test]
fn pathless_vertices_are_skipped_without_error() {
    let mut vertices = vec![
        Vertex::new(vec![]),
        Vertex::new(vec![Point::new(3, 4)]),
    ];
    let phases = PhaseBuilder::new(CycleTiming::default()).cycle(&mut vertices);
    let Phase::Collapse(motion) = &phases[0] else {
        panic!("first phase must be the collapse");
    };
    assert_eq!(motion.tracks().len(), 1);
    assert_eq!(motion.length(), ms(1200));

    let mut stage = Stage {
        vertices,
        ..Stage::default()
    };
    phases[0].apply(ms(1200), &mut stage);
    assert_eq!(stage.vertices[0].current(), Point::default());
    assert_eq!(stage.vertices[1].current(), Point::new(3, 4));
}

#[test]
fn empty_motion_has_zero_length() {
    let phase = PhaseBuilder::new(CycleTiming::default()).collapse(&[]);
    assert_eq!(phase.length(), Duration::ZERO);
}
