use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::foundation::core::Point;

type Log = Rc<RefCell<Vec<AnimationEvent>>>;

const TICK: Duration = Duration::from_millis(100);
// collapse 1600 + pulse 2000 + explode 1600 + pulse 2000 at speed 1
const CYCLE_TICKS: usize = 72;

fn recorded(config: SequencerConfig) -> (Sequencer, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut seq = Sequencer::new(config);
    let sink = log.clone();
    seq.set_listener(move |e: AnimationEvent| sink.borrow_mut().push(e));
    (seq, log)
}

fn manual(repeat_limit: u32, supports_pause: bool) -> (Sequencer, Log) {
    let (mut seq, log) = recorded(SequencerConfig {
        repeat_limit,
        run_on_resize: false,
        caps: HostCaps { supports_pause },
        ..SequencerConfig::default()
    });
    seq.resize(Size::new(200, 200));
    (seq, log)
}

fn ticks(seq: &mut Sequencer, n: usize) {
    for _ in 0..n {
        seq.advance(TICK);
    }
}

fn positions(seq: &Sequencer) -> Vec<Point> {
    seq.stage().vertices.iter().map(|v| v.current()).collect()
}

#[test]
fn resize_with_run_on_resize_auto_starts() {
    let (mut seq, log) = recorded(SequencerConfig::default());
    assert_eq!(seq.state(), SequencerState::Idle);
    seq.resize(Size::new(200, 200));
    assert_eq!(seq.state(), SequencerState::Running);
    assert_eq!(*log.borrow(), vec![AnimationEvent::Started]);
    assert_eq!(seq.cycle().repeated_cycles, 0);
}

#[test]
fn manual_layout_stays_idle_with_vertices_at_corners() {
    let (seq, log) = manual(0, true);
    assert_eq!(seq.state(), SequencerState::Idle);
    assert!(log.borrow().is_empty());
    assert_eq!(positions(&seq)[2], Point::new(180, 180));
    assert_eq!(seq.stage().center, Point::new(100, 100));
}

#[test]
fn start_without_geometry_waits_for_first_resize() {
    let (mut seq, log) = recorded(SequencerConfig {
        run_on_resize: false,
        ..SequencerConfig::default()
    });
    seq.start();
    assert_eq!(seq.state(), SequencerState::Idle);
    assert!(log.borrow().is_empty());

    seq.resize(Size::new(0, 0));
    assert_eq!(seq.state(), SequencerState::Idle);

    seq.resize(Size::new(120, 80));
    assert_eq!(seq.state(), SequencerState::Running);
    assert_eq!(*log.borrow(), vec![AnimationEvent::Started]);
}

#[test]
fn unlimited_run_alternates_collapse_and_explode() {
    let (mut seq, log) = manual(0, true);
    seq.start();
    ticks(&mut seq, CYCLE_TICKS * 3);

    use AnimationEvent::*;
    assert_eq!(
        *log.borrow(),
        vec![Started, Collapsed, Exploded, Collapsed, Exploded, Collapsed, Exploded]
    );
    assert!(seq.is_running());
    assert_eq!(seq.cycle().repeated_cycles, 3);
}

#[test]
fn collapse_event_fires_exactly_at_phase_end() {
    let (mut seq, log) = manual(0, true);
    seq.start();
    ticks(&mut seq, 15);
    assert_eq!(log.borrow().len(), 1);
    ticks(&mut seq, 1);
    assert_eq!(log.borrow().last(), Some(&AnimationEvent::Collapsed));
    for p in positions(&seq) {
        assert_eq!(p, Point::new(100, 100));
    }
    assert_eq!(
        seq.current_phase().map(Phase::kind),
        Some(crate::timeline::phase::PhaseKind::VertexPulse)
    );
}

#[test]
fn repeat_limit_runs_exactly_that_many_cycles() {
    let (mut seq, log) = manual(2, true);
    seq.start();
    ticks(&mut seq, CYCLE_TICKS * 5);

    use AnimationEvent::*;
    assert_eq!(
        *log.borrow(),
        vec![Started, Collapsed, Exploded, Collapsed, Exploded, Stopped]
    );
    assert_eq!(seq.state(), SequencerState::Stopped);
    assert_eq!(seq.cycle().repeated_cycles, 2);
    assert!(!seq.advance(TICK));
}

#[test]
fn natural_stop_clears_run_on_resize() {
    let (mut seq, log) = recorded(SequencerConfig {
        repeat_limit: 1,
        ..SequencerConfig::default()
    });
    seq.resize(Size::new(200, 200));
    ticks(&mut seq, CYCLE_TICKS);
    assert_eq!(seq.state(), SequencerState::Stopped);
    assert!(!seq.run_on_resize());

    seq.resize(Size::new(300, 300));
    assert_eq!(seq.state(), SequencerState::Stopped);
    assert_eq!(log.borrow().last(), Some(&AnimationEvent::Stopped));
}

#[test]
fn start_after_natural_stop_counts_from_zero() {
    let (mut seq, log) = manual(1, true);
    seq.start();
    ticks(&mut seq, CYCLE_TICKS);
    assert_eq!(seq.state(), SequencerState::Stopped);

    seq.start();
    assert_eq!(seq.cycle().repeated_cycles, 0);
    ticks(&mut seq, CYCLE_TICKS);
    use AnimationEvent::*;
    assert_eq!(
        *log.borrow(),
        vec![Started, Collapsed, Exploded, Stopped, Started, Collapsed, Exploded, Stopped]
    );
}

#[test]
fn cancel_fires_stopped_once_and_resets_counter() {
    let (mut seq, log) = manual(0, false);
    seq.start();
    ticks(&mut seq, CYCLE_TICKS + 10);
    assert_eq!(seq.cycle().repeated_cycles, 1);

    seq.stop();
    seq.stop();
    assert_eq!(seq.state(), SequencerState::Stopped);
    assert_eq!(seq.cycle().repeated_cycles, 0);
    let stopped = log
        .borrow()
        .iter()
        .filter(|e| **e == AnimationEvent::Stopped)
        .count();
    assert_eq!(stopped, 1);

    seq.start();
    assert_eq!(seq.cycle().repeated_cycles, 0);
    assert_eq!(log.borrow().last(), Some(&AnimationEvent::Started));
    assert_eq!(positions(&seq)[0], Point::new(20, 20));
}

#[test]
fn cancel_drops_the_phase_without_completion_event() {
    let (mut seq, log) = manual(0, true);
    seq.start();
    ticks(&mut seq, 10);
    seq.cancel();
    use AnimationEvent::*;
    assert_eq!(*log.borrow(), vec![Started, Stopped]);
    assert!(seq.current_phase().is_none());
    ticks(&mut seq, 20);
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn pause_freezes_and_resume_continues_from_the_same_point() {
    let (mut seq, log) = manual(0, true);
    seq.start();
    ticks(&mut seq, 5);
    assert_eq!(positions(&seq)[0], Point::new(20, 100));

    seq.stop();
    assert_eq!(seq.state(), SequencerState::Paused);
    assert!(!seq.is_running());
    let frozen = positions(&seq);
    let frozen_alpha = seq.stage().alpha;
    let frozen_elapsed = seq.phase_elapsed();

    for _ in 0..50 {
        assert!(!seq.advance(TICK));
    }
    assert_eq!(positions(&seq), frozen);

    seq.start();
    assert!(seq.is_running());
    assert_eq!(positions(&seq), frozen);
    assert_eq!(seq.stage().alpha, frozen_alpha);
    assert_eq!(seq.phase_elapsed(), frozen_elapsed);

    ticks(&mut seq, 1);
    assert_ne!(positions(&seq), frozen);
    assert_eq!(*log.borrow(), vec![AnimationEvent::Started]);
}

#[test]
fn pause_is_rejected_without_host_support() {
    let (mut seq, _log) = manual(0, false);
    seq.start();
    let err = seq.pause().unwrap_err();
    assert!(matches!(err, RectAnimError::Unsupported(_)));
    assert!(seq.is_running());
}

#[test]
fn start_while_running_is_a_no_op() {
    let (mut seq, log) = manual(0, true);
    seq.start();
    ticks(&mut seq, 7);
    let before = positions(&seq);
    let elapsed = seq.phase_elapsed();
    seq.start();
    assert_eq!(positions(&seq), before);
    assert_eq!(seq.phase_elapsed(), elapsed);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn resize_while_running_restarts_and_counts_the_cycle() {
    let (mut seq, log) = recorded(SequencerConfig::default());
    seq.resize(Size::new(200, 200));
    ticks(&mut seq, 12);

    seq.resize(Size::new(400, 400));
    assert!(seq.is_running());
    assert_eq!(seq.cycle().repeated_cycles, 1);
    assert_eq!(seq.phase_elapsed(), Duration::ZERO);
    assert_eq!(positions(&seq)[0], Point::new(20, 20));
    assert_eq!(seq.stage().center, Point::new(200, 200));
    assert_eq!(
        *log.borrow(),
        vec![AnimationEvent::Started, AnimationEvent::Started]
    );
}

#[test]
fn resize_while_paused_keeps_the_run_frozen() {
    let (mut seq, log) = recorded(SequencerConfig::default());
    seq.resize(Size::new(200, 200));
    ticks(&mut seq, 5);
    seq.pause().unwrap();
    assert!(seq.run_on_resize());
    let frozen = positions(&seq);

    seq.resize(Size::new(400, 400));
    assert_eq!(seq.state(), SequencerState::Paused);
    assert_eq!(*log.borrow(), vec![AnimationEvent::Started]);
    assert_eq!(seq.cycle().repeated_cycles, 0);
    assert_eq!(positions(&seq), frozen);
    assert_eq!(seq.phase_elapsed(), Duration::from_millis(500));

    // The new geometry arrives with the next cycle.
    seq.resume();
    ticks(&mut seq, CYCLE_TICKS - 5);
    assert_eq!(seq.stage().center, Point::new(200, 200));
    assert_eq!(positions(&seq)[2], Point::new(380, 380));
    assert_eq!(seq.cycle().repeated_cycles, 1);
}

#[test]
fn resize_without_restart_keeps_the_run_going() {
    let (mut seq, log) = manual(0, true);
    seq.start();
    ticks(&mut seq, 3);
    let elapsed = seq.phase_elapsed();
    seq.resize(Size::new(400, 400));
    assert_eq!(seq.phase_elapsed(), elapsed);
    assert_eq!(seq.stage().center, Point::new(100, 100));

    // New geometry shows up when the next cycle begins.
    ticks(&mut seq, CYCLE_TICKS - 3);
    assert_eq!(seq.stage().center, Point::new(200, 200));
    assert_eq!(positions(&seq)[2], Point::new(380, 380));
    assert_eq!(log.borrow().len(), 3);
}

#[test]
fn empty_resize_ends_the_run_and_returns_to_idle() {
    let (mut seq, log) = manual(0, true);
    seq.start();
    ticks(&mut seq, 3);
    seq.resize(Size::new(0, 0));
    assert_eq!(seq.state(), SequencerState::Idle);
    assert!(seq.layout().is_none());
    assert!(seq.stage().vertices.is_empty());
    assert_eq!(log.borrow().last(), Some(&AnimationEvent::Stopped));
}

#[test]
fn speed_change_applies_from_the_next_cycle() {
    let (mut seq, _log) = manual(0, true);
    seq.start();
    ticks(&mut seq, 2);
    seq.set_speed(Speed::new(2.0).unwrap());
    assert_eq!(
        seq.current_phase().map(Phase::length),
        Some(Duration::from_millis(1600))
    );

    ticks(&mut seq, CYCLE_TICKS - 2);
    assert_eq!(seq.cycle().repeated_cycles, 1);
    assert_eq!(
        seq.current_phase().map(Phase::length),
        Some(Duration::from_millis(1100))
    );
}

#[test]
fn leftover_time_carries_into_the_next_phase() {
    let (mut seq, _log) = manual(0, true);
    seq.start();
    seq.advance(Duration::from_millis(1700));
    assert_eq!(
        seq.current_phase().map(Phase::kind),
        Some(crate::timeline::phase::PhaseKind::VertexPulse)
    );
    assert_eq!(seq.phase_elapsed(), Duration::from_millis(100));
}

#[test]
fn one_huge_tick_completes_at_most_one_cycle() {
    let (mut seq, log) = manual(0, true);
    seq.start();
    seq.advance(Duration::from_secs(3600));
    assert_eq!(seq.cycle().repeated_cycles, 1);
    assert_eq!(seq.phase_elapsed(), Duration::ZERO);
    assert_eq!(log.borrow().len(), 3);
}

#[test]
fn zero_length_cycle_does_not_spin() {
    let (mut seq, _log) = recorded(SequencerConfig {
        timing: CycleTiming {
            phase_duration: Duration::ZERO,
            stagger: Duration::ZERO,
            ease: Ease::Linear,
        },
        run_on_resize: false,
        ..SequencerConfig::default()
    });
    seq.resize(Size::new(50, 50));
    seq.start();
    assert!(seq.advance(TICK));
    assert!(seq.advance(TICK));
    assert_eq!(seq.cycle().repeated_cycles, 2);
}
