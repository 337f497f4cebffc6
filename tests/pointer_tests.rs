use glam::Vec2;
use liquid_ether::autopilot::{RETARGET_DISTANCE, TARGET_MARGIN};
use liquid_ether::{
    AutopilotDriver, AutopilotParams, InputEvent, Orchestrator, PointerHub, PointerMode,
    PointerState, SimulationParams, smoothstep,
};
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

fn fast_autopilot_params() -> SimulationParams {
    SimulationParams {
        resolution_scale: 0.25,
        // small enough that a 32-cell axis leaves room to follow the pointer
        influence_radius: 4.0,
        autopilot: AutopilotParams {
            idle_delay: 0.5,
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_smoothstep_shape() {
    assert_eq!(smoothstep(0.0), 0.0);
    assert_eq!(smoothstep(1.0), 1.0);
    assert_eq!(smoothstep(0.5), 0.5);
    assert_eq!(smoothstep(0.25), 0.15625);
    assert_eq!(smoothstep(-3.0), 0.0);
    assert_eq!(smoothstep(7.0), 1.0);
}

#[test]
fn test_handoff_interpolates_with_smoothstep() {
    let params = AutopilotParams::default();
    let a = Vec2::new(-0.4, 0.2);
    let b = Vec2::new(0.6, -0.3);

    let mut pointer = PointerState::new(0.0);
    pointer.set_autonomous(true);
    pointer.set_autonomous_position(a);
    pointer.resolve_frame(0.0, &params);
    assert_eq!(pointer.mode(), PointerMode::Autonomous);

    pointer.on_pointer_move(b, 1.0);
    assert_eq!(pointer.mode(), PointerMode::HandoffToUser);

    let quarter = 1.0 + params.handoff_duration as f64 * 0.25;
    pointer.resolve_frame(quarter, &params);
    let expected = a + (b - a) * smoothstep(0.25);
    assert!((pointer.position() - expected).length() < 1e-6);
    // eased, so well behind a linear blend
    assert!((pointer.position() - a.lerp(b, 0.25)).length() > 0.05);

    let midpoint = 1.0 + params.handoff_duration as f64 * 0.5;
    pointer.resolve_frame(midpoint, &params);
    let expected = a + (b - a) * smoothstep(0.5);
    assert!((pointer.position() - expected).length() < 1e-6);

    let done = 1.0 + params.handoff_duration as f64;
    let displacement = pointer.resolve_frame(done, &params);
    assert_eq!(pointer.mode(), PointerMode::UserControlled);
    assert_eq!(pointer.position(), b);
    assert_eq!(displacement, Vec2::ZERO);
}

#[test]
fn test_first_frame_has_no_displacement() {
    let params = AutopilotParams::default();
    let mut pointer = PointerState::new(0.0);
    pointer.on_pointer_move(Vec2::new(0.9, 0.9), 0.0);

    assert_eq!(pointer.resolve_frame(0.016, &params), Vec2::ZERO);

    pointer.on_pointer_move(Vec2::new(0.8, 0.9), 0.02);
    let d = pointer.resolve_frame(0.032, &params);
    assert!((d - Vec2::new(-0.1, 0.0)).length() < 1e-6);
}

#[test]
fn test_autonomous_displacement_is_scaled() {
    let params = AutopilotParams {
        intensity: 2.0,
        ..Default::default()
    };
    let mut pointer = PointerState::new(0.0);
    pointer.resolve_frame(0.0, &params);

    pointer.set_autonomous(true);
    pointer.set_autonomous_position(Vec2::new(0.1, 0.0));
    let d = pointer.resolve_frame(0.016, &params);
    assert!((d - Vec2::new(0.2, 0.0)).length() < 1e-6);
}

#[test]
fn test_autopilot_converges_then_retargets() {
    let params = AutopilotParams::default();
    let mut driver = AutopilotDriver::seeded(42);
    let target = Vec2::new(0.4, 0.3);
    driver.set_target(target);
    driver.activate(Vec2::ZERO, 0.0);

    // the activation frame itself holds still, with no time elapsed and no ramp
    assert_eq!(driver.update(0.0, &params), Vec2::ZERO);

    let mut distance = target.length();
    let mut frame = 1;
    while distance >= RETARGET_DISTANCE {
        let position = driver.update(frame as f64 * 0.016, &params);
        let next = (target - position).length();
        assert!(next < distance, "frame {frame}: {distance} -> {next}");
        distance = next;
        frame += 1;
        assert!(frame < 1000, "autopilot never reached its target");
    }

    let position = driver.position();
    driver.update(frame as f64 * 0.016, &params);
    assert_eq!(driver.position(), position);
    assert_ne!(driver.target(), target);

    let extent = 1.0 - TARGET_MARGIN;
    assert!(driver.target().x.abs() <= extent && driver.target().y.abs() <= extent);
}

#[test]
fn test_autopilot_targets_respect_margin() {
    let mut driver = AutopilotDriver::seeded(7);
    let extent = 1.0 - driver.margin();
    for _ in 0..500 {
        driver.pick_new_target();
        let t = driver.target();
        assert!(t.x.abs() <= extent && t.y.abs() <= extent, "{t:?} outside margin");
    }
}

#[test]
fn test_autopilot_ramps_up() {
    let params = AutopilotParams::default();
    let mut driver = AutopilotDriver::seeded(1);
    driver.set_target(Vec2::new(0.8, 0.0));
    driver.activate(Vec2::ZERO, 0.0);

    let first = driver.update(0.016, &params).x;
    let mut last = first;
    let mut step = 0.0;
    for frame in 2..40 {
        let x = driver.update(frame as f64 * 0.016, &params).x;
        step = x - last;
        last = x;
    }
    assert!(step > first * 4.0, "late step {step} should dwarf first step {first}");
}

#[test]
fn test_idle_orchestrator_engages_autopilot() {
    let hub = PointerHub::new();
    let mut sim = Orchestrator::new(fast_autopilot_params(), 128, 128, &hub)
        .unwrap()
        .with_autopilot_seed(3);

    for _ in 0..20 {
        sim.tick(FRAME);
    }
    assert_eq!(sim.pointer_mode(), PointerMode::UserControlled);
    assert!(!sim.autopilot().is_active());

    for _ in 0..40 {
        sim.tick(FRAME);
    }
    assert_eq!(sim.pointer_mode(), PointerMode::Autonomous);
    assert!(sim.autopilot().is_active());

    for _ in 0..60 {
        sim.tick(FRAME);
    }
    let max_speed = sim
        .velocity()
        .data()
        .iter()
        .map(|v| v.length())
        .fold(0.0, f32::max);
    assert!(max_speed > 0.0, "autopilot should stir the fluid");
}

#[test]
fn test_user_input_takes_over_from_autopilot() {
    let hub = PointerHub::new();
    let mut sim = Orchestrator::new(fast_autopilot_params(), 128, 128, &hub)
        .unwrap()
        .with_autopilot_seed(3);

    for _ in 0..60 {
        sim.tick(FRAME);
    }
    assert_eq!(sim.pointer_mode(), PointerMode::Autonomous);

    hub.publish(InputEvent::PointerMove(Vec2::new(0.5, 0.5)));
    sim.tick(FRAME);
    assert_eq!(sim.pointer_mode(), PointerMode::HandoffToUser);
    assert!(!sim.autopilot().is_active());

    for _ in 0..20 {
        sim.tick(FRAME);
    }
    assert_eq!(sim.pointer_mode(), PointerMode::UserControlled);
    assert_eq!(sim.pointer().position(), Vec2::new(0.5, 0.5));

    // still hovering, so the autopilot stays off however long we wait
    for _ in 0..100 {
        sim.tick(FRAME);
    }
    assert_eq!(sim.pointer_mode(), PointerMode::UserControlled);

    hub.publish(InputEvent::PointerLeave);
    for _ in 0..40 {
        sim.tick(FRAME);
    }
    assert_eq!(sim.pointer_mode(), PointerMode::Autonomous);
}

#[test]
fn test_disabled_autopilot_never_engages() {
    let mut params = fast_autopilot_params();
    params.autopilot.enabled = false;
    let hub = PointerHub::new();
    let mut sim = Orchestrator::new(params, 128, 128, &hub).unwrap();

    for _ in 0..200 {
        sim.tick(FRAME);
    }
    assert_eq!(sim.pointer_mode(), PointerMode::UserControlled);
    assert!(sim.velocity().data().iter().all(|v| *v == Vec2::ZERO));
}

#[test]
fn test_touch_events_drive_pointer() {
    let hub = PointerHub::new();
    let mut sim = Orchestrator::new(fast_autopilot_params(), 128, 128, &hub).unwrap();

    hub.publish(InputEvent::TouchStart(Vec2::new(-0.2, 0.1)));
    sim.tick(FRAME);
    assert!(sim.pointer().is_hover_inside());
    assert!(sim.pointer().has_user_control());

    hub.publish(InputEvent::TouchMove(Vec2::new(0.1, 0.1)));
    sim.tick(FRAME);
    assert!((sim.pointer().displacement() - Vec2::new(0.3, 0.0)).length() < 1e-6);

    hub.publish(InputEvent::TouchEnd);
    sim.tick(FRAME);
    assert!(!sim.pointer().is_hover_inside());
}

#[test]
fn test_subscriptions_are_scoped() {
    let hub = PointerHub::new();
    let mut first = Orchestrator::new(fast_autopilot_params(), 128, 128, &hub).unwrap();
    let second = Orchestrator::new(fast_autopilot_params(), 64, 64, &hub).unwrap();
    assert_eq!(hub.subscriber_count(), 2);

    drop(second);
    assert_eq!(hub.subscriber_count(), 1);

    hub.publish(InputEvent::PointerMove(Vec2::new(0.3, -0.3)));
    first.tick(FRAME);
    assert_eq!(first.pointer().position(), Vec2::new(0.3, -0.3));

    drop(first);
    assert_eq!(hub.subscriber_count(), 0);
}

#[test]
fn test_injection_follows_pointer() {
    let mut params = fast_autopilot_params();
    params.autopilot.enabled = false;
    let hub = PointerHub::new();
    let mut sim = Orchestrator::new(params, 128, 128, &hub).unwrap();
    assert_eq!(sim.grid_size(), (32, 32));

    hub.publish(InputEvent::PointerMove(Vec2::new(-0.6, 0.5)));
    sim.tick(FRAME);
    hub.publish(InputEvent::PointerMove(Vec2::new(-0.5, 0.5)));
    sim.tick(FRAME);

    let velocity = sim.velocity();
    let mut peak = (0, 0, 0.0);
    for y in 0..velocity.height() {
        for x in 0..velocity.width() {
            let speed = velocity.get(x, y).length();
            if speed > peak.2 {
                peak = (x, y, speed);
            }
        }
    }
    // pointer at (-0.5, 0.5) lands near cell (8, 24)
    let (x, y, speed) = peak;
    assert!(speed > 0.0);
    assert!(x < 16 && y > 16, "peak at ({x}, {y}) should sit in the upper left quadrant");
}
