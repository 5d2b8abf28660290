use std::sync::Arc;

use euclid::{point2, vec2};
use pretty_assertions::assert_eq;
use rand::{Rng as _, SeedableRng as _};

use crate::arena::{Arena, Wall};
use crate::body::{Body, BodyId};
use crate::math::{Position, Velocity};
use crate::simulate::{
    CollisionSimulator, Event, GRAZING_SPEED, SimulationWindow, Simulator as _, TrajectorySet,
    generate_in_background,
};
use crate::time::{Duration, ManualClock};
use crate::trajectory::InitialMotion;

fn test_box() -> Arena {
    Arena::new(point2(-5.0, -5.0), point2(5.0, 5.0)).unwrap()
}

fn moving(position: Position, velocity: euclid::Vector2D<f64, Velocity>) -> InitialMotion {
    InitialMotion::new(position, velocity, vec2(0.0, 0.0), 0.0)
}

fn window(end: f64) -> SimulationWindow {
    SimulationWindow::new(0.0, end).unwrap()
}

fn ball(mass: f64) -> Body {
    Body::new(mass, 0.5).unwrap()
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{what}: expected {expected}, got {actual}"
    );
}

fn event_times(set: &TrajectorySet) -> Vec<f64> {
    set.events().iter().map(Event::time).collect()
}

#[test]
fn head_on_equal_masses_exchange_velocities() {
    let simulator = CollisionSimulator::new(
        None,
        [
            (ball(10.0), moving(point2(-5.0, 0.0), vec2(5.0, 0.0))),
            (ball(10.0), moving(point2(5.0, 0.0), vec2(-5.0, 0.0))),
        ],
    )
    .unwrap();
    let set = simulator.generate(window(2.0));

    let [event] = set.events() else {
        panic!("expected one event, got {:?}", set.events());
    };
    let &Event::Pairwise {
        time,
        first,
        second,
    } = event
    else {
        panic!("expected a pairwise event, got {event:?}");
    };
    assert_close(time, 0.9, "collision time");
    assert_eq!((first, second), (BodyId(0), BodyId(1)));

    assert_eq!(set.velocity_at(BodyId(0), 1.0), Some(vec2(-5.0, 0.0)));
    assert_eq!(set.velocity_at(BodyId(1), 1.0), Some(vec2(5.0, 0.0)));
    assert_eq!(set.velocity_at(BodyId(0), 0.5), Some(vec2(5.0, 0.0)));
    // At the moment of contact the centers are one diameter apart.
    let a = set.position_at(BodyId(0), time).unwrap();
    let b = set.position_at(BodyId(1), time).unwrap();
    assert_close((b - a).length(), 1.0, "separation at contact");
    // And afterward they retreat along the same line.
    assert_close(set.position_at(BodyId(0), 2.0).unwrap().x, -6.0, "x of first");
    assert_close(set.position_at(BodyId(1), 2.0).unwrap().x, 6.0, "x of second");
}

#[test]
fn wall_bounce_touches_only_one_axis() {
    let simulator = CollisionSimulator::new(
        Some(test_box()),
        [(ball(1.0), moving(point2(-4.5, 0.0), vec2(10.0, 0.0)))],
    )
    .unwrap();
    let set = simulator.generate(window(1.0));

    assert_eq!(
        set.events(),
        &[Event::Boundary {
            time: set.events()[0].time(),
            body: BodyId(0),
            wall: Wall::Right
        }]
    );
    assert_close(set.events()[0].time(), 0.9, "bounce time");
    assert_eq!(set.velocity_at(BodyId(0), 0.95), Some(vec2(-10.0, 0.0)));
    assert_close(set.position_at(BodyId(0), 1.0).unwrap().x, 3.5, "x after bounce");

    let trajectory = set.trajectory(BodyId(0)).unwrap();
    assert_eq!(trajectory.x().segment_count(), 2);
    assert_eq!(trajectory.y().segment_count(), 1);
}

#[test]
fn free_fall_matches_closed_form() {
    let simulator = CollisionSimulator::new(
        None,
        [(
            Body::point(1.0).unwrap(),
            InitialMotion::new(point2(0.0, 10.0), vec2(0.0, 20.0), vec2(0.0, -9.8), 0.0),
        )],
    )
    .unwrap();
    let set = simulator.generate(window(4.0));
    assert!(set.events().is_empty(), "{:?}", set.events());
    for step in 0..=40 {
        let t = f64::from(step) / 10.0;
        assert_close(
            set.position_at(BodyId(0), t).unwrap().y,
            10.0 + 20.0 * t - 4.9 * t * t,
            "height",
        );
    }
}

#[test]
fn no_events_means_one_segment() {
    let simulator = CollisionSimulator::new(
        None,
        [(ball(1.0), moving(point2(0.0, 0.0), vec2(3.0, -2.0)))],
    )
    .unwrap();
    let set = simulator.generate(window(100.0));
    assert!(set.events().is_empty(), "{:?}", set.events());
    assert!(!set.is_truncated());
    let trajectory = set.trajectory(BodyId(0)).unwrap();
    assert_eq!(trajectory.x().segment_count(), 1);
    assert_eq!(trajectory.y().segment_count(), 1);
    assert_eq!(set.position_at(BodyId(0), 100.0), Some(point2(300.0, -200.0)));
}

/// A body is hit from behind at the same instant it reaches a wall. Pairwise contacts are
/// resolved before boundary contacts, so the collision with the other body comes first,
/// and the contacts that result at that same instant are resolved in turn.
#[test]
fn simultaneous_pairwise_and_boundary() {
    let simulator = CollisionSimulator::new(
        Some(test_box()),
        [
            (ball(1.0), moving(point2(4.0, 0.0), vec2(10.0, 0.0))),
            (ball(1.0), moving(point2(2.5, 0.0), vec2(20.0, 0.0))),
        ],
    )
    .unwrap();
    let set = simulator.generate(window(0.2));

    let first_four: Vec<Event> = set.events().iter().take(4).copied().collect();
    let t = first_four[0].time();
    assert_close(t, 0.05, "contact time");
    assert_eq!(
        first_four,
        vec![
            Event::Pairwise {
                time: t,
                first: BodyId(0),
                second: BodyId(1)
            },
            Event::Boundary {
                time: t,
                body: BodyId(0),
                wall: Wall::Right
            },
            Event::Pairwise {
                time: t,
                first: BodyId(0),
                second: BodyId(1)
            },
            Event::Boundary {
                time: t,
                body: BodyId(0),
                wall: Wall::Right
            },
        ]
    );
    // Resolving the wall first would instead have left these the other way around.
    let v0 = set.velocity_at(BodyId(0), 0.06).unwrap();
    let v1 = set.velocity_at(BodyId(1), 0.06).unwrap();
    assert_close(v0.x, -10.0, "first body velocity");
    assert_close(v1.x, -20.0, "second body velocity");
    assert_eq!(set.events().len(), 4);
}

#[test]
fn corner_hit_reverses_both_axes() {
    let simulator = CollisionSimulator::new(
        Some(test_box()),
        [(ball(1.0), moving(point2(3.5, 3.5), vec2(2.0, 2.0)))],
    )
    .unwrap();
    let set = simulator.generate(window(1.0));

    let times = event_times(&set);
    assert_eq!(times.len(), 2, "{:?}", set.events());
    assert_close(times[0], 0.5, "corner time");
    assert!(matches!(
        set.events(),
        [
            Event::Boundary {
                wall: Wall::Right,
                ..
            },
            Event::Boundary { wall: Wall::Top, .. },
        ]
    ));
    assert_eq!(set.velocity_at(BodyId(0), 0.75), Some(vec2(-2.0, -2.0)));
}

#[test]
fn grazing_contact_is_not_an_event() {
    // The second body passes the first at a closest distance of exactly one diameter.
    let simulator = CollisionSimulator::new(
        None,
        [
            (ball(1.0), moving(point2(0.0, 0.0), vec2(0.0, 0.0))),
            (ball(1.0), moving(point2(-5.0, 1.0), vec2(10.0, 0.0))),
        ],
    )
    .unwrap();
    let set = simulator.generate(window(1.0));
    assert!(set.events().is_empty(), "{:?}", set.events());
    assert_eq!(set.velocity_at(BodyId(1), 1.0), Some(vec2(10.0, 0.0)));
}

/// Contact speeds at or below [`GRAZING_SPEED`] pass without an event; faster ones bounce.
#[test]
fn crawling_into_a_wall_is_grazing() {
    for (speed, bounces) in [(0.2 * GRAZING_SPEED, false), (2.0 * GRAZING_SPEED, true)] {
        let simulator = CollisionSimulator::new(
            Some(test_box()),
            [(ball(1.0), moving(point2(-4.5, 0.0), vec2(-speed, 0.0)))],
        )
        .unwrap();
        let set = simulator.generate(window(1.0));
        if bounces {
            assert_eq!(
                set.events(),
                &[Event::Boundary {
                    time: 0.0,
                    body: BodyId(0),
                    wall: Wall::Left
                }]
            );
            assert_eq!(set.velocity_at(BodyId(0), 0.5), Some(vec2(speed, 0.0)));
        } else {
            assert!(set.events().is_empty(), "{speed}: {:?}", set.events());
            assert_eq!(set.velocity_at(BodyId(0), 0.5), Some(vec2(-speed, 0.0)));
        }
    }
}

/// Two bodies under different constant accelerations. Their gap is 10 − 1.5t², so they
/// touch at t = √6, moving at 2√6 and −√6.
#[test]
fn accelerating_bodies_collide_at_closed_form_time() {
    let simulator = CollisionSimulator::new(
        None,
        [
            (
                ball(1.0),
                InitialMotion::new(point2(0.0, 0.0), vec2(0.0, 0.0), vec2(2.0, 0.0), 0.0),
            ),
            (
                ball(3.0),
                InitialMotion::new(point2(10.0, 0.0), vec2(0.0, 0.0), vec2(-1.0, 0.0), 0.0),
            ),
        ],
    )
    .unwrap();
    let set = simulator.generate(window(5.0));

    let root6 = 6.0_f64.sqrt();
    let [event] = set.events() else {
        panic!("expected one event, got {:?}", set.events());
    };
    let time = event.time();
    assert_close(time, root6, "collision time");
    assert!(matches!(event, Event::Pairwise { .. }), "{event:?}");

    let a = set.position_at(BodyId(0), time).unwrap();
    let b = set.position_at(BodyId(1), time).unwrap();
    assert_close((b - a).length(), 1.0, "separation at contact");

    // Momentum 1·2√6 + 3·(−√6) and energy ½·24 + ½·3·6 survive the collision.
    assert_close(set.total_momentum_at(time).x, -root6, "momentum");
    assert_close(set.kinetic_energy_at(time), 21.0, "energy");
    assert_close(set.velocity_at(BodyId(0), time).unwrap().x, -2.5 * root6, "first velocity");
    assert_close(set.velocity_at(BodyId(1), time).unwrap().x, 0.5 * root6, "second velocity");
}

/// A slowly accelerating body reaches a distant one only after a long time. The
/// squared distance between them has a tiny leading coefficient, which must not produce
/// contacts where the bodies are nowhere near each other.
#[test]
fn distant_slow_approach_has_no_phantom_contacts() {
    let simulator = CollisionSimulator::new(
        None,
        [
            (
                ball(1.0),
                InitialMotion::new(point2(0.0, 0.0), vec2(0.0, 0.0), vec2(0.01, 0.0), 0.0),
            ),
            (ball(1.0), moving(point2(10000.0, 0.0), vec2(0.0, 0.0))),
        ],
    )
    .unwrap();
    let set = simulator.generate(window(2000.0));

    let [event] = set.events() else {
        panic!("expected one event, got {:?}", set.events());
    };
    let time = event.time();
    let expected = (9999.0_f64 / 0.005).sqrt();
    assert!((time - expected).abs() < 1e-6, "{time} vs {expected}");
    let a = set.position_at(BodyId(0), time).unwrap();
    let b = set.position_at(BodyId(1), time).unwrap();
    let separation = (b - a).length();
    assert!((separation - 1.0).abs() < 1e-6, "separation {separation}");
}

#[test]
fn glancing_collision_conserves_momentum_and_energy() {
    let simulator = CollisionSimulator::new(
        None,
        [
            (ball(2.0), moving(point2(0.0, 0.0), vec2(0.0, 0.0))),
            (ball(1.0), moving(point2(-5.0, 0.99), vec2(10.0, 0.0))),
        ],
    )
    .unwrap();
    let set = simulator.generate(window(1.0));
    assert_eq!(set.events().len(), 1, "{:?}", set.events());

    let before = set.total_momentum_at(0.0);
    let after = set.total_momentum_at(1.0);
    assert_close(after.x, before.x, "momentum x");
    assert_close(after.y, before.y, "momentum y");
    assert_close(set.kinetic_energy_at(1.0), set.kinetic_energy_at(0.0), "energy");
    // The struck body is pushed away from the line of approach.
    assert!(set.velocity_at(BodyId(0), 1.0).unwrap().y < 0.0);
}

#[test]
fn starting_on_wall_moving_into_it() {
    let simulator = CollisionSimulator::new(
        Some(test_box()),
        [(ball(1.0), moving(point2(-4.5, 0.0), vec2(-10.0, 0.0)))],
    )
    .unwrap();
    let set = simulator.generate(window(1.0));
    assert!(matches!(
        set.events(),
        [
            Event::Boundary {
                wall: Wall::Left,
                ..
            },
            Event::Boundary {
                wall: Wall::Right,
                ..
            },
        ]
    ));
    assert_eq!(set.events()[0].time(), 0.0);
    assert_close(set.events()[1].time(), 0.9, "second bounce");
}

#[test]
fn starting_on_wall_moving_away() {
    let simulator = CollisionSimulator::new(
        Some(test_box()),
        [(ball(1.0), moving(point2(-4.5, 0.0), vec2(10.0, 0.0)))],
    )
    .unwrap();
    let set = simulator.generate(window(0.5));
    assert!(set.events().is_empty(), "{:?}", set.events());
}

#[test]
fn starting_in_contact_and_approaching() {
    let simulator = CollisionSimulator::new(
        None,
        [
            (ball(1.0), moving(point2(0.0, 0.0), vec2(1.0, 0.0))),
            (ball(1.0), moving(point2(1.0, 0.0), vec2(0.0, 0.0))),
        ],
    )
    .unwrap();
    let set = simulator.generate(window(1.0));
    assert_eq!(
        set.events(),
        &[Event::Pairwise {
            time: 0.0,
            first: BodyId(0),
            second: BodyId(1)
        }]
    );
    assert_eq!(set.velocity_at(BodyId(0), 0.5), Some(vec2(0.0, 0.0)));
    assert_eq!(set.velocity_at(BodyId(1), 0.5), Some(vec2(1.0, 0.0)));
}

#[test]
fn bouncing_under_gravity_conserves_energy() {
    let simulator = CollisionSimulator::new(
        Some(test_box()),
        [(
            ball(1.0),
            InitialMotion::new(point2(0.0, 4.0), vec2(1.0, 0.0), vec2(0.0, -9.8), 0.0),
        )],
    )
    .unwrap();
    let set = simulator.generate(window(5.0));
    assert!(
        set.events()
            .iter()
            .filter(|e| matches!(e, Event::Boundary { wall: Wall::Bottom, .. }))
            .count()
            >= 2,
        "{:?}",
        set.events()
    );

    let energy = |t: f64| set.kinetic_energy_at(t) + 9.8 * set.position_at(BodyId(0), t).unwrap().y;
    let initial = energy(0.0);
    for step in 0..=50 {
        let t = f64::from(step) / 10.0;
        assert!((energy(t) - initial).abs() < 1e-6, "t = {t}: {}", energy(t));
        let position = set.position_at(BodyId(0), t).unwrap();
        assert!(position.y >= -4.5 - 1e-6, "t = {t}: {position:?}");
    }
}

#[test]
fn event_limit_truncates() {
    let simulator = CollisionSimulator::new(
        Some(test_box()),
        [(ball(1.0), moving(point2(0.0, 0.0), vec2(10.0, 0.0)))],
    )
    .unwrap()
    .with_event_limit(3);
    let set = simulator.generate(window(100.0));
    assert_eq!(set.events().len(), 3);
    assert!(set.is_truncated());
    // Trajectories are still defined everywhere.
    assert!(set.position_at(BodyId(0), 50.0).unwrap().x.is_finite());
}

/// Many bodies with no walls and no acceleration: total momentum and energy never change.
#[test]
fn random_crowd_conserves_momentum_and_energy() {
    let rng = &mut rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(1);
    for _ in 0..10 {
        let mut bodies = Vec::new();
        for row in 0..3 {
            for column in 0..3 {
                let position = point2(
                    f64::from(column) * 3.0 + rng.random_range(-0.5..0.5),
                    f64::from(row) * 3.0 + rng.random_range(-0.5..0.5),
                );
                let velocity = vec2(rng.random_range(-4.0..4.0), rng.random_range(-4.0..4.0));
                bodies.push((
                    Body::new(rng.random_range(0.5..3.0), rng.random_range(0.2..0.8)).unwrap(),
                    moving(position, velocity),
                ));
            }
        }
        let set = CollisionSimulator::new(None, bodies)
            .unwrap()
            .generate(window(3.0));

        let momentum = set.total_momentum_at(0.0);
        let energy = set.kinetic_energy_at(0.0);
        for step in 0..=30 {
            let t = f64::from(step) / 10.0;
            assert!((set.total_momentum_at(t) - momentum).length() < 1e-6, "t = {t}");
            assert!((set.kinetic_energy_at(t) - energy).abs() < 1e-6, "t = {t}");
        }
        // Event times never go backwards.
        let times = event_times(&set);
        assert!(times.windows(2).all(|w| w[0] <= w[1]), "{times:?}");
    }
}

#[test]
fn generation_is_deterministic() {
    let simulator = CollisionSimulator::new(
        Some(test_box()),
        [
            (ball(1.0), moving(point2(-2.0, 1.0), vec2(3.0, 4.0))),
            (ball(2.0), moving(point2(2.0, -1.0), vec2(-5.0, 1.0))),
        ],
    )
    .unwrap();
    assert_eq!(simulator.generate(window(10.0)), simulator.generate(window(10.0)));
}

#[tokio::test]
async fn background_matches_foreground() {
    let simulator = Arc::new(
        CollisionSimulator::new(
            Some(test_box()),
            [
                (ball(1.0), moving(point2(-2.0, 1.0), vec2(3.0, 4.0))),
                (ball(2.0), moving(point2(2.0, -1.0), vec2(-5.0, 1.0))),
            ],
        )
        .unwrap(),
    );
    let foreground = simulator.generate(window(10.0));
    let background = generate_in_background(simulator, window(10.0)).await;
    assert_eq!(foreground, background);
}

#[test]
fn queries() {
    let simulator = CollisionSimulator::new(
        None,
        [
            (ball(1.0), moving(point2(0.0, 0.0), vec2(1.0, 0.0))),
            (ball(3.0), moving(point2(0.0, 5.0), vec2(0.0, 2.0))),
        ],
    )
    .unwrap();
    let set = simulator.generate(window(1.0));

    assert_eq!(set.bodies().len(), 2);
    assert_eq!(set.body(BodyId(1)).map(Body::mass), Some(3.0));
    assert_eq!(set.position_at(BodyId(2), 0.0), None);
    assert_eq!(set.acceleration_at(BodyId(0), 0.0), Some(vec2(0.0, 0.0)));
    assert_eq!(
        set.positions_at(2.0),
        vec![(BodyId(0), point2(2.0, 0.0)), (BodyId(1), point2(0.0, 9.0))]
    );
    assert_eq!(set.total_momentum_at(0.0), vec2(1.0, 6.0));
    assert_eq!(set.kinetic_energy_at(0.0), 6.5);
}

#[test]
fn sample_uses_clock_time_from_window_start() {
    let simulator = CollisionSimulator::new(
        None,
        [(ball(1.0), moving(point2(0.0, 0.0), vec2(2.0, 0.0)))],
    )
    .unwrap();
    let set = simulator.generate(SimulationWindow::new(10.0, 20.0).unwrap());
    let clock = ManualClock::at(Duration::from_millis(1500));
    assert_eq!(set.sample(&clock), vec![(BodyId(0), point2(23.0, 0.0))]);
}

#[test]
fn rejects_non_finite_motion() {
    let error = CollisionSimulator::new(
        None,
        [(ball(1.0), moving(point2(f64::NAN, 0.0), vec2(0.0, 0.0)))],
    )
    .unwrap_err();
    assert_eq!(error.to_string(), "initial position must be finite, not NaN");
}

#[test]
fn window_validation() {
    assert!(SimulationWindow::new(1.0, 0.0).is_err());
    assert!(SimulationWindow::new(0.0, f64::INFINITY).is_err());
    assert!(SimulationWindow::new(2.0, 2.0).is_ok());
}
