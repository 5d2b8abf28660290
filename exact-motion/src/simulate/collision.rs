use euclid::Vector2D;
use itertools::Itertools as _;

use crate::ConfigError;
use crate::arena::{Arena, Axis, Wall};
use crate::body::{Body, BodyId};
use crate::math::{EPSILON, Polynomial, Velocity, approx_cmp, approx_eq};
use crate::simulate::{
    DEFAULT_EVENT_LIMIT, Event, GRAZING_SPEED, SimulationWindow, Simulator, TrajectorySet,
};
use crate::trajectory::{AxisMotion, InitialMotion, Trajectory};

/// Computes the motion of disc-shaped bodies which collide elastically with each other
/// and with the walls of an optional [`Arena`].
///
/// Each body moves with its own constant acceleration between collisions. Collisions
/// conserve momentum and kinetic energy, and change only velocity.
///
/// Bodies that start out overlapping each other, or outside the arena, are not
/// separated; they simply do not collide until they have come apart.
#[derive(Clone, Debug)]
pub struct CollisionSimulator {
    arena: Option<Arena>,
    bodies: Vec<(Body, InitialMotion)>,
    event_limit: usize,
}

impl CollisionSimulator {
    /// Constructs a simulator for the given bodies, which will be assigned [`BodyId`]s
    /// in iteration order.
    ///
    /// Returns an error if any initial motion has a component which is not finite.
    pub fn new(
        arena: Option<Arena>,
        bodies: impl IntoIterator<Item = (Body, InitialMotion)>,
    ) -> Result<Self, ConfigError> {
        let bodies: Vec<(Body, InitialMotion)> = bodies.into_iter().collect();
        for (_, motion) in &bodies {
            motion.x.validate()?;
            motion.y.validate()?;
        }
        Ok(Self {
            arena,
            bodies,
            event_limit: DEFAULT_EVENT_LIMIT,
        })
    }

    /// Sets the maximum number of events a single run of [`Simulator::generate()`] will
    /// resolve. Once it is reached, generation stops early and logs a warning.
    ///
    /// The default is [`DEFAULT_EVENT_LIMIT`].
    #[must_use]
    pub fn with_event_limit(mut self, event_limit: usize) -> Self {
        self.event_limit = event_limit;
        self
    }

    /// The walls bodies bounce off, if any.
    pub fn arena(&self) -> Option<&Arena> {
        self.arena.as_ref()
    }

    /// Iterates over the bodies and their initial motion.
    pub fn bodies(&self) -> impl ExactSizeIterator<Item = (BodyId, &Body, &InitialMotion)> + '_ {
        self.bodies
            .iter()
            .enumerate()
            .map(|(index, (body, motion))| (BodyId(index), body, motion))
    }

    /// Number of events after which generation stops early.
    pub fn event_limit(&self) -> usize {
        self.event_limit
    }
}

impl Simulator for CollisionSimulator {
    type Output = TrajectorySet;

    fn generate(&self, window: SimulationWindow) -> TrajectorySet {
        log::debug!(
            "generating {n} trajectories over [{start}, {end}]",
            n = self.bodies.len(),
            start = window.start(),
            end = window.end(),
        );

        let mut run = Run {
            arena: self.arena,
            bodies: self.bodies.iter().map(|&(body, _)| body).collect(),
            trajectories: self
                .bodies
                .iter()
                .map(|(_, motion)| Trajectory::new(motion))
                .collect(),
            end: window.end(),
            event_limit: self.event_limit,
            events: Vec::new(),
            truncated: false,
        };

        let mut state = State::Running(window.start());
        while let State::Running(t) = state {
            state = run.step(t);
        }

        log::debug!(
            "generated {n} events{truncated}",
            n = run.events.len(),
            truncated = if run.truncated { " (truncated)" } else { "" },
        );
        TrajectorySet {
            window,
            bodies: run.bodies,
            trajectories: run.trajectories,
            events: run.events,
            truncated: run.truncated,
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    /// Everything up to and including this time has been resolved.
    Running(f64),
    /// There are no more events within the window.
    Done,
}

/// A potential collision: two bodies, by index, or a body and a wall.
///
/// The derived ordering is the order in which simultaneous contacts are resolved.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
enum Contact {
    Pair(usize, usize),
    Wall(usize, Wall),
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    time: f64,
    contact: Contact,
}

/// Mutable state of a single [`Simulator::generate()`] call.
struct Run {
    arena: Option<Arena>,
    bodies: Vec<Body>,
    trajectories: Vec<Trajectory>,
    end: f64,
    event_limit: usize,
    events: Vec<Event>,
    truncated: bool,
}

impl Run {
    /// Finds the earliest contacts after `t`, resolves them, and reports where to continue.
    fn step(&mut self, t: f64) -> State {
        let candidates = self.candidates(t);
        let Some(earliest) = candidates.iter().map(|c| c.time).min_by(f64::total_cmp) else {
            return State::Done;
        };
        let mut simultaneous: Vec<Contact> = candidates
            .into_iter()
            .filter(|c| approx_eq(c.time, earliest))
            .map(|c| c.contact)
            .collect();
        simultaneous.sort_unstable();
        simultaneous.dedup();

        let mut resolved_any = false;
        for contact in simultaneous {
            if self.events.len() >= self.event_limit {
                log::warn!(
                    "stopping at t = {earliest} after reaching the limit of {} events",
                    self.event_limit
                );
                self.truncated = true;
                return State::Done;
            }
            // Earlier contacts in this same instant may have changed velocities, so
            // each is checked again before it is resolved.
            let event = match contact {
                Contact::Pair(i, j) => self.resolve_pair(i, j, earliest),
                Contact::Wall(i, wall) => self.resolve_wall(i, wall, earliest),
            };
            if let Some(event) = event {
                self.events.push(event);
                resolved_any = true;
            }
        }

        if !resolved_any && approx_cmp(earliest, t).is_le() {
            // Nothing changed and time did not advance, so the next step would find the
            // same contacts again.
            log::warn!("stopping at t = {t}: contacts found but none could be resolved");
            return State::Done;
        }
        State::Running(earliest)
    }

    /// Collects every approaching contact either happening now (at `t`) or found by root
    /// search in `(t, end]`. Only the earliest per contact is reported.
    fn candidates(&self, t: f64) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        let current: Vec<[&Polynomial; 2]> =
            (0..self.bodies.len()).map(|i| self.polynomials(i, t)).collect();

        for (i, j) in (0..self.bodies.len()).tuple_combinations() {
            let ([xi, yi], [xj, yj]) = (current[i], current[j]);
            if xi == xj && yi == yj {
                // Moving together; the distance between them never changes.
                continue;
            }
            let reach = self.bodies[i].radius() + self.bodies[j].radius();
            let dx = xj - xi;
            let dy = yj - yi;
            let approaching =
                |time: f64| pair_approach(&dx, &dy, time).is_some_and(|(_, speed)| speed < 0.0);
            let touching =
                |time: f64| approx_eq(dx.evaluate(time).hypot(dy.evaluate(time)), reach);

            if touching(t) && approaching(t) {
                candidates.push(Candidate {
                    time: t,
                    contact: Contact::Pair(i, j),
                });
                continue;
            }

            let gap = (&dx * &dx + &dy * &dy) - reach * reach;
            let roots = gap.roots_in(0.0, t, self.end);
            log::trace!("pair ({i}, {j}) gap {gap} has roots {roots:?} after {t}");
            if let Some(time) = roots
                .into_iter()
                .find(|&root| touching(root) && approaching(root))
            {
                candidates.push(Candidate {
                    time,
                    contact: Contact::Pair(i, j),
                });
            }
        }

        if let Some(arena) = self.arena {
            for (i, body) in self.bodies.iter().enumerate() {
                for wall in Wall::ALL {
                    let position = current[i][wall.axis() as usize];
                    let velocity = position.derivative();
                    let target = arena.contact_coordinate(wall, body.radius());
                    let approaching =
                        |time: f64| wall.inward() * velocity.evaluate(time) < -GRAZING_SPEED;
                    let touching = |time: f64| approx_eq(position.evaluate(time), target);

                    if touching(t) && approaching(t) {
                        candidates.push(Candidate {
                            time: t,
                            contact: Contact::Wall(i, wall),
                        });
                        continue;
                    }

                    let roots = position.roots_in(target, t, self.end);
                    log::trace!("body {i} reaches {wall:?} at {roots:?} after {t}");
                    if let Some(time) = roots
                        .into_iter()
                        .find(|&root| touching(root) && approaching(root))
                    {
                        candidates.push(Candidate {
                            time,
                            contact: Contact::Wall(i, wall),
                        });
                    }
                }
            }
        }

        candidates
    }

    /// The X and Y position polynomials of body `i` in effect at `t`.
    fn polynomials(&self, i: usize, t: f64) -> [&Polynomial; 2] {
        Axis::ALL.map(|axis| {
            self.trajectories[i]
                .axis(axis)
                .polynomial_at(t)
                .expect("trajectories cover all non-NaN time")
        })
    }

    /// Resolves an elastic collision between bodies `i` and `j` at time `te`, if they are
    /// (still) approaching each other.
    fn resolve_pair(&mut self, i: usize, j: usize, te: f64) -> Option<Event> {
        let [xi, yi] = self.polynomials(i, te).map(Polynomial::clone);
        let [xj, yj] = self.polynomials(j, te).map(Polynomial::clone);
        let (normal, _) = pair_approach(&(&xj - &xi), &(&yj - &yi), te)
            .filter(|&(_, speed)| speed < 0.0)?;

        let (m1, m2) = (self.bodies[i].mass(), self.bodies[j].mass());
        let v1 = self.trajectories[i].velocity_at(te);
        let v2 = self.trajectories[j].velocity_at(te);
        let (n1, n2) = (v1.dot(normal), v2.dot(normal));
        let (tangential1, tangential2) = (v1 - normal * n1, v2 - normal * n2);
        let (new_n1, new_n2) = exchange_normal_speeds(m1, m2, n1, n2);

        let new_v1 = tangential1 + normal * new_n1;
        let new_v2 = tangential2 + normal * new_n2;
        log::debug!(
            "t = {te}: bodies {i} and {j} collide; velocities {v1:?}, {v2:?} become {new_v1:?}, {new_v2:?}"
        );
        self.reseed(i, te, new_v1);
        self.reseed(j, te, new_v2);
        Some(Event::Pairwise {
            time: te,
            first: BodyId(i),
            second: BodyId(j),
        })
    }

    /// Resolves body `i` bouncing off `wall` at time `te`, if it is (still) moving into it.
    fn resolve_wall(&mut self, i: usize, wall: Wall, te: f64) -> Option<Event> {
        let axis = wall.axis();
        let trajectory = self.trajectories[i].axis_mut(axis);
        let state = trajectory.state_at(te);
        if wall.inward() * state.velocity >= -GRAZING_SPEED {
            return None;
        }
        log::debug!(
            "t = {te}: body {i} bounces off {wall:?}; velocity {v} becomes {new_v}",
            v = state.velocity,
            new_v = -state.velocity,
        );
        trajectory.seed(
            te..,
            AxisMotion {
                velocity: -state.velocity,
                ..state
            },
        );
        Some(Event::Boundary {
            time: te,
            body: BodyId(i),
            wall,
        })
    }

    /// Replaces body `i`’s motion from `te` onward with the same position and
    /// acceleration but a new velocity.
    fn reseed(&mut self, i: usize, te: f64, velocity: Vector2D<f64, Velocity>) {
        let trajectory = &mut self.trajectories[i];
        for (axis, new_velocity) in [(Axis::X, velocity.x), (Axis::Y, velocity.y)] {
            let axis_trajectory = trajectory.axis_mut(axis);
            let state = axis_trajectory.state_at(te);
            axis_trajectory.seed(
                te..,
                AxisMotion {
                    velocity: new_velocity,
                    ..state
                },
            );
        }
    }
}

/// Given the displacement polynomials from body `i` to body `j`, returns the unit normal
/// pointing from `i` to `j` at `time`, and the speed at which they are separating along
/// it (negative if approaching), with speeds within [`GRAZING_SPEED`] of zero reported as
/// zero.
///
/// If the centers coincide, the normal is taken along the relative velocity instead.
/// Returns [`None`] if neither gives a direction.
fn pair_approach(
    dx: &Polynomial,
    dy: &Polynomial,
    time: f64,
) -> Option<(Vector2D<f64, Velocity>, f64)> {
    let displacement = Vector2D::<f64, Velocity>::new(dx.evaluate(time), dy.evaluate(time));
    let relative_velocity = Vector2D::<f64, Velocity>::new(
        dx.derivative().evaluate(time),
        dy.derivative().evaluate(time),
    );
    let normal = if displacement.length() > EPSILON {
        displacement.normalize()
    } else if relative_velocity.length() > EPSILON {
        // j is moving toward where i is, so the contact normal opposes the motion.
        -relative_velocity.normalize()
    } else {
        return None;
    };
    let speed = relative_velocity.dot(normal);
    let speed = if speed.abs() <= GRAZING_SPEED {
        0.0
    } else {
        speed
    };
    Some((normal, speed))
}

/// Returns the normal speeds of two bodies after an elastic collision, given their
/// masses and normal speeds before.
///
/// The new speed of the second body is a root of the kinetic energy, written as a
/// quadratic in that speed by substituting in the conserved momentum. One root is the
/// old speed; the other is the answer.
fn exchange_normal_speeds(m1: f64, m2: f64, n1: f64, n2: f64) -> (f64, f64) {
    let momentum = m1 * n1 + m2 * n2;
    let energy = 0.5 * m1 * n1 * n1 + 0.5 * m2 * n2 * n2;

    // n1 as a function of n2
    let first_of_second = Polynomial::new([momentum / m1, -m2 / m1]);
    let energy_of_second =
        first_of_second.powi(2) * (0.5 * m1) + Polynomial::identity().powi(2) * (0.5 * m2);

    let farthest = energy_of_second
        .roots(energy)
        .into_iter()
        .max_by(|a, b| (a - n2).abs().total_cmp(&(b - n2).abs()));
    let new_n2 = match farthest {
        Some(root) if !approx_eq(root, n2) => root,
        _ => {
            // The two roots were too close to tell apart (a very light body bouncing off
            // a very heavy one), or rounding lost them. Their sum is exact: −b/a.
            let &[_, b, a] = energy_of_second.coefficients() else {
                return (n1, n2);
            };
            -b / a - n2
        }
    };
    (first_of_second.evaluate(new_n2), new_n2)
}
