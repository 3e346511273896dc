//! Simulated vehicle tracking
//!
//! A vehicle travels along a fixed polyline in percentage space. Progress
//! advances by a fixed step on every timer tick; the position is interpolated
//! linearly between the two waypoints bounding the current progress. Once
//! progress reaches 100 the next tick restarts the loop at 0.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info};

use crate::{Result, WanderlustError};

/// A point of the route in percentage coordinates (0-100 on both axes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

impl Waypoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn lerp(self, to: Waypoint, t: f64) -> Waypoint {
        Waypoint {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }
}

/// Route shown on the tracking page
pub const DEMO_ROUTE: [Waypoint; 6] = [
    Waypoint::new(10.0, 50.0),
    Waypoint::new(25.0, 40.0),
    Waypoint::new(40.0, 60.0),
    Waypoint::new(60.0, 55.0),
    Waypoint::new(75.0, 30.0),
    Waypoint::new(90.0, 45.0),
];

/// Ordered, non-empty list of waypoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VehiclePath {
    waypoints: Vec<Waypoint>,
}

impl VehiclePath {
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self> {
        if waypoints.is_empty() {
            return Err(WanderlustError::validation(
                "a vehicle path needs at least one waypoint",
            ));
        }
        Ok(Self { waypoints })
    }

    #[must_use]
    pub fn demo() -> Self {
        Self {
            waypoints: DEMO_ROUTE.to_vec(),
        }
    }

    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    #[must_use]
    pub fn start(&self) -> Waypoint {
        self.waypoints[0]
    }

    #[must_use]
    pub fn end(&self) -> Waypoint {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// Position for a progress value in percent.
    ///
    /// The segment index is `floor(p/100 * (N-1))` and the offset inside the
    /// segment is the fractional part of the same product. Past the last
    /// segment the position clamps to the final waypoint.
    #[must_use]
    pub fn position_at(&self, progress: f64) -> Waypoint {
        let spans = (self.waypoints.len() - 1) as f64;
        let scaled = (progress / 100.0) * spans;
        let segment = scaled.floor().max(0.0) as usize;
        let offset = scaled % 1.0;

        match (self.waypoints.get(segment), self.waypoints.get(segment + 1)) {
            (Some(&start), Some(&end)) => start.lerp(end, offset),
            _ => self.end(),
        }
    }

    /// Outline of the route as an SVG path in percentage units
    #[must_use]
    pub fn outline(&self) -> String {
        let mut parts = self.waypoints.iter().enumerate().map(|(i, p)| {
            let command = if i == 0 { 'M' } else { 'L' };
            format!("{command} {}% {}%", p.x, p.y)
        });
        let first = parts.next().unwrap_or_default();
        parts.fold(first, |acc, part| acc + " " + &part)
    }
}

/// Animation state after a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackingSnapshot {
    /// Percent complete, 0 to 100
    pub progress: u32,
    pub position: Waypoint,
}

/// Deterministic, restartable animation state machine
#[derive(Debug, Clone)]
pub struct TrackingSimulation {
    path: VehiclePath,
    step: u32,
    snapshot: TrackingSnapshot,
}

impl TrackingSimulation {
    #[must_use]
    pub fn new(path: VehiclePath, step: u32) -> Self {
        let snapshot = TrackingSnapshot {
            progress: 0,
            position: path.start(),
        };
        Self {
            path,
            step: step.max(1),
            snapshot,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> TrackingSnapshot {
        self.snapshot
    }

    #[must_use]
    pub fn path(&self) -> &VehiclePath {
        &self.path
    }

    /// Advance one tick. A completed run only resets progress; the vehicle
    /// stays where it is until the following tick moves it again.
    pub fn tick(&mut self) -> TrackingSnapshot {
        if self.snapshot.progress >= 100 {
            self.snapshot.progress = 0;
            return self.snapshot;
        }

        let progress = (self.snapshot.progress + self.step).min(100);
        self.snapshot = TrackingSnapshot {
            progress,
            position: self.path.position_at(f64::from(progress)),
        };
        self.snapshot
    }
}

/// Handle to a running animation. Dropping it stops the task.
#[derive(Debug)]
pub struct TrackingTask {
    updates: watch::Receiver<TrackingSnapshot>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl TrackingTask {
    /// Spawn the animation on the current runtime, ticking every `interval`
    pub fn spawn(simulation: TrackingSimulation, interval: Duration) -> Self {
        Self::spawn_with_token(simulation, interval, CancellationToken::new())
    }

    /// Spawn the animation bound to `cancel`, e.g. a child of the server token
    pub fn spawn_with_token(
        mut simulation: TrackingSimulation,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, rx) = watch::channel(simulation.snapshot());
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick of an interval completes immediately
            ticker.tick().await;
            info!(interval_ms = interval.as_millis() as u64, "Tracking animation started");

            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                // A retired view must never observe another mutation
                if token.is_cancelled() {
                    break;
                }
                let snapshot = simulation.tick();
                if tx.send(snapshot).is_err() {
                    break;
                }
            }

            debug!("Tracking animation stopped");
        });

        Self {
            updates: rx,
            _guard: cancel.clone().drop_guard(),
            cancel,
        }
    }

    #[must_use]
    pub fn current(&self) -> TrackingSnapshot {
        *self.updates.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TrackingSnapshot> {
        self.updates.clone()
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn on_segment(p: Waypoint, a: Waypoint, b: Waypoint) -> bool {
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        let within_x = p.x >= a.x.min(b.x) - 1e-9 && p.x <= a.x.max(b.x) + 1e-9;
        let within_y = p.y >= a.y.min(b.y) - 1e-9 && p.y <= a.y.max(b.y) + 1e-9;
        cross.abs() < 1e-9 && within_x && within_y
    }

    #[test]
    fn test_start_is_first_waypoint() {
        let path = VehiclePath::demo();
        assert_eq!(path.position_at(0.0), Waypoint::new(10.0, 50.0));
    }

    #[test]
    fn test_full_progress_clamps_to_last_waypoint() {
        let path = VehiclePath::demo();
        assert_eq!(path.position_at(100.0), Waypoint::new(90.0, 45.0));
    }

    #[test]
    fn test_midpoint_of_first_segment() {
        let path = VehiclePath::demo();
        // 10% of 5 spans is half of the first segment
        assert_eq!(path.position_at(10.0), Waypoint::new(17.5, 45.0));
    }

    #[test]
    fn test_approaches_last_waypoint() {
        let path = VehiclePath::demo();
        let near_end = path.position_at(99.999);
        assert!((near_end.x - 90.0).abs() < 0.01);
        assert!((near_end.y - 45.0).abs() < 0.01);
    }

    #[rstest]
    #[case(0.0)]
    #[case(3.0)]
    #[case(19.0)]
    #[case(20.0)]
    #[case(47.5)]
    #[case(61.0)]
    #[case(99.0)]
    fn test_position_lies_on_bounding_segment(#[case] progress: f64) {
        let path = VehiclePath::demo();
        let spans = (path.waypoints().len() - 1) as f64;
        let segment = ((progress / 100.0) * spans).floor() as usize;
        let a = path.waypoints()[segment];
        let b = path.waypoints()[segment + 1];
        assert!(on_segment(path.position_at(progress), a, b));
    }

    #[test]
    fn test_single_waypoint_path_is_stationary() {
        let path = VehiclePath::new(vec![Waypoint::new(5.0, 5.0)]).unwrap();
        assert_eq!(path.position_at(0.0), Waypoint::new(5.0, 5.0));
        assert_eq!(path.position_at(55.0), Waypoint::new(5.0, 5.0));
    }

    #[test]
    fn test_empty_path_is_rejected() {
        assert!(VehiclePath::new(Vec::new()).is_err());
    }

    #[test]
    fn test_outline() {
        let path = VehiclePath::new(vec![Waypoint::new(10.0, 50.0), Waypoint::new(25.5, 40.0)])
            .unwrap();
        assert_eq!(path.outline(), "M 10% 50% L 25.5% 40%");
    }

    #[test]
    fn test_simulation_loops_after_completion() {
        let mut sim = TrackingSimulation::new(VehiclePath::demo(), 1);
        for _ in 0..100 {
            sim.tick();
        }
        let done = sim.snapshot();
        assert_eq!(done.progress, 100);
        assert_eq!(done.position, Waypoint::new(90.0, 45.0));

        let reset = sim.tick();
        assert_eq!(reset.progress, 0);
        assert_eq!(reset.position, done.position);

        let restarted = sim.tick();
        assert_eq!(restarted.progress, 1);
        assert_eq!(restarted.position, VehiclePath::demo().position_at(1.0));
    }

    #[test]
    fn test_large_steps_never_overshoot() {
        let mut sim = TrackingSimulation::new(VehiclePath::demo(), 30);
        let progress: Vec<u32> = (0..6).map(|_| sim.tick().progress).collect();
        assert_eq!(progress, vec![30, 60, 90, 100, 0, 30]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_ticks_on_interval() {
        let sim = TrackingSimulation::new(VehiclePath::demo(), 1);
        let task = TrackingTask::spawn(sim, Duration::from_millis(200));
        let mut updates = task.subscribe();

        for expected in 1..=3 {
            updates.changed().await.unwrap();
            assert_eq!(updates.borrow().progress, expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_stops_mutating() {
        let sim = TrackingSimulation::new(VehiclePath::demo(), 1);
        let task = TrackingTask::spawn(sim, Duration::from_millis(200));
        let mut updates = task.subscribe();
        updates.changed().await.unwrap();

        task.stop();
        let frozen = task.current();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(task.is_stopped());
        assert_eq!(task.current(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_cancels_parent_token() {
        let token = CancellationToken::new();
        let sim = TrackingSimulation::new(VehiclePath::demo(), 1);
        let task = TrackingTask::spawn_with_token(sim, Duration::from_millis(200), token.clone());
        drop(task);
        assert!(token.is_cancelled());
    }
}
