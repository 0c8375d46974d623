//! Animation ticks.
//!
//! The animator walks the scene once per tick and lets every node with an
//! animation hook update its own local transform. The time since the
//! previous tick lives in an [`AnimationClock`] owned by the frame loop.

use std::convert::Infallible;

use cgmath::Matrix4;
use instant::Instant;

use crate::data_structures::scene_graph::{Node, Scene, walk_mut};

/// Remembers when the previous animation tick happened.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnimationClock {
    last_tick: Option<Instant>,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self { last_tick: None }
    }

    /// Record a tick at `now`.
    ///
    /// Returns the seconds since the previous tick, or `None` for the very
    /// first one since there is nothing to measure against yet.
    pub fn tick_at(&mut self, now: Instant) -> Option<f32> {
        let elapsed = self
            .last_tick
            .map(|last| now.duration_since(last).as_secs_f32());
        self.last_tick = Some(now);
        elapsed
    }

    pub fn tick(&mut self) -> Option<f32> {
        self.tick_at(Instant::now())
    }

    /// Forget the previous tick, e.g. after the loop was suspended.
    pub fn reset(&mut self) {
        self.last_tick = None;
    }
}

/// Visitor running a node's own animation hook with the elapsed seconds.
pub fn animation_visitor<D>(
    node: &mut Node<D>,
    _world: &Matrix4<f32>,
    elapsed: &mut f32,
) -> Result<(), Infallible> {
    node.tick(*elapsed);
    Ok(())
}

/// Run one animation tick over `scene`.
///
/// The first tick of a clock only starts the clock. Returns whether the
/// hooks were invoked.
pub fn animate<D>(scene: &mut Scene<D>, clock: &mut AnimationClock, now: Instant) -> bool {
    let Some(mut elapsed) = clock.tick_at(now) else {
        return false;
    };
    match walk_mut(&mut scene.root, &mut animation_visitor::<D>, &mut elapsed, None) {
        Ok(()) => true,
        Err(never) => match never {},
    }
}
