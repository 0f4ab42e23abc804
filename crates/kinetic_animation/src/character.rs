//! Animated characters
//!
//! A character is the per-node animation state: the pose it currently shows
//! and the single step (initial pose to target pose over a duration) it is
//! playing.

use kinetic_core::NodeId;

use crate::pose::{Interpolate, Pose};

#[derive(Clone, Debug, PartialEq)]
pub struct Character {
    node: NodeId,
    current: Pose,
    initial: Pose,
    target: Pose,
    duration_ms: f32,
    elapsed_ms: f32,
    animating: bool,
}

impl Character {
    pub fn new(node: NodeId, pose: Pose) -> Self {
        Self {
            node,
            initial: pose.clone(),
            target: pose.clone(),
            current: pose,
            duration_ms: 0.0,
            elapsed_ms: 0.0,
            animating: false,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Pose as of the last frame
    pub fn current(&self) -> &Pose {
        &self.current
    }

    pub fn initial(&self) -> &Pose {
        &self.initial
    }

    pub fn target(&self) -> &Pose {
        &self.target
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Step progress in 0.0..=1.0
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    /// Prepare a step from the current pose to `target`
    ///
    /// The character is left not-yet-animating; the driver starts it.
    pub fn begin_step(&mut self, target: Pose, duration_ms: f32) {
        self.initial = self.current.clone();
        self.target = target;
        self.duration_ms = duration_ms.max(0.0);
        self.elapsed_ms = 0.0;
        self.animating = false;
    }

    /// Finish the step immediately
    pub fn snap_to_target(&mut self) {
        self.current = self.current.merged(&self.target);
        self.elapsed_ms = self.duration_ms;
        self.animating = false;
    }

    pub(crate) fn set_animating(&mut self, animating: bool) {
        self.animating = animating;
    }

    /// Advance by `dt_ms`. Returns true when this call finished the step.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        if !self.animating {
            return false;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        let t = self.progress();
        self.current = self.initial.lerp(&self.target, t);
        if t >= 1.0 {
            self.elapsed_ms = self.duration_ms;
            self.animating = false;
            return true;
        }
        false
    }
}
