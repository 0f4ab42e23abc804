//! Per-frame animation driver
//!
//! [`FrameDriver`] owns every character and advances the active ones each
//! frame. It knows nothing about keyframes: finished steps are returned from
//! [`FrameDriver::tick`] and whoever sequences them decides what comes next.

use std::time::{Duration, Instant};

use kinetic_core::NodeId;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::character::Character;
use crate::pose::Pose;

new_key_type! {
    /// Handle to a character owned by a driver
    pub struct CharacterId;
}

/// What a sequencer needs from the thing that plays steps
pub trait AnimationDriver {
    /// Start interpolating the character's current step. Returns false for
    /// an unknown character.
    fn trigger(&mut self, id: CharacterId) -> bool;

    /// Stop interpolating. Returns true if the character was active.
    fn remove(&mut self, id: CharacterId) -> bool;

    /// The character currently animating on `node`
    fn exists(&self, node: NodeId) -> Option<CharacterId>;

    fn character(&self, id: CharacterId) -> Option<&Character>;

    fn character_mut(&mut self, id: CharacterId) -> Option<&mut Character>;

    /// A step is about to start at `now`. Drivers that measure frame time
    /// resync their clock here when nothing was running.
    fn resume_clock(&mut self, _now: Instant) {}
}

/// Slot-map backed driver ticked by the host loop
#[derive(Debug)]
pub struct FrameDriver {
    characters: SlotMap<CharacterId, Character>,
    by_node: FxHashMap<NodeId, CharacterId>,
    active: Vec<CharacterId>,
    last_frame: Option<Instant>,
    target_fps: u32,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            characters: SlotMap::with_key(),
            by_node: FxHashMap::default(),
            active: Vec::new(),
            last_frame: None,
            target_fps: 120,
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.max(1);
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Time between frames at the target rate
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps))
    }

    /// Register the character for `node`, showing `pose`
    ///
    /// A node has at most one character: if it already has one, that one is
    /// returned unchanged.
    pub fn add_character(&mut self, node: NodeId, pose: Pose) -> CharacterId {
        if let Some(id) = self.by_node.get(&node) {
            return *id;
        }
        let id = self.characters.insert(Character::new(node, pose));
        self.by_node.insert(node, id);
        id
    }

    pub fn remove_character(&mut self, id: CharacterId) -> Option<Character> {
        let character = self.characters.remove(id)?;
        self.by_node.remove(&character.node());
        self.active.retain(|active| *active != id);
        Some(character)
    }

    /// The character registered for `node`, animating or not
    pub fn find(&self, node: NodeId) -> Option<CharacterId> {
        self.by_node.get(&node).copied()
    }

    pub fn is_active(&self, id: CharacterId) -> bool {
        self.active.contains(&id)
    }

    pub fn has_active(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// When the next frame is due at the target rate, or `None` while idle
    pub fn next_frame_at(&self, now: Instant) -> Option<Instant> {
        if !self.has_active() {
            return None;
        }
        Some(self.last_frame.unwrap_or(now) + self.frame_interval())
    }

    /// Advance by the wall time since the previous tick
    ///
    /// The first tick only records the clock. Returns the characters whose
    /// step finished during this frame.
    pub fn tick(&mut self, now: Instant) -> Vec<CharacterId> {
        let dt_ms = self
            .last_frame
            .map(|last| now.saturating_duration_since(last).as_secs_f32() * 1000.0)
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        self.advance(dt_ms)
    }

    /// Advance every active character by `dt_ms`
    pub fn advance(&mut self, dt_ms: f32) -> Vec<CharacterId> {
        let mut finished = Vec::new();
        let characters = &mut self.characters;
        self.active.retain(|id| match characters.get_mut(*id) {
            Some(character) => {
                if character.advance(dt_ms) {
                    finished.push(*id);
                    false
                } else {
                    true
                }
            }
            None => false,
        });
        if !finished.is_empty() {
            tracing::trace!("FrameDriver: {} step(s) finished", finished.len());
        }
        finished
    }
}

impl AnimationDriver for FrameDriver {
    fn trigger(&mut self, id: CharacterId) -> bool {
        let Some(character) = self.characters.get_mut(id) else {
            return false;
        };
        character.set_animating(true);
        if !self.active.contains(&id) {
            self.active.push(id);
        }
        true
    }

    fn remove(&mut self, id: CharacterId) -> bool {
        if let Some(character) = self.characters.get_mut(id) {
            character.set_animating(false);
        }
        let before = self.active.len();
        self.active.retain(|active| *active != id);
        self.active.len() != before
    }

    fn exists(&self, node: NodeId) -> Option<CharacterId> {
        self.find(node).filter(|id| self.is_active(*id))
    }

    fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(id)
    }

    fn character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.get_mut(id)
    }

    fn resume_clock(&mut self, now: Instant) {
        // an idle gap must not reach the first step as dt
        if !self.has_active() {
            self.last_frame = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(n: usize) -> Vec<NodeId> {
        let mut map: SlotMap<NodeId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_one_character_per_node() {
        let node = nodes(1)[0];
        let mut driver = FrameDriver::new();
        let a = driver.add_character(node, Pose::new().with("left", 0.0));
        let b = driver.add_character(node, Pose::new().with("left", 50.0));
        assert_eq!(a, b);
        assert_eq!(driver.len(), 1);
        assert_eq!(driver.character(a).unwrap().current().get("left"), Some(0.0));
    }

    #[test]
    fn test_trigger_advance_finish() {
        let node = nodes(1)[0];
        let mut driver = FrameDriver::new();
        let id = driver.add_character(node, Pose::new().with("left", 0.0));
        driver
            .character_mut(id)
            .unwrap()
            .begin_step(Pose::new().with("left", 10.0), 100.0);

        assert_eq!(driver.exists(node), None);
        assert!(driver.trigger(id));
        assert_eq!(driver.exists(node), Some(id));

        assert!(driver.advance(60.0).is_empty());
        assert_eq!(driver.advance(60.0), vec![id]);
        assert!(!driver.has_active());
        assert_eq!(driver.exists(node), None);
        assert_eq!(driver.find(node), Some(id));
    }

    #[test]
    fn test_tick_measures_wall_time() {
        let node = nodes(1)[0];
        let mut driver = FrameDriver::new();
        let id = driver.add_character(node, Pose::new().with("left", 0.0));
        driver
            .character_mut(id)
            .unwrap()
            .begin_step(Pose::new().with("left", 100.0), 1000.0);
        driver.trigger(id);

        let start = Instant::now();
        assert!(driver.tick(start).is_empty());
        driver.tick(start + Duration::from_millis(500));
        let left = driver.character(id).unwrap().current().get("left").unwrap();
        assert!((left - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_idle_gap_not_counted_after_resume() {
        let node = nodes(1)[0];
        let mut driver = FrameDriver::new();
        let id = driver.add_character(node, Pose::new().with("left", 0.0));

        let start = Instant::now();
        driver.tick(start);
        let resumed = start + Duration::from_secs(10);
        driver.resume_clock(resumed);
        driver
            .character_mut(id)
            .unwrap()
            .begin_step(Pose::new().with("left", 100.0), 1000.0);
        driver.trigger(id);

        assert!(driver.tick(resumed + Duration::from_millis(16)).is_empty());
        let left = driver.character(id).unwrap().current().get("left").unwrap();
        assert!((left - 1.6).abs() < 1e-3);
    }

    #[test]
    fn test_resume_keeps_clock_while_running() {
        let ids = nodes(2);
        let (a, b) = (ids[0], ids[1]);
        let mut driver = FrameDriver::new();
        let first = driver.add_character(a, Pose::new().with("left", 0.0));
        let second = driver.add_character(b, Pose::new().with("left", 0.0));
        driver
            .character_mut(first)
            .unwrap()
            .begin_step(Pose::new().with("left", 100.0), 1000.0);
        driver.trigger(first);

        let start = Instant::now();
        driver.tick(start);
        driver.resume_clock(start + Duration::from_millis(8));
        driver.trigger(second);
        driver.tick(start + Duration::from_millis(16));
        let left = driver.character(first).unwrap().current().get("left").unwrap();
        assert!((left - 1.6).abs() < 1e-3);
    }

    #[test]
    fn test_next_frame_follows_target_fps() {
        let node = nodes(1)[0];
        let mut driver = FrameDriver::new();
        driver.set_target_fps(50);
        assert_eq!(driver.frame_interval(), Duration::from_millis(20));

        let start = Instant::now();
        assert_eq!(driver.next_frame_at(start), None);

        let id = driver.add_character(node, Pose::new().with("left", 0.0));
        driver
            .character_mut(id)
            .unwrap()
            .begin_step(Pose::new().with("left", 100.0), 1000.0);
        driver.trigger(id);
        assert_eq!(driver.next_frame_at(start), Some(start + Duration::from_millis(20)));

        driver.tick(start);
        let later = start + Duration::from_millis(5);
        assert_eq!(driver.next_frame_at(later), Some(start + Duration::from_millis(20)));
    }

    #[test]
    fn test_remove_stops_interpolation() {
        let node = nodes(1)[0];
        let mut driver = FrameDriver::new();
        let id = driver.add_character(node, Pose::new());
        driver.trigger(id);
        assert!(driver.remove(id));
        assert!(!driver.remove(id));
        assert!(!driver.character(id).unwrap().is_animating());
        assert!(driver.advance(10.0).is_empty());
    }

    #[test]
    fn test_remove_character_frees_node() {
        let node = nodes(1)[0];
        let mut driver = FrameDriver::new();
        let id = driver.add_character(node, Pose::new());
        assert!(driver.remove_character(id).is_some());
        assert_eq!(driver.find(node), None);
        assert!(!driver.trigger(id));
    }
}
