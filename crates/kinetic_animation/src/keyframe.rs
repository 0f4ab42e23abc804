//! Keyframe sequencing
//!
//! A [`KeyframeSpec`] lists poses at percentage markers of a total duration.
//! [`KeyframeSequencer`] plays one spec per character as a chain of steps:
//! step `i` moves from the pose the character currently shows to keyframe
//! `i`, taking the share of the total duration between marker `i - 1` and
//! marker `i`. Step 0 always takes zero time.
//!
//! ```text
//! "0"  ──0ms──▶ "50" ──500ms──▶ "100" ──500ms──▶ on_complete
//! ```
//!
//! The sequencer owns the step index. The driver only plays single steps and
//! reports back through [`KeyframeSequencer::step_complete`].

use std::time::Instant;

use indexmap::IndexMap;
use kinetic_core::NodeId;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::driver::{AnimationDriver, CharacterId, FrameDriver};
use crate::error::{AnimationError, Result};
use crate::pose::Pose;

// ============================================================================
// Spec
// ============================================================================

/// Poses at percentage markers, plus the total duration
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawKeyframeSpec")]
pub struct KeyframeSpec {
    /// Sorted ascending by percentage
    frames: Vec<(f32, Pose)>,
    duration_ms: f32,
}

#[derive(Deserialize)]
struct RawKeyframeSpec {
    #[serde(rename = "keyFrame", alias = "keyframes", default)]
    key_frame: IndexMap<String, Pose>,
    #[serde(default)]
    duration: f32,
}

impl TryFrom<RawKeyframeSpec> for KeyframeSpec {
    type Error = AnimationError;

    fn try_from(raw: RawKeyframeSpec) -> Result<Self> {
        KeyframeSpec::from_map(raw.key_frame, raw.duration)
    }
}

impl KeyframeSpec {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            frames: Vec::new(),
            duration_ms,
        }
    }

    /// Add (or replace) the pose at `percent`
    pub fn at(mut self, percent: f32, pose: Pose) -> Self {
        match self
            .frames
            .binary_search_by(|(existing, _)| existing.total_cmp(&percent))
        {
            Ok(index) => self.frames[index].1 = pose,
            Err(index) => self.frames.insert(index, (percent, pose)),
        }
        self
    }

    /// Build from percentage-string keys such as `"0"`, `"50"` or `"100%"`
    pub fn from_map<K, I>(frames: I, duration_ms: f32) -> Result<Self>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Pose)>,
    {
        let mut spec = Self::new(duration_ms);
        for (key, pose) in frames {
            spec = spec.at(parse_percentage(key.as_ref())?, pose);
        }
        spec.validate()?;
        Ok(spec)
    }

    /// Decode `{"keyFrame": {"0": {...}, "100": {...}}, "duration": 1000}`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject markers outside 0..=100 and negative durations
    pub fn validate(&self) -> Result<()> {
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(AnimationError::NegativeDuration(self.duration_ms));
        }
        if let Some((percent, _)) = self
            .frames
            .iter()
            .find(|(percent, _)| !(0.0..=100.0).contains(percent))
        {
            return Err(AnimationError::InvalidKeyframe(percent.to_string()));
        }
        Ok(())
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn key_times(&self) -> Vec<f32> {
        self.frames.iter().map(|(percent, _)| *percent).collect()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn into_parts(self) -> (Vec<f32>, Vec<Pose>, f32) {
        let (times, poses) = self.frames.into_iter().unzip();
        (times, poses, self.duration_ms)
    }
}

fn parse_percentage(key: &str) -> Result<f32> {
    let trimmed = key.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    match number.parse::<f32>() {
        Ok(percent) if (0.0..=100.0).contains(&percent) => Ok(percent),
        _ => Err(AnimationError::InvalidKeyframe(key.to_string())),
    }
}

/// Duration of step `index`: zero for the first step, otherwise the share of
/// `total_ms` between the previous marker and this one
pub fn step_duration(key_times: &[f32], index: usize, total_ms: f32) -> f32 {
    if index == 0 || index >= key_times.len() {
        return 0.0;
    }
    total_ms * (key_times[index] - key_times[index - 1]) / 100.0
}

// ============================================================================
// Sequencer
// ============================================================================

/// Passed to a completion callback
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceContext {
    pub character: CharacterId,
    pub node: NodeId,
    /// Pose the character ended on
    pub pose: Pose,
    /// True when the sequence ended by being reversed
    pub reversed: bool,
}

pub type CompletionCallback = Box<dyn FnOnce(&SequenceContext)>;

struct Sequence {
    key_time: Vec<f32>,
    key_props: Vec<Pose>,
    current_index: usize,
    total_duration: f32,
    initial_time: Instant,
    start_pose: Pose,
    reversed: bool,
    on_complete: Option<CompletionCallback>,
}

/// Plays keyframe specs over an [`AnimationDriver`]
#[derive(Default)]
pub struct KeyframeSequencer {
    sequences: FxHashMap<CharacterId, Sequence>,
}

impl std::fmt::Debug for KeyframeSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyframeSequencer")
            .field("sequences", &self.sequences.len())
            .finish()
    }
}

impl KeyframeSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playing `spec` on a character
    ///
    /// The first step runs before this returns; with zero or one keyframe the
    /// whole sequence (and `on_complete`) finishes here too. Starting a new
    /// sequence on a character abandons the previous one without calling its
    /// callback.
    pub fn animate<D: AnimationDriver + ?Sized>(
        &mut self,
        driver: &mut D,
        id: CharacterId,
        spec: KeyframeSpec,
        now: Instant,
        on_complete: Option<CompletionCallback>,
    ) -> Result<()> {
        spec.validate()?;
        let start_pose = driver
            .character(id)
            .ok_or(AnimationError::UnknownCharacter(id))?
            .current()
            .clone();

        if self.sequences.remove(&id).is_some() {
            tracing::debug!("KeyframeSequencer: replacing running sequence on {:?}", id);
            driver.remove(id);
        }

        let (key_time, key_props, total_duration) = spec.into_parts();
        tracing::debug!(
            "KeyframeSequencer: animate {:?} with {} keyframe(s) over {}ms",
            id,
            key_time.len(),
            total_duration
        );
        self.sequences.insert(
            id,
            Sequence {
                key_time,
                key_props,
                current_index: 0,
                total_duration,
                initial_time: now,
                start_pose,
                reversed: false,
                on_complete,
            },
        );
        driver.resume_clock(now);
        self.run_step(driver, id)?;
        Ok(())
    }

    /// Send the character on `node` back to the pose it started from
    ///
    /// The return trip takes as long as the sequence has been running. The
    /// remaining keyframes are dropped and the pending completion callback
    /// fires when the trip ends. Returns false (doing nothing) when no
    /// sequence is animating on `node`.
    pub fn reverse<D: AnimationDriver + ?Sized>(
        &mut self,
        driver: &mut D,
        node: NodeId,
        now: Instant,
    ) -> bool {
        let Some(id) = driver.exists(node) else {
            return false;
        };
        let Some(sequence) = self.sequences.get_mut(&id) else {
            return false;
        };

        let elapsed_ms = now.saturating_duration_since(sequence.initial_time).as_secs_f32() * 1000.0;
        driver.remove(id);
        driver.resume_clock(now);
        let Some(character) = driver.character_mut(id) else {
            return false;
        };
        character.begin_step(sequence.start_pose.clone(), elapsed_ms);

        sequence.total_duration = elapsed_ms;
        sequence.key_time.clear();
        sequence.key_props.clear();
        sequence.current_index = 0;
        sequence.reversed = true;

        tracing::debug!("KeyframeSequencer: reversing {:?} over {}ms", id, elapsed_ms);
        driver.trigger(id)
    }

    /// A step the driver was playing for `id` finished
    ///
    /// Runs the next step, or completes the sequence. Returns true if the
    /// sequence completed.
    pub fn step_complete<D: AnimationDriver + ?Sized>(
        &mut self,
        driver: &mut D,
        id: CharacterId,
    ) -> Result<bool> {
        let Some(sequence) = self.sequences.get_mut(&id) else {
            return Ok(false);
        };
        sequence.current_index += 1;
        self.run_step(driver, id)
    }

    /// Tick the driver and advance every sequence whose step finished
    ///
    /// Returns the characters whose sequence completed this frame.
    pub fn tick(&mut self, driver: &mut FrameDriver, now: Instant) -> Result<Vec<CharacterId>> {
        let mut completed = Vec::new();
        for id in driver.tick(now) {
            if self.step_complete(driver, id)? {
                completed.push(id);
            }
        }
        Ok(completed)
    }

    pub fn is_sequencing(&self, id: CharacterId) -> bool {
        self.sequences.contains_key(&id)
    }

    pub fn current_index(&self, id: CharacterId) -> Option<usize> {
        self.sequences.get(&id).map(|sequence| sequence.current_index)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Start the step at the current index, snapping through zero-length
    /// steps. Completes the sequence when no steps are left; returns true if
    /// it did.
    fn run_step<D: AnimationDriver + ?Sized>(
        &mut self,
        driver: &mut D,
        id: CharacterId,
    ) -> Result<bool> {
        let Some(sequence) = self.sequences.get_mut(&id) else {
            return Ok(false);
        };
        let character = driver
            .character_mut(id)
            .ok_or(AnimationError::UnknownCharacter(id))?;

        // step 0 always runs, even without keyframes
        let steps = sequence.key_time.len().max(1);
        while sequence.current_index < steps {
            let index = sequence.current_index;
            let duration = step_duration(&sequence.key_time, index, sequence.total_duration);
            // no keyframe at this index: the step leaves the pose as it is
            let target = sequence
                .key_props
                .get(index)
                .cloned()
                .unwrap_or_else(|| character.current().clone());
            character.begin_step(target, duration);
            tracing::trace!("KeyframeSequencer: {:?} step {} ({}ms)", id, index, duration);

            if duration > 0.0 {
                driver.trigger(id);
                return Ok(false);
            }
            character.snap_to_target();
            sequence.current_index += 1;
        }
        self.finish(driver, id)
    }

    fn finish<D: AnimationDriver + ?Sized>(
        &mut self,
        driver: &mut D,
        id: CharacterId,
    ) -> Result<bool> {
        let Some(sequence) = self.sequences.remove(&id) else {
            return Ok(false);
        };
        let character = driver
            .character(id)
            .ok_or(AnimationError::UnknownCharacter(id))?;
        let context = SequenceContext {
            character: id,
            node: character.node(),
            pose: character.current().clone(),
            reversed: sequence.reversed,
        };
        tracing::debug!("KeyframeSequencer: {:?} complete", id);
        if let Some(on_complete) = sequence.on_complete {
            on_complete(&context);
        }
        Ok(true)
    }
}
