//! Animatable values
//!
//! A [`Pose`] is an ordered set of named style properties. Poses interpolate
//! property by property through the [`Interpolate`] trait.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// f32 Implementation
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

// ============================================================================
// Pose
// ============================================================================

/// Style properties of an element, in insertion order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pose(IndexMap<String, f32>);

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Pose::set`]
    pub fn with(mut self, property: impl Into<String>, value: f32) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: impl Into<String>, value: f32) {
        self.0.insert(property.into(), value);
    }

    pub fn get(&self, property: &str) -> Option<f32> {
        self.0.get(property).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// This pose with every property of `other` written over it
    pub fn merged(&self, other: &Pose) -> Pose {
        let mut out = self.clone();
        for (name, value) in other.iter() {
            out.set(name, value);
        }
        out
    }
}

impl<S: Into<String>> FromIterator<(S, f32)> for Pose {
    fn from_iter<I: IntoIterator<Item = (S, f32)>>(iter: I) -> Self {
        Pose(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Properties present on both sides are interpolated. A property only in
/// `other` has nothing to start from and takes its final value; a property
/// only in `self` is left alone.
impl Interpolate for Pose {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        let mut out = self.clone();
        for (name, to) in other.iter() {
            let value = match self.get(name) {
                Some(from) => from.lerp(&to, t),
                None => to,
            };
            out.set(name, value);
        }
        out
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, a)| other.get(name).is_some_and(|b| a.approx_eq(&b, epsilon)))
    }
}
