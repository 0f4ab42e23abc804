//! Resolving the element under a touch
//!
//! The strategy is picked once, when the session is created:
//!
//! 1. Old Chrome for Android / Silk: native resolution, but fed screen
//!    coordinates (those builds expect them on high-density displays).
//! 2. No native resolution available: walk the tree front-to-back testing
//!    bounding boxes.
//! 3. Otherwise: native resolution with client coordinates.

use kinetic_core::{NodeId, NodeTree, Point};
use kinetic_platform::PlatformProfile;

/// How to find the element under a point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetStrategy {
    /// Native point resolution with client coordinates
    ElementFromPoint,
    /// Native point resolution with screen coordinates
    ScreenCoordinates,
    /// Recursive bounding-box traversal
    Traverse,
}

impl TargetStrategy {
    pub fn select(profile: &PlatformProfile) -> Self {
        if profile.wants_screen_coordinates() {
            TargetStrategy::ScreenCoordinates
        } else if !profile.native_point_resolution {
            TargetStrategy::Traverse
        } else {
            TargetStrategy::ElementFromPoint
        }
    }
}

/// Resolves touch points to target elements
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetResolver {
    strategy: TargetStrategy,
}

impl TargetResolver {
    pub fn new(strategy: TargetStrategy) -> Self {
        Self { strategy }
    }

    pub fn for_platform(profile: &PlatformProfile) -> Self {
        let strategy = TargetStrategy::select(profile);
        tracing::debug!(
            "TargetResolver: using {:?} on {}",
            strategy,
            profile.name()
        );
        Self::new(strategy)
    }

    pub fn strategy(&self) -> TargetStrategy {
        self.strategy
    }

    /// Topmost element at the pointer, skipping `excluded`
    pub fn resolve<T: NodeTree + ?Sized>(
        &self,
        tree: &T,
        client: Point,
        screen: Point,
        excluded: Option<NodeId>,
    ) -> Option<NodeId> {
        match self.strategy {
            TargetStrategy::ElementFromPoint => tree.element_from_point(client, excluded),
            TargetStrategy::ScreenCoordinates => tree.element_from_point(screen, excluded),
            TargetStrategy::Traverse => find_target_traverse(tree, None, client, excluded),
        }
    }
}

/// Deepest element containing `point`, searching from `node` (or the root)
///
/// Children are tried last-to-first so the frontmost wins. Only finds
/// elements inside their parent's box: a child positioned outside its
/// parent's bounds is never reached.
pub fn find_target_traverse<T: NodeTree + ?Sized>(
    tree: &T,
    node: Option<NodeId>,
    point: Point,
    excluded: Option<NodeId>,
) -> Option<NodeId> {
    let node = node.or_else(|| tree.root())?;
    if Some(node) == excluded {
        return None;
    }
    let bounds = tree.bounding_box(node)?;
    if !bounds.contains_from_origin(point) {
        return None;
    }

    for child in tree.children(node).iter().rev() {
        if let Some(target) = find_target_traverse(tree, Some(*child), point, excluded) {
            return Some(target);
        }
    }

    Some(node)
}
