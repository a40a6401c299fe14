//! Turns a pointer ray into the thing it points at.
//!
//! Rays land on leaf colliders (a frame post, a door panel, an entry plane) that sit several
//! levels below the portal they belong to. Every candidate is walked up its ownership chain
//! until it reaches the landmark or a registered portal entity, nearest candidate first.

use avian3d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::portal::EntryPlane;
use crate::portal::Landmark;
use crate::portal::PortalId;
use crate::portal::PortalRegistry;

/// Deepest ownership chain that is walked before a candidate is given up on
pub const MAX_HIERARCHY_DEPTH: usize = 8;

const MAX_RAY_DISTANCE: f32 = 3_000.0;
const MAX_RAY_HITS: u32 = 16;

/// Which part of a portal was hit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortalRegion {
    /// Frame or door panel
    Body,
    /// The invisible plane spanning the doorway
    Entry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitResult {
    Portal { id: PortalId, region: PortalRegion },
    Landmark,
    Miss,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit<H> {
    pub handle:   H,
    pub distance: f32,
}

/// The ownership structure a hit is classified against
pub trait HitGraph {
    type Handle: Copy;

    fn parent(&self, handle: Self::Handle) -> Option<Self::Handle>;
    fn is_landmark(&self, handle: Self::Handle) -> bool;
    fn is_entry(&self, handle: Self::Handle) -> bool;
    fn portal_of(&self, handle: Self::Handle) -> Option<PortalId>;
}

/// Classifies the nearest hit that belongs to something known; anything else is a `Miss`
pub fn resolve<G: HitGraph>(graph: &G, hits: &[RayHit<G::Handle>]) -> HitResult {
    let mut ordered: Vec<&RayHit<G::Handle>> = hits.iter().collect();
    ordered.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    ordered
        .into_iter()
        .find_map(|hit| classify(graph, hit.handle))
        .unwrap_or(HitResult::Miss)
}

fn classify<G: HitGraph>(graph: &G, leaf: G::Handle) -> Option<HitResult> {
    let mut current = leaf;
    let mut region = PortalRegion::Body;

    for _ in 0..=MAX_HIERARCHY_DEPTH {
        if graph.is_landmark(current) {
            return Some(HitResult::Landmark);
        }
        if graph.is_entry(current) {
            region = PortalRegion::Entry;
        }
        if let Some(id) = graph.portal_of(current) {
            return Some(HitResult::Portal { id, region });
        }
        current = graph.parent(current)?;
    }

    None
}

/// Scene-side ray casting: avian for the intersections, `ChildOf` for the ownership chain
#[derive(SystemParam)]
pub struct HitTester<'w, 's> {
    spatial:   SpatialQuery<'w, 's>,
    parents:   Query<'w, 's, &'static ChildOf>,
    landmarks: Query<'w, 's, (), With<Landmark>>,
    entries:   Query<'w, 's, (), With<EntryPlane>>,
}

struct SceneGraph<'a, 'w, 's> {
    tester:   &'a HitTester<'w, 's>,
    registry: &'a PortalRegistry,
}

impl HitGraph for SceneGraph<'_, '_, '_> {
    type Handle = Entity;

    fn parent(&self, handle: Entity) -> Option<Entity> {
        self.tester.parents.get(handle).ok().map(ChildOf::parent)
    }

    fn is_landmark(&self, handle: Entity) -> bool { self.tester.landmarks.contains(handle) }

    fn is_entry(&self, handle: Entity) -> bool { self.tester.entries.contains(handle) }

    fn portal_of(&self, handle: Entity) -> Option<PortalId> { self.registry.find_by_handle(handle) }
}

impl HitTester<'_, '_> {
    pub fn cast(&self, ray: Ray3d, registry: &PortalRegistry) -> HitResult {
        let hits: Vec<RayHit<Entity>> = self
            .spatial
            .ray_hits(
                ray.origin,
                ray.direction,
                MAX_RAY_DISTANCE,
                MAX_RAY_HITS,
                true,
                &SpatialQueryFilter::default(),
            )
            .into_iter()
            .map(|hit| RayHit {
                handle:   hit.entity,
                distance: hit.distance,
            })
            .collect();

        resolve(
            &SceneGraph {
                tester: self,
                registry,
            },
            &hits,
        )
    }
}

/// Where a pointer ray meets the ground plane
pub fn ground_point(ray: Ray3d) -> Option<Vec3> {
    ray.intersect_plane(Vec3::ZERO, InfinitePlane3d::new(Vec3::Y))
        .map(|distance| ray.get_point(distance))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::collections::HashSet;

    use super::*;

    /// Handles are plain numbers; `parents` maps child to parent
    #[derive(Default)]
    struct FakeGraph {
        parents:  HashMap<u32, u32>,
        landmark: Option<u32>,
        entries:  HashSet<u32>,
        portals:  HashMap<u32, PortalId>,
    }

    impl HitGraph for FakeGraph {
        type Handle = u32;

        fn parent(&self, handle: u32) -> Option<u32> { self.parents.get(&handle).copied() }

        fn is_landmark(&self, handle: u32) -> bool { self.landmark == Some(handle) }

        fn is_entry(&self, handle: u32) -> bool { self.entries.contains(&handle) }

        fn portal_of(&self, handle: u32) -> Option<PortalId> { self.portals.get(&handle).copied() }
    }

    fn hit(handle: u32, distance: f32) -> RayHit<u32> { RayHit { handle, distance } }

    /// root 1 -> hinge 2 -> panel 3 -> model mesh 4, plus entry plane 5 under the root
    fn portal_graph() -> FakeGraph {
        let mut graph = FakeGraph::default();
        graph.parents.extend([(2, 1), (3, 2), (4, 3), (5, 1)]);
        graph.portals.insert(1, PortalId::from_index(7));
        graph.entries.insert(5);
        graph.landmark = Some(50);
        graph
    }

    #[test]
    fn leaf_three_levels_down_resolves_to_its_portal() {
        let graph = portal_graph();
        assert_eq!(
            resolve(&graph, &[hit(4, 3.0)]),
            HitResult::Portal {
                id:     PortalId::from_index(7),
                region: PortalRegion::Body,
            }
        );
    }

    #[test]
    fn entry_plane_hits_are_marked() {
        let graph = portal_graph();
        assert_eq!(
            resolve(&graph, &[hit(5, 3.0)]),
            HitResult::Portal {
                id:     PortalId::from_index(7),
                region: PortalRegion::Entry,
            }
        );
    }

    #[test]
    fn unknown_objects_miss() {
        let graph = portal_graph();
        assert_eq!(resolve(&graph, &[hit(99, 1.0)]), HitResult::Miss);
        assert_eq!(resolve(&graph, &[]), HitResult::Miss);
    }

    #[test]
    fn nearest_known_hit_wins_regardless_of_input_order() {
        let graph = portal_graph();
        assert_eq!(
            resolve(&graph, &[hit(4, 9.0), hit(50, 2.0), hit(99, 0.5)]),
            HitResult::Landmark
        );
    }

    #[test]
    fn walk_is_bounded() {
        let mut graph = FakeGraph::default();
        // chain 100 -> 101 -> ... -> 120, with the portal at the far end
        graph.parents.extend((100..120).map(|child| (child, child + 1)));
        graph.portals.insert(120, PortalId::from_index(0));
        assert_eq!(resolve(&graph, &[hit(100, 1.0)]), HitResult::Miss);

        // within the bound it resolves
        assert!(matches!(resolve(&graph, &[hit(115, 1.0)]), HitResult::Portal { .. }));
    }

    #[test]
    fn ground_point_projects_onto_floor() {
        let ray = Ray3d::new(Vec3::new(0.0, 10.0, 0.0), Dir3::new(Vec3::new(1.0, -1.0, 0.0)).unwrap());
        let point = ground_point(ray).unwrap();
        assert!((point - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);

        let upward = Ray3d::new(Vec3::new(0.0, 10.0, 0.0), Dir3::Y);
        assert!(ground_point(upward).is_none());
    }
}
