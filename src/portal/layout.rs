use std::f32::consts::PI;
use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::traits::UsizeExt;

/// One kind of portal: its label, where entering it leads and how it looks
#[derive(Reflect, Clone, Debug, PartialEq)]
pub struct PortalArchetype {
    pub key:         String,
    pub label:       String,
    /// Opaque navigation target handed to the navigation sink
    pub destination: String,
    pub glow_color:  Color,
    pub model_path:  String,
}

impl PortalArchetype {
    fn new(key: &str, label: &str, destination: &str, glow_color: Srgba, model: &str) -> Self {
        Self {
            key:         key.to_string(),
            label:       label.to_string(),
            destination: destination.to_string(),
            glow_color:  Color::from(glow_color),
            model_path:  format!("models/{model}"),
        }
    }
}

#[derive(Resource, Reflect, Clone, Debug, PartialEq)]
#[reflect(Resource)]
pub struct PortalCatalog {
    pub archetypes: Vec<PortalArchetype>,
}

impl Default for PortalCatalog {
    fn default() -> Self {
        Self {
            archetypes: vec![
                PortalArchetype::new(
                    "portfolio",
                    "PORTFOLIO",
                    "https://portfolio.yoursite.com",
                    Srgba::rgb_u8(255, 170, 136),
                    "door_rustic.glb",
                ),
                PortalArchetype::new(
                    "blog",
                    "BLOG",
                    "/blog",
                    Srgba::rgb_u8(136, 204, 255),
                    "door_scifi.glb",
                ),
                PortalArchetype::new(
                    "projects",
                    "PROJECTS",
                    "/projects",
                    Srgba::rgb_u8(255, 238, 170),
                    "gate_iron.glb",
                ),
                PortalArchetype::new(
                    "contact",
                    "CONTACT",
                    "mailto:you@example.com",
                    Srgba::rgb_u8(204, 136, 255),
                    "arch_stone.glb",
                ),
                PortalArchetype::new(
                    "about",
                    "ABOUT",
                    "/about",
                    Srgba::rgb_u8(255, 136, 170),
                    "door_shoji.glb",
                ),
            ],
        }
    }
}

impl PortalCatalog {
    pub fn get(&self, index: usize) -> Option<&PortalArchetype> { self.archetypes.get(index) }

    pub fn len(&self) -> usize { self.archetypes.len() }

    pub fn is_empty(&self) -> bool { self.archetypes.is_empty() }
}

/// Concentric rings the archetypes are repeated across. Read once at startup.
#[derive(Resource, Reflect, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource)]
pub struct RingLayout {
    pub rings:       usize,
    pub base_radius: f32,
    pub radius_step: f32,
}

impl Default for RingLayout {
    fn default() -> Self {
        Self {
            rings:       5,
            base_radius: 15.0,
            radius_step: 8.0,
        }
    }
}

impl RingLayout {
    pub fn ring_radius(&self, ring: usize) -> f32 {
        ring.to_f32().mul_add(self.radius_step, self.base_radius)
    }
}

/// Where a single portal stands before anyone drags it around
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub archetype:  usize,
    pub ring:       usize,
    pub slot:       usize,
    pub position:   Vec3,
    /// Yaw that turns the doorway away from the center
    pub rotation_y: f32,
}

/// Lays `archetype_count` portals around every ring. Odd rings are shifted by half a slot so
/// neighbouring rings never line up radially.
///
/// Placements are ordered ring by ring, then by slot, which is also the order portal ids are
/// handed out in.
pub fn build_layout(archetype_count: usize, layout: &RingLayout) -> Vec<Placement> {
    if archetype_count == 0 {
        return Vec::new();
    }

    let count = archetype_count.to_f32();
    let spacing = TAU / count;

    (0..layout.rings)
        .flat_map(|ring| {
            let radius = layout.ring_radius(ring);
            let offset = if ring % 2 == 1 { PI / count } else { 0.0 };
            (0..archetype_count).map(move |slot| {
                let angle = slot.to_f32().mul_add(spacing, offset);
                Placement {
                    archetype: slot,
                    ring,
                    slot,
                    position: Vec3::new(angle.sin() * radius, 0.0, angle.cos() * radius),
                    rotation_y: angle,
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bearing(placement: &Placement) -> f32 { placement.position.x.atan2(placement.position.z) }

    #[test]
    fn layout_is_deterministic() {
        let layout = RingLayout::default();
        assert_eq!(build_layout(5, &layout), build_layout(5, &layout));
    }

    #[test]
    fn default_layout_places_twenty_five_portals() {
        let placements = build_layout(PortalCatalog::default().len(), &RingLayout::default());
        assert_eq!(placements.len(), 25);
        assert!(placements.iter().all(|placement| placement.position.y == 0.0));
    }

    #[test]
    fn portals_sit_on_their_ring_radius() {
        let layout = RingLayout::default();
        for placement in build_layout(5, &layout) {
            let radius = Vec2::new(placement.position.x, placement.position.z).length();
            assert!((radius - layout.ring_radius(placement.ring)).abs() < 1e-3);
        }
        assert!((layout.ring_radius(4) - 47.0).abs() < f32::EPSILON);
    }

    #[test]
    fn odd_rings_are_offset_by_half_a_slot() {
        let placements = build_layout(5, &RingLayout::default());
        let half_slot = PI / 5.0;

        let ring_zero = &placements[0..5];
        let ring_one = &placements[5..10];
        let ring_two = &placements[10..15];

        for (even, odd) in ring_zero.iter().zip(ring_one) {
            let delta = (odd.rotation_y - even.rotation_y).rem_euclid(TAU);
            assert!((delta - half_slot).abs() < 1e-5);
        }
        for (first, second) in ring_zero.iter().zip(ring_two) {
            assert!((first.rotation_y - second.rotation_y).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn rotation_faces_away_from_center() {
        for placement in build_layout(5, &RingLayout::default()) {
            let delta = (bearing(&placement) - placement.rotation_y).rem_euclid(TAU);
            assert!(delta < 1e-4 || (TAU - delta) < 1e-4);
        }
    }

    #[test]
    fn no_archetypes_means_no_portals() {
        assert!(build_layout(0, &RingLayout::default()).is_empty());
    }
}
