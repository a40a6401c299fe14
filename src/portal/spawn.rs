use std::f32::consts::FRAC_PI_2;

use avian3d::prelude::*;
use bevy::prelude::*;

use super::layout::PortalCatalog;
use super::layout::RingLayout;
use super::registry::Portal;
use super::registry::PortalId;
use super::registry::PortalRegistry;
use crate::tween::TweenCompleted;
use crate::tween::TweenTarget;

/// Local offsets and sizes of a portal's parts. Sizes are full lengths.
const HINGE_OFFSET: Vec3 = Vec3::new(-0.75, 0.0, 0.0);
const PANEL_OFFSET: Vec3 = Vec3::new(0.75, 1.78, 0.0);
/// Panel scenes have their origin at the base of the door, so they drop back to the hinge's
/// ground line from the panel slot
pub const PANEL_MODEL_OFFSET: Vec3 = Vec3::new(0.0, -1.80, 0.0);
const PANEL_SIZE: Vec3 = Vec3::new(1.5, 3.6, 0.2);
/// Sits just behind the closed panel so the panel is hit first while it is shut
const ENTRY_OFFSET: Vec3 = Vec3::new(0.0, 1.8, -0.15);
const ENTRY_SIZE: Vec3 = Vec3::new(1.5, 3.5, 0.02);
const GLOW_OFFSET: Vec3 = Vec3::new(0.0, 2.0, 0.8);
const GLOW_LUMENS_PER_UNIT: f32 = 20_000.0;
const GLOW_RANGE: f32 = 12.0;

const FRAME_PARTS: [(&str, Vec3, Vec3); 4] = [
    ("Left Post", Vec3::new(0.1, 3.6, 0.1), Vec3::new(-0.8, 1.8, 0.0)),
    ("Right Post", Vec3::new(0.1, 3.6, 0.1), Vec3::new(0.8, 1.8, 0.0)),
    ("Lintel", Vec3::new(1.7, 0.1, 0.1), Vec3::new(0.0, 3.58, 0.0)),
    ("Threshold", Vec3::new(1.7, 0.12, 0.1), Vec3::new(0.0, 0.04, 0.0)),
];

const LANDMARK_RADIUS: f32 = 1.5;
const LANDMARK_HEIGHT: f32 = 3.0;
const GROUND_SIZE: f32 = 400.0;
const RING_MARKER_WIDTH: f32 = 0.15;

/// Logical root of one portal's scene hierarchy
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct PortalRoot {
    pub id: PortalId,
}

#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct PortalHinge {
    pub id: PortalId,
}

/// Holds the door panel: a fallback monolith until the panel model resolves
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct PanelSlot {
    pub portal:    PortalId,
    pub archetype: usize,
    pub resolved:  bool,
}

#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct FallbackPanel;

/// Invisible surface spanning the doorway
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct EntryPlane {
    pub id: PortalId,
}

#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct PortalGlow {
    pub id: PortalId,
}

/// Central monument; clicking it sends the explorer home
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct Landmark;

pub fn spawn_grounds(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    layout: Res<RingLayout>,
) {
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.12, 0.14, 0.12),
            perceptual_roughness: 0.95,
            ..default()
        })),
    ));

    let marker_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.8, 0.8, 0.9, 0.35),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    for ring in 0..layout.rings {
        let radius = layout.ring_radius(ring);
        commands.spawn((
            Name::new(format!("Ring Marker {ring}")),
            Mesh3d(meshes.add(Annulus::new(radius - RING_MARKER_WIDTH, radius + RING_MARKER_WIDTH))),
            MeshMaterial3d(marker_material.clone()),
            Transform::from_xyz(0.0, 0.01, 0.0).with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
        ));
    }

    commands.spawn((
        Name::new("Landmark"),
        Landmark,
        Mesh3d(meshes.add(Cone::new(LANDMARK_RADIUS, LANDMARK_HEIGHT))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.85, 0.8, 0.7),
            metallic: 0.3,
            ..default()
        })),
        Transform::from_xyz(0.0, LANDMARK_HEIGHT / 2.0, 0.0),
        Visibility::Hidden,
    ));
}

/// The landmark stays hidden and unclickable until the scene is revealed
pub fn reveal_landmark(mut commands: Commands, mut landmark: Query<(Entity, &mut Visibility), With<Landmark>>) {
    let Ok((entity, mut visibility)) = landmark.single_mut() else {
        return;
    };
    *visibility = Visibility::Inherited;
    commands
        .entity(entity)
        .insert((RigidBody::Static, Collider::cone(LANDMARK_RADIUS, LANDMARK_HEIGHT)));
    info!("scene revealed");
}

pub fn spawn_portals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut registry: ResMut<PortalRegistry>,
    catalog: Res<PortalCatalog>,
) {
    let frame_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.25, 0.22, 0.2),
        metallic: 0.6,
        perceptual_roughness: 0.4,
        ..default()
    });
    let panel_mesh = meshes.add(Cuboid::from_size(PANEL_SIZE));
    let panel_materials: Vec<Handle<StandardMaterial>> = catalog
        .archetypes
        .iter()
        .map(|archetype| {
            materials.add(StandardMaterial {
                base_color: archetype.glow_color,
                perceptual_roughness: 0.7,
                ..default()
            })
        })
        .collect();
    let frame_meshes: Vec<Handle<Mesh>> = FRAME_PARTS
        .iter()
        .map(|(_, size, _)| meshes.add(Cuboid::from_size(*size)))
        .collect();

    let portals: Vec<Portal> = registry.all().cloned().collect();

    for portal in portals {
        let Portal {
            id,
            archetype,
            live_position: position,
            live_rotation_y: rotation_y,
            ..
        } = portal;
        let glow = portal.glow();
        let (glow_color, key) = catalog
            .get(archetype)
            .map_or((Color::WHITE, "unknown"), |archetype| {
                (archetype.glow_color, archetype.key.as_str())
            });

        let root = commands
            .spawn((
                Name::new(format!(
                    "Portal {} [{key}] ring {} slot {}",
                    portal.label, portal.ring, portal.slot
                )),
                PortalRoot { id },
                RigidBody::Static,
                Transform::from_translation(position).with_rotation(Quat::from_rotation_y(rotation_y)),
                Visibility::default(),
            ))
            .id();
        registry.register_root(id, root);

        for ((name, size, offset), mesh) in FRAME_PARTS.iter().zip(&frame_meshes) {
            let part = commands
                .spawn((
                    Name::new(*name),
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(frame_material.clone()),
                    Transform::from_translation(*offset),
                    Collider::cuboid(size.x, size.y, size.z),
                    ChildOf(root),
                ))
                .id();
            registry.register_part(id, part);
        }

        let hinge = commands
            .spawn((
                Name::new("Hinge"),
                PortalHinge { id },
                Transform::from_translation(HINGE_OFFSET),
                Visibility::default(),
                ChildOf(root),
            ))
            .id();

        let panel = commands
            .spawn((
                Name::new("Panel"),
                PanelSlot {
                    portal: id,
                    archetype,
                    resolved: false,
                },
                Transform::from_translation(PANEL_OFFSET),
                Visibility::default(),
                Collider::cuboid(PANEL_SIZE.x, PANEL_SIZE.y, PANEL_SIZE.z),
                ChildOf(hinge),
            ))
            .id();
        registry.register_part(id, panel);

        let mut fallback = commands.spawn((
            Name::new("Fallback Panel"),
            FallbackPanel,
            Mesh3d(panel_mesh.clone()),
            ChildOf(panel),
        ));
        if let Some(material) = panel_materials.get(archetype) {
            fallback.insert(MeshMaterial3d(material.clone()));
        }

        let entry = commands
            .spawn((
                Name::new("Entry Plane"),
                EntryPlane { id },
                Transform::from_translation(ENTRY_OFFSET),
                Collider::cuboid(ENTRY_SIZE.x, ENTRY_SIZE.y, ENTRY_SIZE.z),
                ChildOf(root),
            ))
            .id();
        registry.register_part(id, entry);

        commands.spawn((
            Name::new("Glow"),
            PortalGlow { id },
            PointLight {
                color: glow_color,
                intensity: glow * GLOW_LUMENS_PER_UNIT,
                range: GLOW_RANGE,
                ..default()
            },
            Transform::from_translation(GLOW_OFFSET),
            ChildOf(root),
        ));
    }

    info!("spawned {} portals", registry.len());
}

/// Hinge completions from the previous frame settle portal state before anything steps
pub fn settle_portals(mut completions: MessageReader<TweenCompleted>, mut registry: ResMut<PortalRegistry>) {
    for completed in completions.read() {
        let TweenTarget::Hinge(id) = completed.target else {
            continue;
        };
        if let Some(state) = registry.settle(id, completed.handle) {
            debug!("portal #{} settled {state:?}", id.index());
        }
    }
}

pub fn step_portals(
    time: Res<Time>,
    mut registry: ResMut<PortalRegistry>,
    mut completions: MessageWriter<TweenCompleted>,
) {
    completions.write_batch(registry.step(time.delta_secs()));
}

pub fn sync_portal_transforms(
    registry: Res<PortalRegistry>,
    mut roots: Query<(&PortalRoot, &mut Transform), Without<PortalHinge>>,
    mut hinges: Query<(&PortalHinge, &mut Transform), Without<PortalRoot>>,
    mut glows: Query<(&PortalGlow, &mut PointLight)>,
) {
    if !registry.is_changed() {
        return;
    }

    for (root, mut transform) in &mut roots {
        if let Some(portal) = registry.get(root.id) {
            transform.translation = portal.live_position;
            transform.rotation = Quat::from_rotation_y(portal.live_rotation_y);
        }
    }

    for (hinge, mut transform) in &mut hinges {
        if let Some(portal) = registry.get(hinge.id) {
            transform.rotation = Quat::from_rotation_y(portal.hinge_rotation_y());
        }
    }

    for (glow, mut light) in &mut glows {
        if let Some(portal) = registry.get(glow.id) {
            light.intensity = portal.glow() * GLOW_LUMENS_PER_UNIT;
        }
    }
}
