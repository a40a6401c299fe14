use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use crate::explorer_input::ColliderGizmos;

/// Collision world for ray picking; every collider is static, so nothing is simulated
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PhysicsPlugins::default())
            .add_plugins(PhysicsDebugPlugin)
            .insert_resource(Gravity::ZERO)
            .add_systems(Startup, init_collider_gizmos)
            .add_observer(toggle_collider_gizmos);
    }
}

fn init_collider_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<PhysicsGizmos>();
    config.enabled = false;
}

fn toggle_collider_gizmos(_: On<Start<ColliderGizmos>>, mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<PhysicsGizmos>();
    config.enabled = !config.enabled;
    debug!("collider gizmos: {}", config.enabled);
}
