//! Portals: layout on concentric rings, the registry that owns their open/close state and the
//! scene hierarchy that displays them.

mod layout;
mod registry;
mod spawn;

use bevy::prelude::*;
use bevy_inspector_egui::quick::ResourceInspectorPlugin;
pub use layout::PortalCatalog;
pub use layout::RingLayout;
pub use layout::build_layout;
pub use registry::Portal;
pub use registry::PortalConfig;
pub use registry::PortalId;
pub use registry::PortalRegistry;
pub use registry::PortalState;
pub use registry::ToggleOutcome;
pub use spawn::EntryPlane;
pub use spawn::FallbackPanel;
pub use spawn::Landmark;
pub use spawn::PANEL_MODEL_OFFSET;
pub use spawn::PanelSlot;

use crate::explorer_input::InspectorPanel;
use crate::explorer_input::inspector_open;
use crate::schedule::FrameSet;
use crate::state::SceneState;

pub struct PortalPlugin;

impl Plugin for PortalPlugin {
    fn build(&self, app: &mut App) {
        let catalog = PortalCatalog::default();
        let layout = RingLayout::default();
        let config = PortalConfig::default();
        let registry = PortalRegistry::from_layout(&catalog, &build_layout(catalog.len(), &layout), &config);

        app.insert_resource(registry)
            .insert_resource(catalog)
            .insert_resource(layout)
            .insert_resource(config)
            .add_plugins(
                ResourceInspectorPlugin::<PortalConfig>::default()
                    .run_if(inspector_open(InspectorPanel::Portals)),
            )
            .add_systems(Startup, (spawn::spawn_grounds, spawn::spawn_portals))
            .add_systems(OnEnter(SceneState::Revealed), spawn::reveal_landmark)
            .add_systems(
                Update,
                (
                    spawn::settle_portals,
                    spawn::step_portals,
                    spawn::sync_portal_transforms,
                )
                    .chain()
                    .in_set(FrameSet::EntityAnimation),
            );
    }
}
