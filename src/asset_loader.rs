use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::portal::FallbackPanel;
use crate::portal::PANEL_MODEL_OFFSET;
use crate::portal::PanelSlot;
use crate::portal::PortalCatalog;
use crate::state::RevealTimeout;
use crate::state::SceneState;

pub struct AssetLoaderPlugin;

impl Plugin for AssetLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PortalAssets>()
            // the catalog is inserted by PortalPlugin::build, so it already exists here
            .add_systems(PreStartup, load_assets)
            .add_systems(
                Update,
                resolve_panels.run_if(in_state(SceneState::Loading)),
            );
    }
}

/// One panel scene per archetype, indexed like `PortalCatalog::archetypes`
#[derive(Resource, Clone, Debug, Default)]
pub struct PortalAssets {
    pub panels: Vec<Handle<Scene>>,
}

impl PortalAssets {
    pub fn panel(&self, archetype: usize) -> Option<&Handle<Scene>> { self.panels.get(archetype) }
}

pub fn load_assets(
    mut portal_assets: ResMut<PortalAssets>,
    catalog: Res<PortalCatalog>,
    asset_server: Res<AssetServer>,
) {
    *portal_assets = PortalAssets {
        panels: catalog
            .archetypes
            .iter()
            .map(|archetype| {
                asset_server.load(GltfAssetLabel::Scene(0).from_asset(archetype.model_path.clone()))
            })
            .collect(),
    };
}

/// Load progress reduced to what the panel swap cares about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelLoad {
    Pending,
    Loaded,
    Failed,
}

impl From<Option<LoadState>> for PanelLoad {
    fn from(state: Option<LoadState>) -> Self {
        match state {
            Some(LoadState::Loaded) => Self::Loaded,
            Some(LoadState::Failed(_)) => Self::Failed,
            Some(LoadState::NotLoaded | LoadState::Loading) | None => Self::Pending,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelResolution {
    /// Keep showing the fallback and ask again next frame
    Wait,
    UseModel,
    /// Keep the fallback for good
    UseFallback,
}

pub const fn resolve_panel(load: PanelLoad, timed_out: bool) -> PanelResolution {
    match (load, timed_out) {
        (PanelLoad::Loaded, _) => PanelResolution::UseModel,
        (PanelLoad::Failed, _) | (PanelLoad::Pending, true) => PanelResolution::UseFallback,
        (PanelLoad::Pending, false) => PanelResolution::Wait,
    }
}

/// Swaps each fallback monolith for its loaded model. Once no panel is waiting the scene is
/// revealed.
fn resolve_panels(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    portal_assets: Res<PortalAssets>,
    catalog: Res<PortalCatalog>,
    timeout: Res<RevealTimeout>,
    mut slots: Query<(Entity, &mut PanelSlot, &Children)>,
    fallbacks: Query<(), With<FallbackPanel>>,
    mut next_state: ResMut<NextState<SceneState>>,
) {
    let mut waiting = 0_usize;

    for (slot_entity, mut slot, children) in &mut slots {
        if slot.resolved {
            continue;
        }
        let Some(handle) = portal_assets.panel(slot.archetype) else {
            slot.resolved = true;
            continue;
        };

        match resolve_panel(asset_server.get_load_state(handle.id()).into(), timeout.expired()) {
            PanelResolution::Wait => waiting += 1,
            PanelResolution::UseModel => {
                for child in children.iter().filter(|child| fallbacks.contains(*child)) {
                    commands.entity(child).despawn();
                }
                commands.entity(slot_entity).with_child(panel_model(handle.clone()));
                slot.resolved = true;
            },
            PanelResolution::UseFallback => {
                let path = catalog
                    .get(slot.archetype)
                    .map_or("<unknown>", |archetype| archetype.model_path.as_str());
                warn!(
                    "panel model {path} for portal #{} unavailable, keeping the fallback panel",
                    slot.portal.index()
                );
                slot.resolved = true;
            },
        }
    }

    if waiting == 0 && !slots.is_empty() {
        info!("all panels resolved");
        next_state.set(SceneState::Revealed);
    }
}

fn panel_model(scene: Handle<Scene>) -> impl Bundle {
    (
        Name::new("Panel Model"),
        SceneRoot(scene),
        Transform::from_translation(PANEL_MODEL_OFFSET),
    )
}
