//! Keyboard commands, expressed as bevy_enhanced_input actions on a single `Explorer` context.
//!
//! Each command is handled by an observer in the module that owns the behaviour; this module
//! only declares the actions, binds them and tracks which inspector windows are open.

use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

pub struct ExplorerInputPlugin;

impl Plugin for ExplorerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EnhancedInputPlugin)
            .add_input_context::<Explorer>()
            .init_resource::<InspectorToggles>()
            .add_systems(Startup, spawn_explorer)
            .add_observer(toggle_inspector::<ClockInspector>)
            .add_observer(toggle_inspector::<GradingInspector>)
            .add_observer(toggle_inspector::<CameraInspector>)
            .add_observer(toggle_inspector::<PortalInspector>);
    }
}

/// Input context that owns every keyboard command
#[derive(Component)]
pub struct Explorer;

#[derive(InputAction)]
#[action_output(bool)]
pub struct ReturnHome;

#[derive(InputAction)]
#[action_output(bool)]
pub struct RandomDiscovery;

#[derive(InputAction)]
#[action_output(bool)]
pub struct HighNoon;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Midnight;

/// Held to speed the day up
#[derive(InputAction)]
#[action_output(bool)]
pub struct Accelerate;

#[derive(InputAction)]
#[action_output(bool)]
pub struct ClockInspector;

#[derive(InputAction)]
#[action_output(bool)]
pub struct GradingInspector;

#[derive(InputAction)]
#[action_output(bool)]
pub struct CameraInspector;

#[derive(InputAction)]
#[action_output(bool)]
pub struct PortalInspector;

#[derive(InputAction)]
#[action_output(bool)]
pub struct ColliderGizmos;

fn spawn_explorer(mut commands: Commands) {
    commands.spawn((
        Name::new("Explorer"),
        Explorer,
        actions!(Explorer[
            (Action::<ReturnHome>::new(), bindings![KeyCode::KeyH]),
            (Action::<RandomDiscovery>::new(), bindings![KeyCode::KeyR]),
            (Action::<HighNoon>::new(), bindings![KeyCode::KeyN]),
            (Action::<Midnight>::new(), bindings![KeyCode::KeyM]),
            (Action::<Accelerate>::new(), bindings![KeyCode::KeyF]),
            (Action::<ClockInspector>::new(), bindings![KeyCode::F1]),
            (Action::<GradingInspector>::new(), bindings![KeyCode::F2]),
            (Action::<CameraInspector>::new(), bindings![KeyCode::F3]),
            (Action::<PortalInspector>::new(), bindings![KeyCode::F4]),
            (Action::<ColliderGizmos>::new(), bindings![KeyCode::F5]),
        ]),
    ));
}

/// Inspector windows that can be toggled from the keyboard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InspectorPanel {
    Clock,
    Grading,
    Camera,
    Portals,
}

/// Every inspector window starts closed
#[derive(Resource, Default, Debug)]
pub struct InspectorToggles {
    clock:   bool,
    grading: bool,
    camera:  bool,
    portals: bool,
}

impl InspectorToggles {
    pub const fn is_open(&self, panel: InspectorPanel) -> bool {
        match panel {
            InspectorPanel::Clock => self.clock,
            InspectorPanel::Grading => self.grading,
            InspectorPanel::Camera => self.camera,
            InspectorPanel::Portals => self.portals,
        }
    }

    pub const fn toggle(&mut self, panel: InspectorPanel) -> bool {
        let open = match panel {
            InspectorPanel::Clock => &mut self.clock,
            InspectorPanel::Grading => &mut self.grading,
            InspectorPanel::Camera => &mut self.camera,
            InspectorPanel::Portals => &mut self.portals,
        };
        *open = !*open;
        *open
    }
}

/// Ties an action to the inspector panel it opens and closes
pub trait InspectorAction: InputAction {
    const PANEL: InspectorPanel;
}

impl InspectorAction for ClockInspector {
    const PANEL: InspectorPanel = InspectorPanel::Clock;
}

impl InspectorAction for GradingInspector {
    const PANEL: InspectorPanel = InspectorPanel::Grading;
}

impl InspectorAction for CameraInspector {
    const PANEL: InspectorPanel = InspectorPanel::Camera;
}

impl InspectorAction for PortalInspector {
    const PANEL: InspectorPanel = InspectorPanel::Portals;
}

fn toggle_inspector<A: InspectorAction>(_start: On<Start<A>>, mut toggles: ResMut<InspectorToggles>) {
    let open = toggles.toggle(A::PANEL);
    debug!("{:?} inspector open: {open}", A::PANEL);
}

/// Run condition for a `ResourceInspectorPlugin`
pub fn inspector_open(panel: InspectorPanel) -> impl FnMut(Res<InspectorToggles>) -> bool + Clone {
    move |toggles: Res<InspectorToggles>| toggles.is_open(panel)
}
