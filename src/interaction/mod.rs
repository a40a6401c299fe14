//! Pointer gestures and keyboard commands turned into portal, camera and HUD changes.
//!
//! A press is hit-tested once to decide whether it grabs a portal. On release, a gesture that
//! stayed inside the click threshold is hit-tested again at the release point and dispatched
//! through [`click_action`]. Anything else is a drag: it moves or spins the grabbed portal, or
//! orbits the camera when nothing was grabbed.

mod gesture;
mod hit_test;
mod navigation;
mod pointer;
mod ui;

use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use gesture::DragMode;
use gesture::DragSession;
use gesture::DragUpdate;
use gesture::GestureTracker;
use gesture::drag_mode;
use hit_test::HitResult;
use hit_test::HitTester;
use hit_test::PortalRegion;
use hit_test::ground_point;
use navigation::NavigationRequested;
use navigation::Navigator;
use pointer::PointerEvent;
use pointer::PointerPhase;
use ui::UiVisibility;

use crate::camera::CameraConfig;
use crate::camera::CameraFlight;
use crate::camera::OrbitLimits;
use crate::camera::OrbitRig;
use crate::explorer_input::RandomDiscovery;
use crate::explorer_input::ReturnHome;
use crate::portal::Portal;
use crate::portal::PortalConfig;
use crate::portal::PortalId;
use crate::portal::PortalRegistry;
use crate::portal::PortalState;
use crate::portal::ToggleOutcome;
use crate::schedule::FrameSet;

/// Radians of portal yaw per pixel of horizontal drag
pub const ROTATE_SENSITIVITY: f32 = 0.01;

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PointerEvent>()
            .add_message::<ExplorerCommand>()
            .add_message::<NavigationRequested>()
            .init_resource::<GestureTracker>()
            .init_resource::<UiVisibility>()
            .init_resource::<Navigator>()
            .add_systems(Startup, ui::spawn_hud)
            .add_observer(request_return_home)
            .add_observer(request_discovery)
            .add_systems(
                Update,
                (
                    pointer::translate_pointer_input,
                    route_pointer_events,
                    run_explorer_commands,
                    navigation::dispatch_navigation,
                    ui::tick_ui_visibility,
                    ui::update_hud,
                )
                    .chain()
                    .in_set(FrameSet::UserInput),
            );
    }
}

/// Scene-wide commands, issued by the keyboard or by clicking the landmark
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplorerCommand {
    ReturnHome,
    Discover,
}

/// What a click does
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickAction {
    ToggleUi,
    ReturnHome,
    Toggle(PortalId),
    Navigate(PortalId),
}

/// Navigation only fires on the entry plane of an open portal; every other portal hit toggles.
/// `state` is the hit portal's state, if a portal was hit.
pub const fn click_action(hit: HitResult, state: Option<PortalState>) -> ClickAction {
    match hit {
        HitResult::Miss => ClickAction::ToggleUi,
        HitResult::Landmark => ClickAction::ReturnHome,
        HitResult::Portal {
            id,
            region: PortalRegion::Entry,
        } if matches!(state, Some(PortalState::Open)) => ClickAction::Navigate(id),
        HitResult::Portal { id, .. } => ClickAction::Toggle(id),
    }
}

/// Maps a uniform pick in `0..registry.len()` to the portal to discover and where it stands
pub fn discovery_target(registry: &PortalRegistry, pick: usize) -> Option<(PortalId, Vec3)> {
    let id = registry.id_at(pick)?;
    registry.get(id).map(|portal| (id, portal.live_position))
}

/// Opens or closes a portal; opening also flies the camera over to frame it
pub fn toggle_portal(
    registry: &mut PortalRegistry,
    rig: &mut OrbitRig,
    id: PortalId,
    config: &PortalConfig,
) -> ToggleOutcome {
    let outcome = registry.toggle(id, config);
    if let ToggleOutcome::Opening(_) = outcome
        && let Some(portal) = registry.get(id)
    {
        CameraFlight::focus_portal(rig.eye, portal.live_position).launch(rig);
    }
    outcome
}

/// Flies to the portal at `pick` and opens it if it is closed. A portal that is already open
/// or mid-animation is left alone.
pub fn discover(
    registry: &mut PortalRegistry,
    rig: &mut OrbitRig,
    pick: usize,
    config: &PortalConfig,
) -> Option<PortalId> {
    let (id, position) = discovery_target(registry, pick)?;
    CameraFlight::discovery(position).launch(rig);
    if registry.get(id).map(Portal::state) == Some(PortalState::Closed) {
        registry.toggle(id, config);
    }
    Some(id)
}

/// Closes every open portal and flies home. Dragged portals stay where they were left.
/// Returns how many portals started closing.
pub fn return_home(registry: &mut PortalRegistry, rig: &mut OrbitRig, config: &PortalConfig) -> usize {
    let closing = registry.close_all(config).len();
    CameraFlight::home().launch(rig);
    closing
}

fn request_return_home(_: On<Start<ReturnHome>>, mut commands: MessageWriter<ExplorerCommand>) {
    commands.write(ExplorerCommand::ReturnHome);
}

fn request_discovery(_: On<Start<RandomDiscovery>>, mut commands: MessageWriter<ExplorerCommand>) {
    commands.write(ExplorerCommand::Discover);
}

fn route_pointer_events(
    mut pointer: MessageReader<PointerEvent>,
    mut gestures: ResMut<GestureTracker>,
    mut ui: ResMut<UiVisibility>,
    mut registry: ResMut<PortalRegistry>,
    portal_config: Res<PortalConfig>,
    camera_config: Res<CameraConfig>,
    hit_tester: HitTester,
    mut camera: Single<(&Camera, &GlobalTransform, &mut OrbitRig)>,
    mut commands: MessageWriter<ExplorerCommand>,
    mut navigation: MessageWriter<NavigationRequested>,
) {
    let (camera, camera_transform, ref mut rig) = *camera;
    let limits = OrbitLimits::from(&*camera_config);

    for event in pointer.read() {
        ui.touch();
        let ray = camera.viewport_to_world(camera_transform, event.position).ok();

        match event.phase {
            PointerPhase::Down => {
                let session = match ray.map(|ray| hit_tester.cast(ray, &registry)) {
                    Some(HitResult::Portal { id, .. }) => Some(DragSession {
                        portal: id,
                        mode:   drag_mode(event.secondary, event.modifier),
                    }),
                    _ => None,
                };
                gestures.press(event.position, session);
            },
            PointerPhase::Move => match gestures.moved(event.position) {
                Some(DragUpdate::Portal(DragSession {
                    portal,
                    mode: DragMode::Move,
                })) => {
                    if let Some(point) = ray.and_then(ground_point) {
                        registry.set_live_position(portal, point);
                    }
                },
                Some(DragUpdate::Portal(DragSession {
                    portal,
                    mode: DragMode::Rotate,
                })) => registry.rotate_live(portal, event.delta.x * ROTATE_SENSITIVITY),
                Some(DragUpdate::Orbit) => rig.orbit(
                    -event.delta.x * camera_config.orbit_sensitivity,
                    event.delta.y * camera_config.orbit_sensitivity,
                    &limits,
                ),
                Some(DragUpdate::Undecided) | None => {},
            },
            PointerPhase::Up => {
                let Some(end) = gestures.release(event.position) else {
                    continue;
                };
                if !end.click {
                    if let Some(portal) = end.session.and_then(|session| registry.get(session.portal)) {
                        let (distance, yaw) = portal.displacement();
                        debug!("portal {} dropped {distance:.2} from its placement, yaw {yaw:+.2}", portal.label);
                    }
                    continue;
                }
                let hit = ray.map_or(HitResult::Miss, |ray| hit_tester.cast(ray, &registry));
                let state = match hit {
                    HitResult::Portal { id, .. } => registry.get(id).map(Portal::state),
                    HitResult::Landmark | HitResult::Miss => None,
                };

                match click_action(hit, state) {
                    ClickAction::ToggleUi => ui.toggle(),
                    ClickAction::ReturnHome => {
                        commands.write(ExplorerCommand::ReturnHome);
                    },
                    ClickAction::Toggle(id) => {
                        toggle_portal(&mut registry, rig, id, &portal_config);
                    },
                    ClickAction::Navigate(id) => {
                        if let Some(portal) = registry.get(id) {
                            info!("entering portal {}", portal.label);
                            navigation.write(NavigationRequested {
                                portal:      id,
                                destination: portal.destination.clone(),
                            });
                        }
                    },
                }
            },
            PointerPhase::Cancel => gestures.cancel(),
        }
    }
}

fn run_explorer_commands(
    mut commands: MessageReader<ExplorerCommand>,
    mut registry: ResMut<PortalRegistry>,
    portal_config: Res<PortalConfig>,
    mut ui: ResMut<UiVisibility>,
    mut rig: Single<&mut OrbitRig>,
) {
    for command in commands.read() {
        ui.touch();
        match command {
            ExplorerCommand::ReturnHome => {
                let closing = return_home(&mut registry, &mut rig, &portal_config);
                info!("returning home, closing {closing} portal(s)");
            },
            ExplorerCommand::Discover => {
                if registry.is_empty() {
                    continue;
                }
                let pick = rand::random_range(0..registry.len());
                if let Some(portal) =
                    discover(&mut registry, &mut rig, pick, &portal_config).and_then(|id| registry.get(id))
                {
                    info!("discovered portal {}", portal.label);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::PortalCatalog;
    use crate::portal::RingLayout;
    use crate::portal::build_layout;
    use crate::tween::TweenTarget;

    const DT: f32 = 1.0 / 60.0;

    fn registry() -> PortalRegistry {
        let catalog = PortalCatalog::default();
        let placements = build_layout(catalog.len(), &RingLayout::default());
        PortalRegistry::from_layout(&catalog, &placements, &PortalConfig::default())
    }

    fn home_rig() -> OrbitRig {
        let home = CameraFlight::home();
        OrbitRig::new(home.eye, home.focus)
    }

    /// Runs the frame loop's animation steps for `secs`, settling hinge completions
    fn run_for(registry: &mut PortalRegistry, rig: &mut OrbitRig, secs: f32) {
        let mut elapsed = 0.0;
        while elapsed < secs {
            rig.step(DT);
            for done in registry.step(DT) {
                if let TweenTarget::Hinge(id) = done.target {
                    registry.settle(id, done.handle);
                }
            }
            elapsed += DT;
        }
    }

    fn portal_hit(index: usize, region: PortalRegion) -> HitResult {
        HitResult::Portal {
            id: PortalId::from_index(index),
            region,
        }
    }

    #[test]
    fn miss_toggles_the_hud_and_landmark_goes_home() {
        assert_eq!(click_action(HitResult::Miss, None), ClickAction::ToggleUi);
        assert_eq!(click_action(HitResult::Landmark, None), ClickAction::ReturnHome);
    }

    #[test]
    fn body_hits_always_toggle() {
        let id = PortalId::from_index(3);
        for state in [
            PortalState::Closed,
            PortalState::Opening,
            PortalState::Open,
            PortalState::Closing,
        ] {
            assert_eq!(
                click_action(portal_hit(3, PortalRegion::Body), Some(state)),
                ClickAction::Toggle(id)
            );
        }
    }

    #[test]
    fn entry_plane_navigates_only_when_open() {
        let id = PortalId::from_index(5);
        assert_eq!(
            click_action(portal_hit(5, PortalRegion::Entry), Some(PortalState::Open)),
            ClickAction::Navigate(id)
        );
        assert_eq!(
            click_action(portal_hit(5, PortalRegion::Entry), Some(PortalState::Closed)),
            ClickAction::Toggle(id)
        );
        assert_eq!(
            click_action(portal_hit(5, PortalRegion::Entry), Some(PortalState::Opening)),
            ClickAction::Toggle(id)
        );
    }

    #[test]
    fn every_pick_maps_to_a_portal() {
        let catalog = PortalCatalog::default();
        let placements = build_layout(catalog.len(), &RingLayout::default());
        let registry = PortalRegistry::from_layout(&catalog, &placements, &PortalConfig::default());
        for pick in 0..registry.len() {
            let (id, position) = discovery_target(&registry, pick).unwrap();
            assert_eq!(id.index(), pick);
            assert_eq!(position, registry.get(id).unwrap().static_position);
        }
        assert!(discovery_target(&registry, registry.len()).is_none());
    }

    #[test]
    fn discovery_opens_the_portal_and_flies_out_to_it() {
        let config = PortalConfig::default();
        let mut registry = registry();
        let mut rig = home_rig();

        let id = discover(&mut registry, &mut rig, 7, &config).unwrap();
        assert_eq!(id.index(), 7);
        assert_eq!(registry.get(id).unwrap().state(), PortalState::Opening);
        assert!(rig.is_flying());

        run_for(&mut registry, &mut rig, 6.0);
        let flight = CameraFlight::discovery(registry.get(id).unwrap().live_position);
        assert_eq!(registry.get(id).unwrap().state(), PortalState::Open);
        assert!(!rig.is_flying());
        assert!(rig.eye.distance(flight.eye) < 1e-3);
        assert!(rig.focus.distance(flight.focus) < 1e-3);
    }

    #[test]
    fn random_discovery_always_ends_open() {
        let config = PortalConfig::default();
        for _ in 0..10 {
            let mut registry = registry();
            let mut rig = home_rig();
            let pick = rand::random_range(0..registry.len());

            let id = discover(&mut registry, &mut rig, pick, &config).unwrap();
            run_for(&mut registry, &mut rig, 6.0);
            assert_eq!(registry.get(id).unwrap().state(), PortalState::Open);
        }
    }

    #[test]
    fn discovering_an_open_portal_only_moves_the_camera() {
        let config = PortalConfig::default();
        let mut registry = registry();
        let mut rig = home_rig();
        discover(&mut registry, &mut rig, 2, &config);
        run_for(&mut registry, &mut rig, 6.0);

        let id = discover(&mut registry, &mut rig, 2, &config).unwrap();
        assert_eq!(registry.get(id).unwrap().state(), PortalState::Open);
        let past_the_end = registry.len();
        assert!(discover(&mut registry, &mut rig, past_the_end, &config).is_none());
    }

    #[test]
    fn return_home_closes_everything_and_flies_home() {
        let config = PortalConfig::default();
        let mut registry = registry();
        let mut rig = home_rig();
        toggle_portal(&mut registry, &mut rig, PortalId::from_index(0), &config);
        toggle_portal(&mut registry, &mut rig, PortalId::from_index(12), &config);
        run_for(&mut registry, &mut rig, 4.0);
        toggle_portal(&mut registry, &mut rig, PortalId::from_index(20), &config);
        registry.set_live_position(PortalId::from_index(12), Vec3::new(3.0, 0.0, 3.0));

        assert_eq!(return_home(&mut registry, &mut rig, &config), 3);
        run_for(&mut registry, &mut rig, 6.0);

        let home = CameraFlight::home();
        assert!(registry.all().all(|portal| portal.state() == PortalState::Closed));
        assert!(rig.eye.distance(home.eye) < 1e-3);
        assert!(rig.focus.distance(home.focus) < 1e-3);
        assert_eq!(
            registry.get(PortalId::from_index(12)).unwrap().live_position,
            Vec3::new(3.0, 0.0, 3.0)
        );
    }

    #[test]
    fn clicking_a_closed_portal_opens_it_and_frames_it() {
        let config = PortalConfig::default();
        let mut registry = registry();
        let mut rig = home_rig();
        let id = PortalId::from_index(4);
        assert_eq!(
            click_action(portal_hit(4, PortalRegion::Body), Some(PortalState::Closed)),
            ClickAction::Toggle(id)
        );

        let outcome = toggle_portal(&mut registry, &mut rig, id, &config);
        assert!(matches!(outcome, ToggleOutcome::Opening(_)));
        assert!(rig.is_flying());

        let flight = CameraFlight::focus_portal(home_rig().eye, registry.get(id).unwrap().live_position);
        run_for(&mut registry, &mut rig, 4.0);
        assert_eq!(registry.get(id).unwrap().state(), PortalState::Open);
        assert!(rig.eye.distance(flight.eye) < 1e-3);
        assert!(rig.focus.distance(flight.focus) < 1e-3);
    }

    #[test]
    fn closing_a_portal_leaves_the_camera_put() {
        let config = PortalConfig::default();
        let mut registry = registry();
        let mut rig = home_rig();
        let id = PortalId::from_index(4);
        toggle_portal(&mut registry, &mut rig, id, &config);
        run_for(&mut registry, &mut rig, 4.0);

        let eye = rig.eye;
        let outcome = toggle_portal(&mut registry, &mut rig, id, &config);
        assert!(matches!(outcome, ToggleOutcome::Closing(_)));
        assert!(!rig.is_flying());
        assert_eq!(rig.eye, eye);
        assert!(matches!(toggle_portal(&mut registry, &mut rig, id, &config), ToggleOutcome::Ignored));
    }
}
