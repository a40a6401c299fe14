use bevy::prelude::*;

use crate::portal::PortalId;

/// Whatever actually takes the visitor to a destination
pub trait NavigationSink: Send + Sync {
    fn navigate(&mut self, destination: &str);
}

/// Default sink: records the destination in the log
#[derive(Default, Debug)]
pub struct LogNavigator;

impl NavigationSink for LogNavigator {
    fn navigate(&mut self, destination: &str) {
        info!("navigating to {destination}");
    }
}

#[derive(Resource)]
pub struct Navigator(pub Box<dyn NavigationSink>);

impl Default for Navigator {
    fn default() -> Self { Self(Box::new(LogNavigator)) }
}

/// One per completed "enter portal" gesture
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub struct NavigationRequested {
    pub portal:      PortalId,
    pub destination: String,
}

pub fn dispatch_navigation(mut requests: MessageReader<NavigationRequested>, mut navigator: ResMut<Navigator>) {
    for request in requests.read() {
        debug!("portal {:?} entered", request.portal);
        navigator.0.navigate(&request.destination);
    }
}
