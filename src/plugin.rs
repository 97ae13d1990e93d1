use crate::{ImplementorBoard, ImplementorIndex, PendingPolicy, RegisterImplementorsExt};
use bevy_app::{App, Plugin, Startup};
use bevy_ecs::prelude::World;

/// Installs the page's [`ImplementorBoard`].
///
/// Implementors registered before this plugin is added stay buffered; only the policy changes.
#[derive(Default)]
pub struct ImplementorsPlugin {
    pub policy: PendingPolicy,
}

impl Plugin for ImplementorsPlugin {
    fn build(&self, app: &mut App) {
        app.world_mut()
            .get_resource_or_insert_with(|| ImplementorBoard::with_policy(self.policy))
            .set_policy(self.policy);
    }
}

/// Binds an [`ImplementorIndex`] as the page's sink when the app starts up.
///
/// Keep a clone of the index to read the implementor lists afterwards.
pub struct ImplementorIndexPlugin {
    pub index: ImplementorIndex,
}

impl Plugin for ImplementorIndexPlugin {
    fn build(&self, app: &mut App) {
        let index = self.index.clone();
        app.add_systems(Startup, move |world: &mut World| {
            world.init_implementor_sink(index.clone());
        });
    }
}
