use crate::{Error, Fragment, ImplementorBoard, ImplementorSink};
use bevy_ecs::prelude::World;

/// Extension methods for wiring implementor fragments and the implementor sink into a page.
///
/// The page's [`ImplementorBoard`] is created on first use, so fragments and the sink may be
/// added in any order.
pub trait RegisterImplementorsExt {
    /// Hands the fragment's implementors to the sink, or buffers them until there is one.
    fn register_implementors(&mut self, fragment: Fragment) -> &mut Self;

    /// Binds the page's sink and flushes any buffered implementors into it.
    /// Only the first sink is kept; later calls are logged and ignored.
    fn init_implementor_sink<S: ImplementorSink>(&mut self, sink: S) -> &mut Self;

    /// # Panics
    /// If nothing has been registered with this page yet.
    fn implementor_board(&self) -> &ImplementorBoard;
}

impl RegisterImplementorsExt for World {
    fn register_implementors(&mut self, fragment: Fragment) -> &mut Self {
        let board = self
            .get_resource_or_insert_with::<ImplementorBoard>(Default::default)
            .into_inner();
        let _ = fragment.load(board);
        self
    }

    fn init_implementor_sink<S: ImplementorSink>(&mut self, sink: S) -> &mut Self {
        let board = self
            .get_resource_or_insert_with::<ImplementorBoard>(Default::default)
            .into_inner();
        if let Err(Error::SinkAlreadyInitialized) = board.initialize(sink) {
            tracing::warn!(
                "ignoring `{}`: an implementor sink is already initialized",
                std::any::type_name::<S>()
            );
        }
        self
    }

    fn implementor_board(&self) -> &ImplementorBoard {
        match self.get_resource::<ImplementorBoard>() {
            Some(board) => board,
            None => board_missing(),
        }
    }
}

#[cfg(feature = "bevy_app")]
impl RegisterImplementorsExt for bevy_app::App {
    fn register_implementors(&mut self, fragment: Fragment) -> &mut Self {
        self.world_mut().register_implementors(fragment);
        self
    }

    fn init_implementor_sink<S: ImplementorSink>(&mut self, sink: S) -> &mut Self {
        self.world_mut().init_implementor_sink(sink);
        self
    }

    fn implementor_board(&self) -> &ImplementorBoard {
        self.world().implementor_board()
    }
}

#[inline(never)]
#[cold]
fn board_missing() -> ! {
    panic!("No implementor board exists for this page; did you forget to register any implementors?")
}
