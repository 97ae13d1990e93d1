//! Documentation sites list, on each trait's page, the types that implement that trait.
//! Those lists are produced at documentation-build time as one *fragment* per trait,
//! and they have to meet up with whatever renders them on the page.
//!
//! Neither side knows who shows up first, so the page keeps an [`ImplementorBoard`].
//! Fragments that arrive before the renderer are buffered; fragments that arrive after
//! are handed over immediately.
//!
//! ```
//! use bevy_ecs::prelude::World;
//! use doc_implementors::*;
//!
//! let fragment = Fragment::new(
//!     TraitPath::parse("core::marker::StructuralPartialEq"),
//!     implementors! {
//!         "libA" => [{ text: "impl Foo for Bar", synthetic: false, types: [] }],
//!     },
//! );
//!
//! let mut world = World::new();
//!
//! // No sink yet: the implementors wait in the pending buffer.
//! world.register_implementors(fragment);
//! assert_eq!(world.implementor_board().pending().len(), 1);
//!
//! // Binding the sink flushes the buffer into it.
//! let index = ImplementorIndex::new();
//! world.init_implementor_sink(index.clone());
//! assert_eq!(index.deliveries(), 1);
//! assert!(world.implementor_board().pending().is_empty());
//! ```
//!
//! The sink can be anything implementing [`ImplementorSink`], including a closure.
//! The built-in [`ImplementorIndex`] stores what it receives and only assembles the
//! implementor lists when asked to.
//!
//! ```
//! # use bevy_ecs::prelude::World;
//! # use doc_implementors::*;
//! let index = ImplementorIndex::for_crate("my_crate");
//!
//! let mut world = World::new();
//! world
//!     .init_implementor_sink(index.clone())
//!     .register_implementors(Fragment::new(
//!         TraitPath::parse("core::marker::Send"),
//!         implementors! {
//!             "my_crate" => [{ text: "impl Send for Local", synthetic: false, types: [] }],
//!             "other" => [
//!                 { text: "impl Send for Explicit", synthetic: false, types: [] },
//!                 { text: "impl Send for Auto", synthetic: true, types: ["Auto"] },
//!             ],
//!         },
//!     ));
//!
//! let lists = index.lists();
//! assert_eq!(lists.implementors.len(), 1);
//! assert_eq!(lists.synthetic[0].descriptor.text(), "impl Send for Auto");
//! ```
//!
//! Generated scripts can be read straight from a documentation tree with [`Fragment::read`],
//! which takes the trait path from a location such as
//! `doc/implementors/core/marker/trait.StructuralPartialEq.js`.
//!
//! # Pending buffer
//!
//! By default the pending buffer holds a single registry: if several fragments arrive before
//! the sink, only the last one is kept. [`PendingPolicy::Accumulate`] keeps all of them instead
//! and delivers them in arrival order.
//!
//! ```
//! # use doc_implementors::*;
//! let mut board = ImplementorBoard::with_policy(PendingPolicy::Accumulate);
//! let _ = board.register_implementors(implementors! { "a" => [] });
//! let _ = board.register_implementors(implementors! { "b" => [] });
//! assert_eq!(board.pending().len(), 2);
//! ```

mod descriptor;
mod error;
mod fragment;
mod internal;
#[cfg(feature = "bevy_app")]
mod plugin;
mod sink;
#[cfg(test)]
mod tests;

pub use descriptor::*;
pub use error::*;
pub use fragment::*;
pub use internal::*;
#[cfg(feature = "bevy_app")]
pub use plugin::*;
pub use sink::*;
