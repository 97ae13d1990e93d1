use super::*;
use bevy_ecs::prelude::World;
use std::sync::{Arc, Mutex};

/// A sink that records every registry it is handed.
#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<ImplementorRegistry>>>);

impl Recorder {
    fn received(&self) -> Vec<ImplementorRegistry> {
        self.0.lock().unwrap().clone()
    }
}

impl ImplementorSink for Recorder {
    fn register_implementors(&mut self, implementors: ImplementorRegistry) {
        self.0.lock().unwrap().push(implementors);
    }
}

fn partial_eq() -> ImplementorRegistry {
    implementors! {
        "libA" => [{ text: "impl Foo for Bar", synthetic: false, types: [] }],
    }
}

fn display() -> ImplementorRegistry {
    implementors! {
        "libB" => [
            { text: "impl Display for Baz", synthetic: false, types: [] },
            { text: "impl<T> Display for Wrapper<T>", synthetic: false, types: ["T"] },
        ],
    }
}

fn fragment(path: &str, implementors: ImplementorRegistry) -> Fragment {
    Fragment::new(TraitPath::parse(path), implementors)
}

#[test]
fn delivers_directly_once_initialized() {
    let recorder = Recorder::default();
    let mut board = ImplementorBoard::new();
    assert_eq!(board.initialize(recorder.clone()).unwrap(), 0);

    let handoff = fragment("core::cmp::PartialEq", partial_eq()).load(&mut board);

    assert_eq!(handoff, Handoff::Delivered);
    assert_eq!(recorder.received(), [partial_eq()]);
    assert!(board.pending().is_empty());
}

#[test]
fn buffers_until_initialized() {
    let recorder = Recorder::default();
    let mut board = ImplementorBoard::new();

    let handoff = fragment("core::cmp::PartialEq", partial_eq()).load(&mut board);

    assert_eq!(handoff, Handoff::Buffered { displaced: 0 });
    assert_eq!(board.pending(), [partial_eq()]);
    assert!(recorder.received().is_empty());

    assert_eq!(board.initialize(recorder.clone()).unwrap(), 1);
    assert_eq!(recorder.received(), [partial_eq()]);
    assert!(board.pending().is_empty());
}

#[test]
fn second_initialization_does_not_redeliver() {
    let first = Recorder::default();
    let second = Recorder::default();
    let mut board = ImplementorBoard::new();
    let _ = board.register_implementors(partial_eq());

    assert_eq!(board.initialize(first.clone()).unwrap(), 1);
    assert!(matches!(
        board.initialize(second.clone()),
        Err(Error::SinkAlreadyInitialized)
    ));

    assert_eq!(first.received().len(), 1);
    assert!(second.received().is_empty());

    // The original sink stays bound.
    let _ = board.register_implementors(display());
    assert_eq!(first.received(), [partial_eq(), display()]);
    assert!(second.received().is_empty());
}

#[test]
fn drain_pending_happens_once() {
    let mut board = ImplementorBoard::new();
    let _ = board.register_implementors(partial_eq());

    assert_eq!(board.drain_pending(), [partial_eq()]);
    assert!(board.drain_pending().is_empty());
    assert!(!board.is_initialized());
}

#[test]
fn preserves_implementor_order() {
    let recorder = Recorder::default();
    let mut board = ImplementorBoard::new();
    let implementors = implementors! {
        "lib" => [
            { text: "d0", synthetic: false, types: [] },
            { text: "d1", synthetic: true, types: ["A"] },
            { text: "d2", synthetic: false, types: ["B", "C"] },
        ],
    };
    let _ = board.register_implementors(implementors);
    board.initialize(recorder.clone()).unwrap();

    let received = recorder.received();
    let texts: Vec<&str> = received[0]
        .library("lib")
        .unwrap()
        .iter()
        .map(ImplementorDescriptor::text)
        .collect();
    assert_eq!(texts, ["d0", "d1", "d2"]);
}

#[test]
fn last_buffered_fragment_wins() {
    let recorder = Recorder::default();
    let mut board = ImplementorBoard::new();

    let first = fragment("core::cmp::PartialEq", partial_eq()).load(&mut board);
    let second = fragment("core::fmt::Display", display()).load(&mut board);

    assert_eq!(first, Handoff::Buffered { displaced: 0 });
    assert_eq!(second, Handoff::Buffered { displaced: 1 });
    assert_eq!(board.pending(), [display()]);

    board.initialize(recorder.clone()).unwrap();
    assert_eq!(recorder.received(), [display()]);
}

#[test]
fn accumulate_policy_keeps_arrival_order() {
    let recorder = Recorder::default();
    let mut board = ImplementorBoard::with_policy(PendingPolicy::Accumulate);

    let _ = board.register_implementors(partial_eq());
    let _ = board.register_implementors(display());

    assert_eq!(board.initialize(recorder.clone()).unwrap(), 2);
    assert_eq!(recorder.received(), [partial_eq(), display()]);
}

#[test]
fn switching_to_last_write_wins_keeps_newest() {
    let mut board = ImplementorBoard::with_policy(PendingPolicy::Accumulate);
    let _ = board.register_implementors(partial_eq());
    let _ = board.register_implementors(display());

    board.set_policy(PendingPolicy::LastWriteWins);

    assert_eq!(board.pending(), [display()]);
}

#[test]
fn closure_sink_counts_invocations() {
    let calls = Arc::new(Mutex::new(0));
    let mut board = ImplementorBoard::new();
    board
        .initialize({
            let calls = calls.clone();
            move |_: ImplementorRegistry| *calls.lock().unwrap() += 1
        })
        .unwrap();

    let _ = fragment("core::cmp::PartialEq", partial_eq()).load(&mut board);

    assert_eq!(*calls.lock().unwrap(), 1);
    assert!(board.pending().is_empty());
}

#[test]
fn world_is_order_independent() {
    let recorder = Recorder::default();
    let mut world = World::new();
    world
        .register_implementors(fragment("core::cmp::PartialEq", partial_eq()))
        .init_implementor_sink(recorder.clone())
        .register_implementors(fragment("core::fmt::Display", display()));

    assert!(world.implementor_board().is_initialized());
    assert_eq!(recorder.received(), [partial_eq(), display()]);
}

#[test]
fn world_ignores_second_sink() {
    let first = Recorder::default();
    let second = Recorder::default();
    let mut world = World::new();
    world
        .init_implementor_sink(first.clone())
        .init_implementor_sink(second.clone())
        .register_implementors(fragment("core::cmp::PartialEq", partial_eq()));

    assert_eq!(first.received(), [partial_eq()]);
    assert!(second.received().is_empty());
}

#[test]
#[should_panic]
fn board_missing_panics() {
    let world = World::new();
    world.implementor_board();
}

#[test]
fn index_splits_and_filters_lists() {
    let mut index = ImplementorIndex::for_crate("self_crate").with_inlined_types(["Inline"]);
    index.register_implementors(implementors! {
        "self_crate" => [{ text: "impl Send for Mine", synthetic: false, types: [] }],
        "dep" => [
            { text: "impl Send for Explicit", synthetic: false, types: [] },
            { text: "impl Send for Inline", synthetic: true, types: ["Inline"] },
            { text: "impl Send for Pair<A, B>", synthetic: true, types: ["A", "B"] },
            { text: "impl Send for B", synthetic: true, types: ["B"] },
            { text: "impl Send for A", synthetic: true, types: ["A"] },
        ],
    });
    index.register_implementors(implementors! {
        "later" => [{ text: "impl Send for C", synthetic: true, types: ["C"] }],
    });

    let lists = index.lists();
    let texts = |listed: &[ListedImplementor]| -> Vec<String> {
        listed
            .iter()
            .map(|listed| listed.descriptor.text().to_owned())
            .collect()
    };

    assert_eq!(texts(&lists.implementors), ["impl Send for Explicit"]);
    assert_eq!(
        texts(&lists.synthetic),
        ["impl Send for Pair<A, B>", "impl Send for C"]
    );
    assert_eq!(lists.implementors[0].library, "dep");
    assert_eq!(index.deliveries(), 2);
}

#[test]
fn index_records_types_checked_before_a_duplicate() {
    let mut index = ImplementorIndex::new().with_inlined_types(["B"]);
    index.register_implementors(implementors! {
        "dep" => [
            // Skipped on `B`, but `A` has already been recorded.
            { text: "first", synthetic: true, types: ["A", "B"] },
            { text: "second", synthetic: true, types: ["A"] },
            { text: "third", synthetic: true, types: [] },
        ],
    });

    let lists = index.lists();
    assert_eq!(lists.synthetic.len(), 1);
    assert_eq!(lists.synthetic[0].descriptor.text(), "third");
}

#[test]
fn index_assembles_lazily() {
    let index = ImplementorIndex::new();
    let mut board = ImplementorBoard::new();
    board.initialize(index.clone()).unwrap();
    assert!(index.lists().is_empty());

    let _ = board.register_implementors(display());

    assert_eq!(index.received(), [display()]);
    assert_eq!(index.lists().implementors.len(), 2);
}

#[test]
fn trait_path_from_script_path() {
    let path = std::path::Path::new("target/doc/implementors/core/marker/trait.StructuralPartialEq.js");
    let trait_path = TraitPath::from_script_path(path).unwrap();

    assert_eq!(trait_path, TraitPath::parse("core::marker::StructuralPartialEq"));
    assert_eq!(trait_path.to_string(), "core::marker::StructuralPartialEq");
    assert_eq!(
        trait_path.script_path(),
        std::path::Path::new("implementors/core/marker/trait.StructuralPartialEq.js")
    );
}

#[test]
fn rejects_non_trait_script_paths() {
    for path in ["implementors/core/marker/struct.Foo.js", "trait..js", "trait.Foo.css"] {
        assert!(matches!(
            TraitPath::from_script_path(std::path::Path::new(path)),
            Err(Error::InvalidScriptPath(_))
        ));
    }
}

#[test]
fn reads_fragment_from_doc_tree() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures/implementors/core/marker/trait.StructuralPartialEq.js");
    let fragment = Fragment::read(&path).unwrap();

    assert_eq!(fragment.trait_path().name(), "StructuralPartialEq");
    assert_eq!(fragment.trait_path().module(), ["core", "marker"]);
    assert_eq!(
        fragment.implementors().library("serde_generate").unwrap()[0].text(),
        "impl StructuralPartialEq for Encoding"
    );

    let recorder = Recorder::default();
    let mut world = World::new();
    world.init_implementor_sink(recorder.clone());
    let expected = fragment.implementors().clone();
    world.register_implementors(fragment);
    assert_eq!(recorder.received(), [expected]);
}

#[test]
fn missing_script_is_an_io_error() {
    assert!(matches!(
        Fragment::read("does/not/exist/implementors/trait.Nope.js"),
        Err(Error::Io(_))
    ));
}

#[test]
fn pending_policy_from_config() {
    let policy: PendingPolicy = serde_json::from_str("\"accumulate\"").unwrap();
    assert_eq!(policy, PendingPolicy::Accumulate);
    let policy: PendingPolicy = serde_json::from_str("\"last-write-wins\"").unwrap();
    assert_eq!(policy, PendingPolicy::default());
}

#[cfg(feature = "bevy_app")]
mod app {
    use super::*;
    use bevy_app::App;

    #[test]
    fn index_plugin_binds_on_startup() {
        let index = ImplementorIndex::new();
        let mut app = App::new();
        app.add_plugins((
            ImplementorsPlugin::default(),
            ImplementorIndexPlugin {
                index: index.clone(),
            },
        ))
        .register_implementors(fragment("core::cmp::PartialEq", partial_eq()));

        // Startup hasn't run yet.
        assert!(!app.implementor_board().is_initialized());
        assert_eq!(index.deliveries(), 0);

        app.update();

        assert!(app.implementor_board().is_initialized());
        assert_eq!(index.received(), [partial_eq()]);

        app.register_implementors(fragment("core::fmt::Display", display()));
        assert_eq!(index.received(), [partial_eq(), display()]);
    }

    #[test]
    fn plugin_keeps_already_buffered_implementors() {
        let mut app = App::new();
        app.register_implementors(fragment("core::cmp::PartialEq", partial_eq()))
            .register_implementors(fragment("core::fmt::Display", display()));

        app.add_plugins(ImplementorsPlugin {
            policy: PendingPolicy::Accumulate,
        });

        let board = app.implementor_board();
        assert_eq!(board.policy(), PendingPolicy::Accumulate);
        assert_eq!(board.pending(), [display()]);
    }
}
