//! Behavioural tests for `TrailLayerController`.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Runtime;
use trailside_core::{
    TrailBasicInfo,
    map::{Color, MapContext, MapSurfaceError, MemoryMapSurface},
    overlay::{OverlayError, OverlayState, TRAIL_PATH_SOURCE_ID, TrailLayerController},
    test_support::{StubTrailService, line_path, sample_trail},
};

struct Harness {
    runtime: Runtime,
    context: MapContext<MemoryMapSurface>,
    controller: TrailLayerController<MemoryMapSurface>,
    trails: Vec<TrailBasicInfo>,
}

impl Harness {
    fn new(service: StubTrailService, trails: Vec<TrailBasicInfo>) -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        let (context, handle) = MapContext::new(MemoryMapSurface::new());
        Self {
            runtime,
            context,
            controller: TrailLayerController::new(handle, Arc::new(service)),
            trails,
        }
    }

    fn add(&mut self) -> Result<(), OverlayError> {
        let Self {
            runtime,
            context,
            controller,
            ..
        } = self;
        runtime.block_on(pump(context, controller.add_to_map()))
    }

    fn show(&mut self, trails: &[TrailBasicInfo]) -> Result<usize, OverlayError> {
        let Self {
            runtime,
            context,
            controller,
            ..
        } = self;
        runtime.block_on(pump(context, controller.show_trails_from_features(trails)))
    }

    fn remove(&mut self) -> Result<(), OverlayError> {
        let Self {
            runtime,
            context,
            controller,
            ..
        } = self;
        runtime.block_on(pump(context, controller.remove_from_map()))
    }

    fn state(&self) -> OverlayState {
        self.runtime.block_on(self.controller.state())
    }
}

/// Drive `operation` while executing the map commands it queues.
async fn pump<F: Future>(context: &mut MapContext<MemoryMapSurface>, operation: F) -> F::Output {
    tokio::pin!(operation);
    loop {
        tokio::select! {
            biased;
            output = &mut operation => return output,
            () = tokio::task::yield_now() => {
                context.run_pending();
            }
        }
    }
}

#[fixture]
fn harness() -> RefCell<Option<Harness>> {
    RefCell::new(None)
}

#[fixture]
fn outcome() -> RefCell<Option<Result<(), OverlayError>>> {
    RefCell::new(None)
}

fn with_harness<T>(harness: &RefCell<Option<Harness>>, f: impl FnOnce(&mut Harness) -> T) -> T {
    let mut borrow = harness.borrow_mut();
    f(borrow.as_mut().expect("harness configured by a given step"))
}

#[given("a trail service with an easy and a severe trail")]
fn service_with_trails(#[from(harness)] harness: &RefCell<Option<Harness>>) {
    let service = StubTrailService::new().with_paths(vec![line_path(1, 10), line_path(2, 20)]);
    let trails = vec![
        sample_trail(10, "Mount Falcon", "1"),
        sample_trail(20, "Rampart Range", "4"),
    ];
    *harness.borrow_mut() = Some(Harness::new(service, trails));
}

#[when("the overlay is added to the map")]
fn add_overlay(#[from(harness)] harness: &RefCell<Option<Harness>>) {
    with_harness(harness, Harness::add).expect("overlay added");
}

#[when("the trails are shown on the overlay")]
fn show_trails(#[from(harness)] harness: &RefCell<Option<Harness>>) {
    with_harness(harness, |h| {
        let trails = h.trails.clone();
        h.show(&trails)
    })
    .expect("trails shown");
}

#[when("an empty trail list is shown on the overlay")]
fn show_nothing(#[from(harness)] harness: &RefCell<Option<Harness>>) {
    let shown = with_harness(harness, |h| h.show(&[])).expect("empty list shown");
    assert_eq!(shown, 0);
}

#[when("the overlay is removed from the map")]
fn remove_overlay(
    #[from(harness)] harness: &RefCell<Option<Harness>>,
    #[from(outcome)] outcome: &RefCell<Option<Result<(), OverlayError>>>,
) {
    *outcome.borrow_mut() = Some(with_harness(harness, Harness::remove));
}

#[then("the overlay is populated")]
fn overlay_populated(#[from(harness)] harness: &RefCell<Option<Harness>>) {
    assert_eq!(with_harness(harness, |h| h.state()), OverlayState::Populated);
}

#[then("the overlay is absent")]
fn overlay_absent(#[from(harness)] harness: &RefCell<Option<Harness>>) {
    assert_eq!(with_harness(harness, |h| h.state()), OverlayState::Absent);
}

#[then("the trail lines are magenta and red")]
fn lines_coloured(#[from(harness)] harness: &RefCell<Option<Harness>>) {
    let colours: Vec<Color> = with_harness(harness, |h| {
        h.context
            .surface()
            .rendered_lines()
            .iter()
            .map(|line| line.color)
            .collect()
    });
    assert_eq!(colours, vec![Color::MAGENTA, Color::RED]);
}

#[then("the overlay source is empty")]
fn source_empty(#[from(harness)] harness: &RefCell<Option<Harness>>) {
    let count = with_harness(harness, |h| {
        h.context
            .surface()
            .source(TRAIL_PATH_SOURCE_ID)
            .map(|data| data.features.len())
    });
    assert_eq!(count, Some(0));
}

#[then("the map has no trail source")]
fn no_trail_source(#[from(harness)] harness: &RefCell<Option<Harness>>) {
    let present = with_harness(harness, |h| {
        h.context.surface().source(TRAIL_PATH_SOURCE_ID).is_some()
    });
    assert!(!present);
}

#[then("the removal reports a missing layer")]
fn removal_fails(#[from(outcome)] outcome: &RefCell<Option<Result<(), OverlayError>>>) {
    assert!(
        matches!(
            *outcome.borrow(),
            Some(Err(OverlayError::Map(MapSurfaceError::MissingLayer(_))))
        ),
        "expected a missing layer error"
    );
}

#[scenario(path = "tests/features/trail_overlay.feature", index = 0)]
fn trails_coloured_by_difficulty(
    harness: RefCell<Option<Harness>>,
    outcome: RefCell<Option<Result<(), OverlayError>>>,
) {
    let _ = (harness, outcome);
}

#[scenario(path = "tests/features/trail_overlay.feature", index = 1)]
fn empty_list_empties_overlay(
    harness: RefCell<Option<Harness>>,
    outcome: RefCell<Option<Result<(), OverlayError>>>,
) {
    let _ = (harness, outcome);
}

#[scenario(path = "tests/features/trail_overlay.feature", index = 2)]
fn removing_unadded_overlay_fails(
    harness: RefCell<Option<Harness>>,
    outcome: RefCell<Option<Result<(), OverlayError>>>,
) {
    let _ = (harness, outcome);
}

#[scenario(path = "tests/features/trail_overlay.feature", index = 3)]
fn removing_added_overlay_clears_map(
    harness: RefCell<Option<Harness>>,
    outcome: RefCell<Option<Result<(), OverlayError>>>,
) {
    let _ = (harness, outcome);
}
