#![allow(clippy::float_cmp)]

use super::*;
use crate::canvas::{CanvasId, CursorKind, PanZoomCanvas};
use crate::ui::ScrollPane;

// =============================================================
// Helpers
// =============================================================

/// Canvas that counts every mutating call.
struct CountingCanvas {
    inner: PanZoomCanvas,
    calls: usize,
}

impl CountingCanvas {
    fn new() -> Self {
        Self { inner: PanZoomCanvas::new(), calls: 0 }
    }
}

impl ImageCanvas for CountingCanvas {
    fn id(&self) -> CanvasId {
        self.inner.id()
    }
    fn viewport_width(&self) -> i32 {
        self.inner.viewport_width()
    }
    fn viewport_height(&self) -> i32 {
        self.inner.viewport_height()
    }
    fn set_viewport_size(&mut self, width: i32, height: i32) {
        self.calls += 1;
        self.inner.set_viewport_size(width, height);
    }
    fn zoom_factor(&self) -> f64 {
        self.inner.zoom_factor()
    }
    fn set_zoom(&mut self, factor: f64, center: RealCoords) {
        self.calls += 1;
        self.inner.set_zoom(factor, center);
    }
    fn data_to_panel(&self, data: RealCoords) -> IntCoords {
        self.inner.data_to_panel(data)
    }
    fn panel_to_data(&self, panel: IntCoords) -> RealCoords {
        self.inner.panel_to_data(panel)
    }
    fn cursor(&self) -> CursorKind {
        self.inner.cursor()
    }
}

/// UI that counts every mutating call.
struct CountingUi {
    inner: ScrollPane,
    calls: usize,
}

impl CountingUi {
    fn new(extent: Extent, offset: IntCoords, zoom: f64) -> Self {
        let mut inner = ScrollPane::new();
        inner.resize(extent);
        inner.scroll_to(offset);
        inner.zoom_to(zoom);
        Self { inner, calls: 0 }
    }
}

impl ViewportUi for CountingUi {
    fn extent_size(&self) -> Extent {
        self.inner.extent_size()
    }
    fn scale_factor(&self) -> f64 {
        self.inner.scale_factor()
    }
    fn view_position(&self) -> IntCoords {
        self.inner.view_position()
    }
    fn view_size(&self) -> Extent {
        self.inner.view_size()
    }
    fn set_view_size(&mut self, size: Extent) {
        self.calls += 1;
        self.inner.set_view_size(size);
    }
    fn set_scale_factor(&mut self, scale: f64) {
        self.calls += 1;
        self.inner.set_scale_factor(scale);
    }
    fn set_view_position(&mut self, position: IntCoords) {
        self.calls += 1;
        self.inner.set_view_position(position);
    }
}

fn ui_geom(w: i32, h: i32, zoom: f64, x: i32, y: i32) -> UiGeometry {
    UiGeometry { size: Extent::new(w, h), view_size: Extent::new(w, h), zoom, offset: IntCoords::new(x, y) }
}

fn canvas_geom(w: i32, h: i32, zoom: f64, x: i32, y: i32) -> CanvasGeometry {
    CanvasGeometry { size: Extent::new(w, h), zoom, offset: IntCoords::new(x, y) }
}

// =============================================================
// plan
// =============================================================

#[test]
fn plan_is_empty_when_geometries_agree() {
    let ui = ui_geom(100, 80, 2.0, 5, 6);
    let canvas = canvas_geom(100, 80, 2.0, 5, 6);
    assert!(plan(SyncDirection::CanvasAuthoritative, &ui, &canvas).is_empty());
    assert!(plan(SyncDirection::UiAuthoritative, &ui, &canvas).is_empty());
}

#[test]
fn canvas_authoritative_size_only_resizes_canvas() {
    let ui = ui_geom(120, 80, 1.0, 0, 0);
    let canvas = canvas_geom(100, 80, 1.0, 0, 0);
    assert_eq!(
        plan(SyncDirection::CanvasAuthoritative, &ui, &canvas),
        vec![Mutation::CanvasViewportSize(Extent::new(120, 80))]
    );
}

#[test]
fn canvas_authoritative_offset_zooms_about_ui_center() {
    let ui = ui_geom(100, 80, 2.0, 30, 20);
    let canvas = canvas_geom(100, 80, 2.0, 0, 0);
    let mutations = plan(SyncDirection::CanvasAuthoritative, &ui, &canvas);
    assert_eq!(mutations, vec![Mutation::CanvasZoom { factor: 2.0, center: RealCoords::new(40.0, 30.0) }]);
}

#[test]
fn canvas_authoritative_zoom_adds_auto_resize_last() {
    let ui = ui_geom(200, 100, 4.0, 0, 0);
    let canvas = canvas_geom(100, 100, 1.0, 0, 0);
    let mutations = plan(SyncDirection::CanvasAuthoritative, &ui, &canvas);
    assert_eq!(
        mutations,
        vec![
            Mutation::CanvasViewportSize(Extent::new(200, 100)),
            Mutation::CanvasZoom { factor: 4.0, center: RealCoords::new(25.0, 12.5) },
            Mutation::AutoResize,
        ]
    );
}

#[test]
fn ui_authoritative_copies_each_changed_quantity() {
    let ui = ui_geom(100, 80, 1.0, 0, 0);
    let canvas = canvas_geom(150, 90, 3.0, 12, -4);
    let mutations = plan(SyncDirection::UiAuthoritative, &ui, &canvas);
    assert_eq!(
        mutations,
        vec![
            Mutation::UiViewSize(Extent::new(150, 90)),
            Mutation::UiScaleFactor(3.0),
            Mutation::UiViewPosition(IntCoords::new(12, -4)),
        ]
    );
}

#[test]
fn ui_authoritative_offset_only_scrolls() {
    let ui = ui_geom(100, 80, 1.0, 0, 0);
    let canvas = canvas_geom(100, 80, 1.0, 7, 9);
    assert_eq!(
        plan(SyncDirection::UiAuthoritative, &ui, &canvas),
        vec![Mutation::UiViewPosition(IntCoords::new(7, 9))]
    );
}

#[test]
fn zoom_comparison_is_exact() {
    let ui = ui_geom(10, 10, 0.1 + 0.2, 0, 0);
    let canvas = canvas_geom(10, 10, 0.3, 0, 0);
    let deltas = Deltas::between(&ui, &canvas);
    assert!(deltas.zoom);
    assert!(!deltas.size);
    assert!(!deltas.offset);
}

#[test]
fn zoom_center_uses_ui_offset_size_and_zoom() {
    let center = zoom_center(&ui_geom(200, 100, 2.0, 50, 10));
    assert_eq!(center, RealCoords::new(75.0, 30.0));
}

// =============================================================
// Geometry readers
// =============================================================

#[test]
fn canvas_geometry_offset_is_negated_origin_position() {
    let mut canvas = PanZoomCanvas::new();
    canvas.set_viewport_size(100, 100);
    canvas.set_zoom(2.0, RealCoords::new(40.0, 30.0));
    let geom = CanvasGeometry::read(&canvas);
    assert_eq!(geom.size, Extent::new(100, 100));
    assert_eq!(geom.zoom, 2.0);
    // origin = (40 - 25, 30 - 25) → data (0,0) sits at panel (-30, -10).
    assert_eq!(geom.offset, IntCoords::new(30, 10));
}

// =============================================================
// sync
// =============================================================

#[test]
fn canvas_sync_converges_both_directions() {
    let sync = ViewportSynchronizer::new();
    let mut ui = CountingUi::new(Extent::new(200, 100), IntCoords::new(30, 20), 2.0);
    let mut canvas = CountingCanvas::new();

    let applied = sync.sync(SyncDirection::CanvasAuthoritative, &mut ui, &mut canvas).unwrap();
    assert_eq!(applied.len(), 3);
    assert_eq!(canvas.calls, 2);
    assert_eq!(ui.calls, 0);

    let ui_geom = UiGeometry::read(&ui);
    let canvas_geom = CanvasGeometry::read(&canvas);
    assert!(Deltas::between(&ui_geom, &canvas_geom).is_empty());
}

#[test]
fn repeated_sync_makes_no_further_mutations() {
    let sync = ViewportSynchronizer::new();
    let mut ui = CountingUi::new(Extent::new(64, 48), IntCoords::new(8, 4), 1.5);
    let mut canvas = CountingCanvas::new();

    sync.sync(SyncDirection::CanvasAuthoritative, &mut ui, &mut canvas).unwrap();
    sync.sync(SyncDirection::UiAuthoritative, &mut ui, &mut canvas).unwrap();
    let (ui_calls, canvas_calls) = (ui.calls, canvas.calls);

    for direction in [SyncDirection::CanvasAuthoritative, SyncDirection::UiAuthoritative] {
        assert!(sync.sync(direction, &mut ui, &mut canvas).unwrap().is_empty());
        assert!(sync.sync(direction, &mut ui, &mut canvas).unwrap().is_empty());
    }
    assert_eq!(ui.calls, ui_calls);
    assert_eq!(canvas.calls, canvas_calls);
}

#[test]
fn ui_sync_copies_canvas_zoom_and_offset() {
    let sync = ViewportSynchronizer::new();
    let mut ui = CountingUi::new(Extent::new(100, 100), IntCoords::default(), 1.0);
    let mut canvas = CountingCanvas::new();
    canvas.inner.set_viewport_size(100, 100);
    canvas.inner.set_zoom(2.0, RealCoords::new(40.0, 30.0));

    sync.sync(SyncDirection::UiAuthoritative, &mut ui, &mut canvas).unwrap();
    assert_eq!(ui.scale_factor(), 2.0);
    assert_eq!(ui.view_position(), IntCoords::new(30, 10));
    assert_eq!(canvas.calls, 0);

    let again = sync.sync(SyncDirection::UiAuthoritative, &mut ui, &mut canvas).unwrap();
    assert!(again.is_empty());
}

#[test]
fn ui_sync_after_canvas_resize_settles() {
    let sync = ViewportSynchronizer::new();
    let mut ui = CountingUi::new(Extent::new(64, 48), IntCoords::default(), 1.0);
    let mut canvas = CountingCanvas::new();
    canvas.inner.set_viewport_size(100, 80);

    let first = sync.sync(SyncDirection::UiAuthoritative, &mut ui, &mut canvas).unwrap();
    assert_eq!(first, vec![Mutation::UiViewSize(Extent::new(100, 80))]);
    assert_eq!(ui.calls, 1);

    assert!(sync.sync(SyncDirection::UiAuthoritative, &mut ui, &mut canvas).unwrap().is_empty());
    assert_eq!(ui.calls, 1);
    assert_eq!(canvas.calls, 0);
    // The extent is left to layout.
    assert_eq!(ui.extent_size(), Extent::new(64, 48));
}

#[test]
fn ui_deltas_compare_view_size_not_extent() {
    let mut ui = ui_geom(64, 48, 1.0, 0, 0);
    ui.view_size = Extent::new(100, 80);
    let canvas = canvas_geom(100, 80, 1.0, 0, 0);
    assert!(Deltas::toward(SyncDirection::UiAuthoritative, &ui, &canvas).is_empty());
    assert!(Deltas::toward(SyncDirection::CanvasAuthoritative, &ui, &canvas).size);
    assert!(plan(SyncDirection::UiAuthoritative, &ui, &canvas).is_empty());
}

#[test]
fn sync_off_dispatch_thread_fails_without_mutating() {
    let sync = ViewportSynchronizer::new();
    let handle = thread::Builder::new()
        .name("render-worker".into())
        .spawn(move || {
            let mut ui = CountingUi::new(Extent::new(10, 10), IntCoords::new(1, 1), 2.0);
            let mut canvas = CountingCanvas::new();
            let result = sync.sync(SyncDirection::CanvasAuthoritative, &mut ui, &mut canvas);
            (result.map_err(|e| e.to_string()), ui.calls, canvas.calls)
        })
        .unwrap();
    let (result, ui_calls, canvas_calls) = handle.join().unwrap();
    let err = result.unwrap_err();
    assert!(err.contains("render-worker"), "{err}");
    assert_eq!(ui_calls, 0);
    assert_eq!(canvas_calls, 0);
}

#[test]
fn dispatch_thread_check_passes_on_owner() {
    let dispatch = DispatchThread::current();
    assert!(dispatch.is_dispatch_thread());
    assert!(dispatch.check().is_ok());
}

// =============================================================
// Auto-resize
// =============================================================

fn zoomed_canvas(zoom: f64) -> PanZoomCanvas {
    let mut canvas = PanZoomCanvas::new();
    canvas.set_viewport_size(400, 300);
    canvas.set_zoom(zoom, RealCoords::new(100.0, 75.0));
    canvas
}

#[test]
fn projection_within_workspace_fits() {
    let canvas = zoomed_canvas(2.0);
    let extents = RealRect::new(0.0, 0.0, 350.0, 250.0); // 700 x 500 on screen
    assert!(fits_workspace(&canvas, extents, Extent::new(800, 600)));
}

#[test]
fn projection_wider_than_workspace_does_not_fit() {
    let canvas = zoomed_canvas(2.0);
    let extents = RealRect::new(0.0, 0.0, 450.0, 250.0); // 900 x 500 on screen
    assert!(!fits_workspace(&canvas, extents, Extent::new(800, 600)));
}

#[test]
fn projection_taller_than_workspace_does_not_fit() {
    let canvas = zoomed_canvas(2.0);
    let extents = RealRect::new(0.0, 0.0, 350.0, 301.0);
    assert!(!fits_workspace(&canvas, extents, Extent::new(800, 600)));
}
