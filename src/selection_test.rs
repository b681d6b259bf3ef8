use super::*;
use crate::dataset::Axis;
use crate::event::{DisplayEvent, EventBus};
use crate::geometry::RealRect;
use crate::raster::rgb;
use crate::view::{DataView, Overlay, OverlayShape};

// =============================================================
// Helpers
// =============================================================

struct Fixture {
    bus: EventBus,
    display: ImageDisplay,
    registry: FigureViewRegistry,
    drawing: DrawingView,
    views: Vec<DataViewId>,
}

fn fixture(count: usize) -> Fixture {
    let bus = EventBus::new();
    let mut display = ImageDisplay::new("sel", &[Axis::X, Axis::Y], bus.clone());
    #[allow(clippy::cast_precision_loss)]
    let views = (0..count)
        .map(|i| {
            display.add(DataView::overlay(Overlay::planar(
                OverlayShape::Rectangle(RealRect::new(i as f64 * 4.0, 0.0, 2.0, 2.0)),
                rgb(0, 255, 0),
                None,
            )))
        })
        .collect();
    let mut drawing = DrawingView::new();
    let mut registry = FigureViewRegistry::new();
    registry.rebuild(&display, &mut drawing);
    Fixture { bus, display, registry, drawing, views }
}

impl Fixture {
    fn figure(&self, view: DataViewId) -> crate::figure::FigureId {
        self.registry.find(view).unwrap().figure()
    }

    /// Route display selection events into the bridge until nothing moves,
    /// the way the canvas does.
    fn settle(&mut self, sub: &crate::event::Subscription, first: Option<FigureSelectionEvent>) {
        let mut pending: Vec<FigureSelectionEvent> = first.into_iter().collect();
        loop {
            for event in pending.drain(..) {
                on_figure_selection_changed(&event, &self.registry, &mut self.display);
            }
            let events = sub.drain();
            if events.is_empty() {
                break;
            }
            for event in events {
                let native = match event {
                    DisplayEvent::DataViewSelected { view, .. } => {
                        on_view_selected(&self.registry, view, &mut self.drawing)
                    }
                    DisplayEvent::DataViewDeselected { view, .. } => {
                        on_view_deselected(&self.registry, view, &mut self.drawing)
                    }
                    _ => None,
                };
                pending.extend(native);
            }
        }
    }

    fn assert_agree(&self) {
        for &view in &self.views {
            let flag = self.display.get(view).unwrap().is_selected();
            assert_eq!(flag, self.drawing.is_selected(self.figure(view)), "view {view} disagrees");
        }
    }
}

// =============================================================
// View → native
// =============================================================

#[test]
fn selecting_view_selects_its_figure() {
    let mut f = fixture(2);
    let event = on_view_selected(&f.registry, f.views[0], &mut f.drawing).unwrap();
    assert!(event.old_selection.is_empty());
    assert!(event.new_selection.contains(&f.figure(f.views[0])));
    assert!(f.drawing.is_selected(f.figure(f.views[0])));
    assert!(!f.drawing.is_selected(f.figure(f.views[1])));
}

#[test]
fn selecting_already_selected_figure_is_noop() {
    let mut f = fixture(1);
    on_view_selected(&f.registry, f.views[0], &mut f.drawing);
    assert!(on_view_selected(&f.registry, f.views[0], &mut f.drawing).is_none());
}

#[test]
fn deselecting_unselected_figure_is_noop() {
    let mut f = fixture(1);
    assert!(on_view_deselected(&f.registry, f.views[0], &mut f.drawing).is_none());
}

#[test]
fn unknown_view_changes_nothing() {
    let mut f = fixture(1);
    assert!(on_view_selected(&f.registry, uuid::Uuid::new_v4(), &mut f.drawing).is_none());
    assert!(f.drawing.selected_figures().is_empty());
}

// =============================================================
// Native → view
// =============================================================

#[test]
fn native_selection_sets_and_clears_flags() {
    let mut f = fixture(3);
    let sub = f.bus.subscribe();
    let event = f.drawing.set_selection([f.figure(f.views[0]), f.figure(f.views[2])]).unwrap();
    assert_eq!(on_figure_selection_changed(&event, &f.registry, &mut f.display), 2);
    assert_eq!(f.display.selected_ids(), vec![f.views[0], f.views[2]]);
    assert_eq!(sub.drain().len(), 2);

    let event = f.drawing.remove_from_selection(f.figure(f.views[0])).unwrap();
    assert_eq!(on_figure_selection_changed(&event, &f.registry, &mut f.display), 1);
    assert_eq!(f.display.selected_ids(), vec![f.views[2]]);
}

#[test]
fn replaying_native_event_flips_nothing() {
    let mut f = fixture(2);
    let event = f.drawing.add_to_selection(f.figure(f.views[1])).unwrap();
    on_figure_selection_changed(&event, &f.registry, &mut f.display);
    assert_eq!(on_figure_selection_changed(&event, &f.registry, &mut f.display), 0);
}

// =============================================================
// Convergence
// =============================================================

#[test]
fn external_then_native_changes_converge() {
    let mut f = fixture(3);
    let sub = f.bus.subscribe();

    // Select two views from outside the canvas.
    f.display.set_selected(f.views[0], true);
    f.display.set_selected(f.views[1], true);
    f.settle(&sub, None);
    f.assert_agree();
    assert_eq!(f.drawing.selected_figures().len(), 2);

    // Deselect one natively.
    let native = f.drawing.remove_from_selection(f.figure(f.views[0]));
    assert!(native.is_some());
    f.settle(&sub, native);
    f.assert_agree();
    assert_eq!(f.display.selected_ids(), vec![f.views[1]]);
    assert!(sub.drain().is_empty());
}
