use super::*;
use crate::dataset::Axis;
use crate::event::EventBus;
use crate::raster::rgb;
use crate::view::DataViewKind;

fn display() -> ImageDisplay {
    ImageDisplay::new("tools", &[Axis::X, Axis::Y], EventBus::new())
}

fn rect_tool() -> ShapeTool {
    ShapeTool::new("rectangle", ShapeKind::Rectangle, rgb(255, 255, 0))
}

// --- Activation ---

#[test]
fn creation_capable_tool_installs_creation_tool() {
    let d = display();
    let (listener, _rx) = CreationListener::channel();
    let mut delegator = ToolDelegator::new();
    assert!(delegator.activate(&rect_tool(), &d, listener));
    assert!(delegator.is_creating());
    assert_eq!(delegator.creation_tool().unwrap().display(), d.id());
}

#[test]
fn plain_tool_clears_creation_tool() {
    let d = display();
    let mut delegator = ToolDelegator::new();
    let (listener, _rx) = CreationListener::channel();
    delegator.activate(&rect_tool(), &d, listener);

    let (listener, _rx) = CreationListener::channel();
    assert!(!delegator.activate(&PanTool, &d, listener));
    assert!(delegator.creation_tool().is_none());
}

#[test]
fn tools_report_names_and_cursors() {
    assert_eq!(PanTool.name(), "pan");
    assert_eq!(PanTool.cursor(), CursorKind::Hand);
    assert!(PanTool.overlay_adapter().is_none());
    assert_eq!(rect_tool().name(), "rectangle");
    assert_eq!(rect_tool().cursor(), CursorKind::Crosshair);
}

// --- Drawing ---

#[test]
fn draw_adds_selected_figure_and_notifies_listener() {
    let d = display();
    let (listener, rx) = CreationListener::channel();
    let mut creation = rect_tool().creation_tool(&d, listener);
    let mut drawing = DrawingView::new();

    let outcome = creation.draw(RealCoords::new(6.0, 1.0), RealCoords::new(2.0, 4.0), &mut drawing);
    assert!(drawing.drawing().contains(outcome.figure));
    assert!(drawing.is_selected(outcome.figure));
    let selection = outcome.selection.unwrap();
    assert!(selection.old_selection.is_empty());

    let created = rx.try_recv().unwrap();
    assert_eq!(created.figure, outcome.figure);
    let DataViewKind::Overlay(overlay) = created.overlay.kind() else {
        panic!("created view is not an overlay");
    };
    assert_eq!(overlay.shape, OverlayShape::Rectangle(RealRect::new(2.0, 1.0, 4.0, 3.0)));
    assert_eq!(overlay.axes(), &[Axis::X, Axis::Y]);
}

#[test]
fn draw_without_selecting_leaves_selection_alone() {
    let d = display();
    let (listener, _rx) = CreationListener::channel();
    let mut creation = rect_tool().without_selecting().creation_tool(&d, listener);
    let mut drawing = DrawingView::new();
    let outcome = creation.draw(RealCoords::new(0.0, 0.0), RealCoords::new(1.0, 1.0), &mut drawing);
    assert!(outcome.selection.is_none());
    assert!(drawing.selected_figures().is_empty());
}

#[test]
fn draw_with_closed_listener_still_draws() {
    let d = display();
    let (listener, rx) = CreationListener::channel();
    drop(rx);
    let mut creation = ShapeTool::new("dot", ShapeKind::Point, rgb(1, 2, 3)).creation_tool(&d, listener);
    let mut drawing = DrawingView::new();
    let outcome = creation.draw(RealCoords::new(0.0, 0.0), RealCoords::new(3.0, 3.0), &mut drawing);
    assert!(drawing.drawing().contains(outcome.figure));
}

#[test]
fn fill_carries_into_figure_and_overlay() {
    let d = display();
    let (listener, rx) = CreationListener::channel();
    let tool = ShapeTool::new("oval", ShapeKind::Ellipse, rgb(0, 0, 0)).with_fill(rgb(9, 9, 9));
    let mut creation = tool.creation_tool(&d, listener);
    let mut drawing = DrawingView::new();
    let outcome = creation.draw(RealCoords::new(0.0, 0.0), RealCoords::new(4.0, 4.0), &mut drawing);
    assert_eq!(drawing.drawing().get(outcome.figure).unwrap().fill, Some(rgb(9, 9, 9)));
    let created = rx.try_recv().unwrap();
    let DataViewKind::Overlay(overlay) = created.overlay.kind() else {
        panic!("created view is not an overlay");
    };
    assert_eq!(overlay.fill, Some(rgb(9, 9, 9)));
}

#[test]
fn shape_kinds_span_drag() {
    let (a, b) = (RealCoords::new(1.0, 1.0), RealCoords::new(3.0, 2.0));
    assert_eq!(ShapeKind::Line.between(a, b), OverlayShape::Line { from: a, to: b });
    assert_eq!(ShapeKind::Point.between(a, b), OverlayShape::Point(b));
    assert_eq!(ShapeKind::Ellipse.between(b, a), OverlayShape::Ellipse(RealRect::new(1.0, 1.0, 2.0, 1.0)));
}
