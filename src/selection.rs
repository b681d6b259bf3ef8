//! Selection bridge between data-view flags and the drawing view's native
//! selection.
//!
//! DESIGN
//! ======
//! Either side can change first. A data view flipping its flag adds or
//! removes its figure from the native selection; a native selection change
//! sets the flag of every data view whose figure entered or left it. Both
//! directions act only on real changes, so the echo each side produces finds
//! nothing left to do and the pair settles after one round trip.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::display::ImageDisplay;
use crate::figure::{DrawingView, FigureSelectionEvent};
use crate::registry::FigureViewRegistry;
use crate::view::DataViewId;

/// A data view was selected: add its figure to the native selection.
///
/// Returns the native selection change, if there was one.
pub fn on_view_selected(
    registry: &FigureViewRegistry,
    view: DataViewId,
    drawing: &mut DrawingView,
) -> Option<FigureSelectionEvent> {
    let figure = registry.find(view)?.figure();
    if drawing.is_selected(figure) {
        return None;
    }
    drawing.add_to_selection(figure)
}

/// A data view was deselected: drop its figure from the native selection.
pub fn on_view_deselected(
    registry: &FigureViewRegistry,
    view: DataViewId,
    drawing: &mut DrawingView,
) -> Option<FigureSelectionEvent> {
    let figure = registry.find(view)?.figure();
    if !drawing.is_selected(figure) {
        return None;
    }
    drawing.remove_from_selection(figure)
}

/// The native selection changed: mirror it onto data-view flags.
///
/// Views whose figure is in the new selection are selected; views whose
/// figure was only in the old one are deselected. Returns how many flags
/// actually flipped.
pub fn on_figure_selection_changed(
    event: &FigureSelectionEvent,
    registry: &FigureViewRegistry,
    display: &mut ImageDisplay,
) -> usize {
    let mut flipped = 0;
    for view in display.view_ids() {
        let Some(figure_view) = registry.find(view) else {
            continue;
        };
        let figure = figure_view.figure();
        let changed = if event.new_selection.contains(&figure) {
            display.set_selected(view, true)
        } else if event.old_selection.contains(&figure) {
            display.set_selected(view, false)
        } else {
            false
        };
        if changed {
            flipped += 1;
        }
    }
    if flipped > 0 {
        let display_id = display.id();
        tracing::debug!(display = %display_id, flipped, "mirrored native selection onto views");
    }
    flipped
}
