//! Figure views: the pairing of each data view with the figure that draws it.
//!
//! DESIGN
//! ======
//! The registry is an ordered list of [`FigureView`]s, one per data view of a
//! kind we can draw. `rebuild` reconciles it with the display's membership:
//! new views get a figure, views that left the display have theirs disposed.
//! A figure view holds only ids; the data view is looked up in the display
//! and the figure in the drawing on every use.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::mem;

use crate::dataset::Axis;
use crate::display::ImageDisplay;
use crate::figure::{Drawing, DrawingView, Figure, FigureId, FigureShape};
use crate::geometry::IntCoords;
use crate::view::{DataView, DataViewId, DataViewKind, DatasetView, Overlay};

/// Which kind of data view a figure view renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureViewKind {
    Dataset,
    Overlay,
}

/// A data view paired with the figure that draws it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureView {
    view: DataViewId,
    figure: FigureId,
    kind: FigureViewKind,
}

impl FigureView {
    /// Create the image figure for a dataset view.
    pub fn for_dataset(view: DataViewId, dataset: &DatasetView, drawing: &mut Drawing) -> Self {
        let figure = drawing.add(dataset_figure(dataset));
        Self { view, figure, kind: FigureViewKind::Dataset }
    }

    /// Create the shape figure for an overlay view.
    pub fn for_overlay(view: &DataView, overlay: &Overlay, display: &ImageDisplay, drawing: &mut Drawing) -> Self {
        let figure = drawing.add(overlay_figure(view, overlay, display));
        Self { view: view.id(), figure, kind: FigureViewKind::Overlay }
    }

    /// Wrap a figure a creation tool has already drawn.
    #[must_use]
    pub fn wrap_overlay(view: DataViewId, figure: FigureId) -> Self {
        Self { view, figure, kind: FigureViewKind::Overlay }
    }

    #[must_use]
    pub fn view(&self) -> DataViewId {
        self.view
    }

    #[must_use]
    pub fn figure(&self) -> FigureId {
        self.figure
    }

    #[must_use]
    pub fn kind(&self) -> FigureViewKind {
        self.kind
    }

    /// Push the data view's current state into the figure. Returns whether
    /// the figure changed.
    pub fn update(&self, display: &ImageDisplay, drawing: &mut Drawing) -> bool {
        let Some(view) = display.get(self.view) else {
            return false;
        };
        let figure = match view.kind() {
            DataViewKind::Dataset(ds) => dataset_figure(ds),
            DataViewKind::Overlay(overlay) => overlay_figure(view, overlay, display),
            DataViewKind::Other { .. } => return false,
        };
        drawing.replace(self.figure, figure)
    }

    /// Remove the figure from the drawing. Consumes the figure view.
    pub fn dispose(self, drawing: &mut DrawingView) {
        tracing::trace!(view = %self.view, figure = %self.figure, "disposing figure view");
        if drawing.remove_figure(self.figure).is_none() {
            tracing::warn!(figure = %self.figure, "figure already gone from drawing");
        }
    }
}

fn dataset_figure(dataset: &DatasetView) -> Figure {
    Figure::new(FigureShape::Image { origin: IntCoords::default(), image: dataset.screen_image.clone() }, 0)
}

fn overlay_figure(view: &DataView, overlay: &Overlay, display: &ImageDisplay) -> Figure {
    let mut figure = Figure::new(FigureShape::from(overlay.shape), overlay.stroke).with_fill(overlay.fill);
    figure.visible = on_current_plane(view, display);
    figure
}

/// An overlay pinned to a different slice than the display is showing is hidden.
fn on_current_plane(view: &DataView, display: &ImageDisplay) -> bool {
    display
        .axes()
        .iter()
        .filter(|axis| !axis.is_xy())
        .all(|&axis: &Axis| view.position(axis).is_none_or(|p| p == display.position(axis)))
}

/// Outcome of a [`FigureViewRegistry::rebuild`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RebuildReport {
    pub created: usize,
    pub disposed: usize,
    /// Views of a kind with no figure representation.
    pub skipped: usize,
}

/// Ordered figure views for one canvas.
#[derive(Debug, Clone, Default)]
pub struct FigureViewRegistry {
    views: Vec<FigureView>,
}

impl FigureViewRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The figure view for `view`, if any.
    #[must_use]
    pub fn find(&self, view: DataViewId) -> Option<&FigureView> {
        self.views.iter().find(|fv| fv.view == view)
    }

    /// The figure view drawing `figure`, if any.
    #[must_use]
    pub fn find_by_figure(&self, figure: FigureId) -> Option<&FigureView> {
        self.views.iter().find(|fv| fv.figure == figure)
    }

    /// Append a figure view.
    pub fn register(&mut self, figure_view: FigureView) {
        self.views.push(figure_view);
    }

    /// Figure views in paint order.
    pub fn iter(&self) -> impl Iterator<Item = &FigureView> {
        self.views.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Create figure views for new data views and dispose those whose data
    /// view has left the display. Survivors keep their relative order.
    pub fn rebuild(&mut self, display: &ImageDisplay, drawing: &mut DrawingView) -> RebuildReport {
        let mut report = RebuildReport::default();

        for view in display.iter() {
            if self.find(view.id()).is_some() {
                continue;
            }
            let figure_view = match view.kind() {
                DataViewKind::Dataset(ds) => FigureView::for_dataset(view.id(), ds, drawing.drawing_mut()),
                DataViewKind::Overlay(overlay) => {
                    FigureView::for_overlay(view, overlay, display, drawing.drawing_mut())
                }
                DataViewKind::Other { type_name } => {
                    tracing::error!(view = %view.id(), kind = %type_name, "don't know how to make a figure view");
                    report.skipped += 1;
                    continue;
                }
            };
            self.views.push(figure_view);
            report.created += 1;
        }

        let (live, stale): (Vec<_>, Vec<_>) =
            mem::take(&mut self.views).into_iter().partition(|fv| display.contains(fv.view));
        self.views = live;
        for figure_view in stale {
            figure_view.dispose(drawing);
            report.disposed += 1;
        }

        if report != RebuildReport::default() {
            let display_id = display.id();
            tracing::debug!(
                display = %display_id,
                created = report.created,
                disposed = report.disposed,
                skipped = report.skipped,
                "figure views rebuilt"
            );
        }
        report
    }

    /// Push every data view's state into its figure. Returns how many figures changed.
    pub fn update(&self, display: &ImageDisplay, drawing: &mut Drawing) -> usize {
        self.views.iter().filter(|fv| fv.update(display, drawing)).count()
    }

    /// Dispose every figure view.
    pub fn dispose_all(&mut self, drawing: &mut DrawingView) {
        for figure_view in mem::take(&mut self.views) {
            figure_view.dispose(drawing);
        }
    }
}
