//! Viewport synchronizer: keeps the UI viewport and the canvas model in step.
//!
//! DESIGN
//! ======
//! Both sides hold a copy of the same view state (size, scroll offset, zoom)
//! and either can change first. A sync pass reads both geometries, computes
//! which of the three quantities disagree, and copies them from whichever side
//! is authoritative for the triggering event:
//!
//! - viewport resize / scrollbar adjustment → [`SyncDirection::CanvasAuthoritative`]
//! - canvas pan/zoom change → [`SyncDirection::UiAuthoritative`]
//!
//! [`plan`] is the whole decision as a pure function; [`apply`] performs the
//! mutations. Applying a plan makes the two geometries agree, so the pan/zoom
//! event the canvas emits in response leads to an empty plan rather than a
//! second round of mutations.
//!
//! Zoom factors are compared with exact `==`, the same comparison the canvas
//! model uses to decide whether its zoom changed.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::thread::{self, ThreadId};

use crate::canvas::ImageCanvas;
use crate::geometry::{Extent, IntCoords, RealCoords, RealRect};
use crate::ui::ViewportUi;

// =============================================================================
// TYPES
// =============================================================================

/// Which side wins a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirection {
    /// Copy UI geometry into the canvas model.
    CanvasAuthoritative,
    /// Copy canvas geometry into the UI.
    UiAuthoritative,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Sync was invoked from a thread other than the UI dispatch thread.
    #[error("cannot sync viewport from thread: {thread}")]
    WrongThread { thread: String },

    /// A zoom scale that is zero, negative, or not finite.
    #[error("invalid zoom scale: {scale}")]
    InvalidScale { scale: f64 },
}

/// Viewport geometry as read from the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiGeometry {
    pub size: Extent,
    /// Size of the scrollable view, as last set from the canvas.
    pub view_size: Extent,
    pub zoom: f64,
    pub offset: IntCoords,
}

impl UiGeometry {
    #[must_use]
    pub fn read(ui: &dyn ViewportUi) -> Self {
        Self {
            size: ui.extent_size(),
            view_size: ui.view_size(),
            zoom: ui.scale_factor(),
            offset: ui.view_position(),
        }
    }
}

/// Viewport geometry as read from the canvas model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    pub size: Extent,
    pub zoom: f64,
    /// Scroll offset equivalent: the data origin's panel position, negated.
    pub offset: IntCoords,
}

impl CanvasGeometry {
    #[must_use]
    pub fn read(canvas: &dyn ImageCanvas) -> Self {
        Self {
            size: Extent::new(canvas.viewport_width(), canvas.viewport_height()),
            zoom: canvas.zoom_factor(),
            offset: canvas.data_to_panel(RealCoords::default()).negated(),
        }
    }
}

/// Which quantities disagree between the two geometries.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deltas {
    pub size: bool,
    pub offset: bool,
    pub zoom: bool,
}

impl Deltas {
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn between(ui: &UiGeometry, canvas: &CanvasGeometry) -> Self {
        Self { size: ui.size != canvas.size, offset: ui.offset != canvas.offset, zoom: ui.zoom != canvas.zoom }
    }

    /// The deltas a pass in `direction` acts on. A UI-authoritative pass
    /// writes the UI's view size, not its extent, so its size delta compares
    /// the view size.
    #[must_use]
    pub fn toward(direction: SyncDirection, ui: &UiGeometry, canvas: &CanvasGeometry) -> Self {
        let deltas = Self::between(ui, canvas);
        match direction {
            SyncDirection::CanvasAuthoritative => deltas,
            SyncDirection::UiAuthoritative => Self { size: ui.view_size != canvas.size, ..deltas },
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.size || self.offset || self.zoom)
    }
}

/// One side effect of a sync pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mutation {
    /// Resize the canvas viewport.
    CanvasViewportSize(Extent),
    /// Zoom the canvas about a data-space center.
    CanvasZoom { factor: f64, center: RealCoords },
    /// Fit the window to the content if it now fits the workspace.
    AutoResize,
    /// Resize the UI's scrollable view.
    UiViewSize(Extent),
    /// Set the UI drawing view's scale.
    UiScaleFactor(f64),
    /// Scroll the UI.
    UiViewPosition(IntCoords),
}

// =============================================================================
// PLAN / APPLY
// =============================================================================

/// Decide what a sync pass must change. Empty when the geometries agree.
#[must_use]
pub fn plan(direction: SyncDirection, ui: &UiGeometry, canvas: &CanvasGeometry) -> Vec<Mutation> {
    let deltas = Deltas::toward(direction, ui, canvas);
    let mut mutations = Vec::new();
    if deltas.is_empty() {
        return mutations;
    }

    match direction {
        SyncDirection::CanvasAuthoritative => {
            if deltas.size {
                mutations.push(Mutation::CanvasViewportSize(ui.size));
            }
            if deltas.offset || deltas.zoom {
                mutations.push(Mutation::CanvasZoom { factor: ui.zoom, center: zoom_center(ui) });
            }
            if deltas.zoom {
                mutations.push(Mutation::AutoResize);
            }
        }
        SyncDirection::UiAuthoritative => {
            if deltas.size {
                mutations.push(Mutation::UiViewSize(canvas.size));
            }
            if deltas.zoom {
                mutations.push(Mutation::UiScaleFactor(canvas.zoom));
            }
            if deltas.offset {
                mutations.push(Mutation::UiViewPosition(canvas.offset));
            }
        }
    }
    mutations
}

/// Data-space point at the center of the UI viewport, from the UI's own
/// offset, size, and zoom.
#[must_use]
pub fn zoom_center(ui: &UiGeometry) -> RealCoords {
    RealCoords::new(
        (f64::from(ui.offset.x) + f64::from(ui.size.width) / 2.0) / ui.zoom,
        (f64::from(ui.offset.y) + f64::from(ui.size.height) / 2.0) / ui.zoom,
    )
}

/// Perform `mutations` in order. [`Mutation::AutoResize`] is left to the
/// caller, which owns the window; returns whether one was requested.
pub fn apply(mutations: &[Mutation], ui: &mut dyn ViewportUi, canvas: &mut dyn ImageCanvas) -> bool {
    let mut resize = false;
    for mutation in mutations {
        match *mutation {
            Mutation::CanvasViewportSize(size) => canvas.set_viewport_size(size.width, size.height),
            Mutation::CanvasZoom { factor, center } => canvas.set_zoom(factor, center),
            Mutation::AutoResize => resize = true,
            Mutation::UiViewSize(size) => ui.set_view_size(size),
            Mutation::UiScaleFactor(scale) => ui.set_scale_factor(scale),
            Mutation::UiViewPosition(position) => ui.set_view_position(position),
        }
    }
    resize
}

/// Whether `extents`, projected through the canvas at its current zoom, fit
/// inside `workspace` on both axes.
#[must_use]
pub fn fits_workspace(canvas: &dyn ImageCanvas, extents: RealRect, workspace: Extent) -> bool {
    let top_left = canvas.data_to_panel(extents.origin());
    let bottom_right = canvas.data_to_panel(extents.far_corner());
    Extent::new(bottom_right.x - top_left.x, bottom_right.y - top_left.y).fits_within(workspace)
}

// =============================================================================
// SYNCHRONIZER
// =============================================================================

/// Identifies the UI dispatch thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchThread {
    id: ThreadId,
}

impl DispatchThread {
    /// Designate the calling thread.
    #[must_use]
    pub fn current() -> Self {
        Self { id: thread::current().id() }
    }

    #[must_use]
    pub fn is_dispatch_thread(&self) -> bool {
        thread::current().id() == self.id
    }

    /// Fail with `WrongThread` when called off the dispatch thread.
    ///
    /// # Errors
    ///
    /// Returns `WrongThread` naming the calling thread.
    pub fn check(&self) -> Result<(), SyncError> {
        if self.is_dispatch_thread() {
            return Ok(());
        }
        let current = thread::current();
        let thread = match current.name() {
            Some(name) => name.to_string(),
            None => format!("{:?}", current.id()),
        };
        Err(SyncError::WrongThread { thread })
    }
}

/// Runs sync passes on the designated dispatch thread.
#[derive(Debug, Clone, Copy)]
pub struct ViewportSynchronizer {
    dispatch: DispatchThread,
}

impl ViewportSynchronizer {
    /// A synchronizer bound to the calling thread.
    #[must_use]
    pub fn new() -> Self {
        Self { dispatch: DispatchThread::current() }
    }

    #[must_use]
    pub fn with_dispatch_thread(dispatch: DispatchThread) -> Self {
        Self { dispatch }
    }

    /// Reconcile `ui` and `canvas`, copying from the authoritative side.
    ///
    /// Returns the mutations that were applied (empty when already in sync).
    /// A returned [`Mutation::AutoResize`] has not been acted on.
    ///
    /// # Errors
    ///
    /// Returns `WrongThread` without touching either side when called off
    /// the dispatch thread.
    pub fn sync(
        &self,
        direction: SyncDirection,
        ui: &mut dyn ViewportUi,
        canvas: &mut dyn ImageCanvas,
    ) -> Result<Vec<Mutation>, SyncError> {
        self.dispatch.check()?;

        let ui_geom = UiGeometry::read(ui);
        let canvas_geom = CanvasGeometry::read(canvas);
        let mutations = plan(direction, &ui_geom, &canvas_geom);
        if mutations.is_empty() {
            return Ok(mutations);
        }

        let deltas = Deltas::toward(direction, &ui_geom, &canvas_geom);
        tracing::debug!(
            ?direction,
            ui_size = ?ui_geom.size,
            ui_view_size = ?ui_geom.view_size,
            ui_offset = ?ui_geom.offset,
            ui_zoom = ui_geom.zoom,
            canvas_size = ?canvas_geom.size,
            canvas_offset = ?canvas_geom.offset,
            canvas_zoom = canvas_geom.zoom,
            size_changed = deltas.size,
            offset_changed = deltas.offset,
            zoom_changed = deltas.zoom,
            "viewport sync"
        );

        apply(&mutations, ui, canvas);
        Ok(mutations)
    }
}

impl Default for ViewportSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}
