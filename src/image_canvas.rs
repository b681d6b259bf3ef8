//! Figure canvas: the viewer-side owner of the drawing, the scroll pane, and
//! the figure views for one display.
//!
//! DESIGN
//! ======
//! `FigureCanvas` is the orchestrator. It never owns the display; every
//! operation that reads or changes display state borrows it, and events
//! for other displays or canvases are ignored. Display-side changes arrive
//! as [`DisplayEvent`]s on the canvas's [`Subscription`] and are handled in
//! [`FigureCanvas::process_events`]; UI-side changes (viewport resize,
//! scrolling, drawing-view zoom, native selection, pointer drags) enter
//! through the `on_*`, `select_figures` and `draw_with_active_tool` methods.
//!
//! Handling one event can publish others (a canvas-authoritative sync makes
//! the canvas announce `PanZoom`, a tool activation changes the cursor), so
//! the pump drains in rounds until the bus is quiet. Every handler acts only
//! on real changes, which keeps the number of rounds small. Selection events
//! are checked against the view's current flag, so a select and deselect
//! queued before one pump are not replayed.
//!
//! Dropping the canvas drops its subscription; a `DisplayDeleted` for its
//! display releases the subscription and disposes every figure view early.

#[cfg(test)]
#[path = "image_canvas_test.rs"]
mod image_canvas_test;

use std::sync::mpsc;

use crate::canvas::{CanvasId, ImageCanvas};
use crate::capture;
use crate::config::CanvasConfig;
use crate::consts::MAX_EVENT_ROUNDS;
use crate::dataset::{Dataset, DatasetError, DatasetFactory};
use crate::display::{DisplayId, ImageDisplay};
use crate::event::{DisplayEvent, Subscription};
use crate::figure::{Drawing, DrawingView, FigureId};
use crate::geometry::{Extent, IntCoords, RealCoords};
use crate::registry::{FigureView, FigureViewRegistry, RebuildReport};
use crate::selection;
use crate::sync::{self, Mutation, SyncDirection, SyncError, ViewportSynchronizer};
use crate::tool::{CreationListener, FigureCreated, Tool, ToolDelegator};
use crate::ui::{ScrollPane, ViewerWindow, ViewportUi};
use crate::view::{DataView, DataViewId};

/// Viewer-side canvas bound to one display.
#[derive(Debug)]
pub struct FigureCanvas<W: ViewerWindow> {
    display: DisplayId,
    canvas: CanvasId,
    config: CanvasConfig,
    drawing_view: DrawingView,
    scroll_pane: ScrollPane,
    delegator: ToolDelegator,
    registry: FigureViewRegistry,
    synchronizer: ViewportSynchronizer,
    window: W,
    subscription: Option<Subscription>,
    listener: CreationListener,
    creations: mpsc::Receiver<FigureCreated>,
}

impl<W: ViewerWindow> FigureCanvas<W> {
    /// Attach a canvas to `display`, subscribe to its bus, and activate
    /// `tool` if one is already active.
    ///
    /// Figure views are not built until the first [`rebuild`](Self::rebuild).
    pub fn new(display: &mut ImageDisplay, tool: Option<&dyn Tool>, window: W, config: CanvasConfig) -> Self {
        let (listener, creations) = CreationListener::channel();
        let mut canvas = Self {
            display: display.id(),
            canvas: display.canvas().id(),
            config,
            drawing_view: DrawingView::new(),
            scroll_pane: ScrollPane::new(),
            delegator: ToolDelegator::new(),
            registry: FigureViewRegistry::new(),
            synchronizer: ViewportSynchronizer::new(),
            window,
            subscription: Some(display.bus().subscribe()),
            listener,
            creations,
        };
        if let Some(tool) = tool {
            canvas.activate_tool(tool, display);
        }
        canvas
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn display_id(&self) -> DisplayId {
        self.display
    }

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    #[must_use]
    pub fn drawing(&self) -> &Drawing {
        self.drawing_view.drawing()
    }

    #[must_use]
    pub fn drawing_view(&self) -> &DrawingView {
        &self.drawing_view
    }

    #[must_use]
    pub fn scroll_pane(&self) -> &ScrollPane {
        &self.scroll_pane
    }

    #[must_use]
    pub fn registry(&self) -> &FigureViewRegistry {
        &self.registry
    }

    #[must_use]
    pub fn delegator(&self) -> &ToolDelegator {
        &self.delegator
    }

    #[must_use]
    pub fn window(&self) -> &W {
        &self.window
    }

    /// Whether the canvas still listens to its display.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    fn owns(&self, display: &ImageDisplay) -> bool {
        if display.id() == self.display {
            return true;
        }
        let foreign = display.id();
        tracing::warn!(canvas_display = %self.display, display = %foreign, "display does not belong to this canvas");
        false
    }

    // =========================================================================
    // FIGURE VIEWS
    // =========================================================================

    /// Reconcile figure views with the display's data views.
    pub fn rebuild(&mut self, display: &ImageDisplay) -> RebuildReport {
        if !self.owns(display) {
            return RebuildReport::default();
        }
        self.registry.rebuild(display, &mut self.drawing_view)
    }

    /// Push data-view state into figures. Returns how many changed.
    pub fn update(&mut self, display: &ImageDisplay) -> usize {
        if !self.owns(display) {
            return 0;
        }
        self.registry.update(display, self.drawing_view.drawing_mut())
    }

    // =========================================================================
    // EVENT PUMP
    // =========================================================================

    /// Handle every queued display event and tool report until none remain.
    /// Returns how many were handled.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` if a pan/zoom event is pumped off the dispatch thread.
    pub fn process_events(&mut self, display: &mut ImageDisplay) -> Result<usize, SyncError> {
        if !self.owns(display) {
            return Ok(0);
        }
        let mut handled = 0;
        for _ in 0..MAX_EVENT_ROUNDS {
            let events = match &self.subscription {
                Some(subscription) => subscription.drain(),
                None => Vec::new(),
            };
            let created: Vec<FigureCreated> = self.creations.try_iter().collect();
            if events.is_empty() && created.is_empty() {
                return Ok(handled);
            }
            for report in created {
                handled += 1;
                self.on_overlay_created(report, display);
            }
            // A failed event does not stop the round; the first error is
            // returned once the rest of the round is handled.
            let mut failed = None;
            for event in events {
                handled += 1;
                match self.handle_event(event, display) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) if failed.is_none() => failed = Some(e),
                    Err(e) => tracing::warn!(error = %e, "further event failed in the same round"),
                }
            }
            if let Some(e) = failed {
                return Err(e);
            }
            if !self.is_subscribed() {
                return Ok(handled);
            }
        }
        tracing::warn!(display = %self.display, rounds = MAX_EVENT_ROUNDS, handled, "event pump did not settle");
        Ok(handled)
    }

    /// Returns false once the display is gone and nothing more should be handled.
    fn handle_event(&mut self, event: DisplayEvent, display: &mut ImageDisplay) -> Result<bool, SyncError> {
        match event {
            DisplayEvent::DataViewSelected { display: id, view } if id == self.display => {
                self.follow_view_flag(view, true, display);
            }
            DisplayEvent::DataViewDeselected { display: id, view } if id == self.display => {
                self.follow_view_flag(view, false, display);
            }
            DisplayEvent::PanZoom { canvas } if canvas == self.canvas => {
                self.synchronizer.sync(SyncDirection::UiAuthoritative, &mut self.scroll_pane, display.canvas_mut())?;
            }
            DisplayEvent::MouseCursor { canvas } if canvas == self.canvas => {
                self.drawing_view.set_cursor(display.canvas().cursor());
            }
            DisplayEvent::ToolActivated { tool } => self.activate_tool(&*tool, display),
            DisplayEvent::DisplayDeleted { display: id } if id == self.display => {
                self.detach();
                return Ok(false);
            }
            _ => {}
        }
        Ok(true)
    }

    /// Move the view's figure in or out of the native selection. The flag
    /// on the data view is authoritative: an event it no longer agrees with
    /// is stale and skipped.
    fn follow_view_flag(&mut self, view: DataViewId, selected: bool, display: &ImageDisplay) {
        if display.get(view).map(DataView::is_selected) != Some(selected) {
            tracing::trace!(%view, selected, "stale selection event skipped");
            return;
        }
        let change = if selected {
            selection::on_view_selected(&self.registry, view, &mut self.drawing_view)
        } else {
            selection::on_view_deselected(&self.registry, view, &mut self.drawing_view)
        };
        if let Some(change) = change {
            tracing::trace!(%view, native = change.new_selection.len(), "native selection follows view");
        }
    }

    fn detach(&mut self) {
        self.subscription = None;
        self.delegator.set_creation_tool(None);
        self.registry.dispose_all(&mut self.drawing_view);
        tracing::debug!(display = %self.display, "display deleted; canvas detached");
    }

    // =========================================================================
    // TOOLS
    // =========================================================================

    /// Make `tool` the active tool: install its creation tool, if any, and
    /// show its cursor.
    pub fn activate_tool(&mut self, tool: &dyn Tool, display: &mut ImageDisplay) {
        if !self.owns(display) {
            return;
        }
        self.delegator.activate(tool, display, self.listener.clone());
        display.canvas_mut().set_cursor(tool.cursor());
    }

    /// Drag from `from` to `to` with the active creation tool. Returns the new
    /// overlay's id, or `None` when the active tool creates nothing.
    pub fn draw_with_active_tool(
        &mut self,
        from: RealCoords,
        to: RealCoords,
        display: &mut ImageDisplay,
    ) -> Option<DataViewId> {
        if !self.owns(display) {
            return None;
        }
        let tool = self.delegator.creation_tool_mut()?;
        let outcome = tool.draw(from, to, &mut self.drawing_view);
        if let Some(change) = outcome.selection {
            selection::on_figure_selection_changed(&change, &self.registry, display);
        }
        let mut created = None;
        for report in self.creations.try_iter().collect::<Vec<_>>() {
            created = Some(self.on_overlay_created(report, display));
        }
        created
    }

    /// Adopt an overlay a creation tool has drawn.
    ///
    /// Non-planar display axes the overlay has no position on take the
    /// display's current position. The overlay is selected if its figure is.
    pub fn on_overlay_created(&mut self, created: FigureCreated, display: &mut ImageDisplay) -> DataViewId {
        let FigureCreated { mut overlay, figure } = created;
        for index in 0..display.num_dimensions() {
            let Some(axis) = display.axis(index) else {
                continue;
            };
            if axis.is_xy() || overlay.has_position(axis) {
                continue;
            }
            overlay.set_position(display.position(axis), axis);
        }
        if self.drawing_view.is_selected(figure) {
            overlay.set_selected(true);
        }

        let view = overlay.id();
        self.registry.register(FigureView::wrap_overlay(view, figure));
        display.add(overlay);
        display.update();
        self.registry.update(display, self.drawing_view.drawing_mut());
        tracing::debug!(display = %self.display, %view, %figure, "overlay created by tool");
        view
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Replace the native selection, mirroring the change onto data views.
    /// Returns how many view flags flipped.
    pub fn select_figures(
        &mut self,
        figures: impl IntoIterator<Item = FigureId>,
        display: &mut ImageDisplay,
    ) -> usize {
        if !self.owns(display) {
            return 0;
        }
        match self.drawing_view.set_selection(figures) {
            Some(change) => selection::on_figure_selection_changed(&change, &self.registry, display),
            None => 0,
        }
    }

    // =========================================================================
    // VIEWPORT
    // =========================================================================

    /// The layout resized the viewport.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` off the dispatch thread.
    pub fn on_viewport_resized(&mut self, extent: Extent, display: &mut ImageDisplay) -> Result<Vec<Mutation>, SyncError> {
        self.scroll_pane.resize(extent);
        self.sync_canvas(display)
    }

    /// The user moved a scrollbar.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` off the dispatch thread.
    pub fn on_scroll_adjusted(
        &mut self,
        position: IntCoords,
        display: &mut ImageDisplay,
    ) -> Result<Vec<Mutation>, SyncError> {
        self.scroll_pane.scroll_to(position);
        self.sync_canvas(display)
    }

    /// The user zoomed the drawing view.
    ///
    /// # Errors
    ///
    /// Returns `InvalidScale`, leaving the scroll pane untouched, unless
    /// `scale` is finite and positive. Returns `WrongThread` off the
    /// dispatch thread.
    pub fn on_view_zoomed(&mut self, scale: f64, display: &mut ImageDisplay) -> Result<Vec<Mutation>, SyncError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(SyncError::InvalidScale { scale });
        }
        self.scroll_pane.zoom_to(scale);
        self.sync_canvas(display)
    }

    fn sync_canvas(&mut self, display: &mut ImageDisplay) -> Result<Vec<Mutation>, SyncError> {
        if !self.owns(display) {
            return Ok(Vec::new());
        }
        let mutations =
            self.synchronizer.sync(SyncDirection::CanvasAuthoritative, &mut self.scroll_pane, display.canvas_mut())?;
        if mutations.contains(&Mutation::AutoResize) {
            self.maybe_resize_window(display);
        }
        Ok(mutations)
    }

    /// Pack the window if the plane, at the canvas's zoom, fits the workspace.
    /// Returns whether it packed.
    pub fn maybe_resize_window(&mut self, display: &ImageDisplay) -> bool {
        if !sync::fits_workspace(display.canvas(), display.plane_extents(), self.config.workspace) {
            return false;
        }
        self.window.pack();
        true
    }

    /// Size the canvas would like to be laid out at.
    ///
    /// Before any figure has size, this is the plane projected at the
    /// canvas's zoom, clamped to the workspace. Afterwards it is the drawing
    /// view's scaled size. Both include the scroll-pane border and one pixel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn preferred_size(&self, display: &ImageDisplay) -> Extent {
        let slop = 2 * self.config.border_inset;
        let drawn = self.drawing_view.preferred_size(self.scroll_pane.scale_factor());
        if !drawn.is_empty() {
            return Extent::new(drawn.width + slop + 1, drawn.height + slop + 1);
        }
        let extents = display.plane_extents();
        let zoom = display.canvas().zoom_factor();
        let workspace = self.config.workspace;
        Extent::new(
            ((extents.width * zoom) as i32 + slop + 1).min(workspace.width),
            ((extents.height * zoom) as i32 + slop + 1).min(workspace.height),
        )
    }

    // =========================================================================
    // CAPTURE
    // =========================================================================

    /// Flatten the display's raster and this canvas's figures into a dataset
    /// named after the configured capture name.
    ///
    /// # Errors
    ///
    /// Propagates `DatasetError` from the factory.
    pub fn capture(
        &self,
        display: Option<&ImageDisplay>,
        factory: &dyn DatasetFactory,
    ) -> Result<Option<Dataset>, DatasetError> {
        let display = display.filter(|d| self.owns(d));
        capture::capture(display, &self.registry, self.drawing_view.drawing(), factory, &self.config.capture_name)
    }
}
