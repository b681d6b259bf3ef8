//! Image display: the ordered table of data views a canvas renders.
//!
//! DESIGN
//! ======
//! The display owns its data views, its axes and current position along each
//! axis, and its canvas model. Viewers refer back to it by [`DisplayId`] and
//! look views up by [`DataViewId`]; nothing holds a pointer into the table.
//! Selection changes go through [`ImageDisplay::set_selected`], which only
//! announces real flips so mirrored selection settles instead of echoing.

#[cfg(test)]
#[path = "display_test.rs"]
mod display_test;

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::canvas::PanZoomCanvas;
use crate::dataset::Axis;
use crate::event::{DisplayEvent, EventBus};
use crate::geometry::RealRect;
use crate::view::{DataView, DataViewId, DataViewKind, DatasetView};

/// Unique identifier for a display.
pub type DisplayId = Uuid;

/// An ordered set of data views shown through one canvas.
#[derive(Debug)]
pub struct ImageDisplay {
    id: DisplayId,
    name: String,
    views: Vec<DataView>,
    axes: Vec<Axis>,
    positions: BTreeMap<Axis, i64>,
    canvas: PanZoomCanvas,
    bus: EventBus,
    updates: u64,
}

impl ImageDisplay {
    /// Create an empty display over `axes`. Every axis starts at position 0.
    #[must_use]
    pub fn new(name: impl Into<String>, axes: &[Axis], bus: EventBus) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            views: Vec::new(),
            axes: axes.to_vec(),
            positions: axes.iter().map(|&a| (a, 0)).collect(),
            canvas: PanZoomCanvas::with_bus(bus.clone()),
            bus,
            updates: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> DisplayId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    // --- Views ---

    /// Data views in display order.
    pub fn iter(&self) -> impl Iterator<Item = &DataView> {
        self.views.iter()
    }

    /// Ids of all views in display order.
    #[must_use]
    pub fn view_ids(&self) -> Vec<DataViewId> {
        self.views.iter().map(DataView::id).collect()
    }

    #[must_use]
    pub fn contains(&self, id: DataViewId) -> bool {
        self.views.iter().any(|v| v.id() == id)
    }

    #[must_use]
    pub fn get(&self, id: DataViewId) -> Option<&DataView> {
        self.views.iter().find(|v| v.id() == id)
    }

    pub fn get_mut(&mut self, id: DataViewId) -> Option<&mut DataView> {
        self.views.iter_mut().find(|v| v.id() == id)
    }

    /// Append a view. Returns its id.
    pub fn add(&mut self, view: DataView) -> DataViewId {
        let id = view.id();
        self.views.push(view);
        id
    }

    /// Remove a view, returning it if it was present.
    pub fn remove(&mut self, id: DataViewId) -> Option<DataView> {
        let index = self.views.iter().position(|v| v.id() == id)?;
        Some(self.views.remove(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// The first dataset view, which is the one shown as the backdrop.
    #[must_use]
    pub fn active_dataset_view(&self) -> Option<&DatasetView> {
        self.views.iter().find_map(|v| match v.kind() {
            DataViewKind::Dataset(ds) => Some(ds),
            _ => None,
        })
    }

    // --- Selection ---

    /// Set a view's selection flag, publishing `DataViewSelected` or
    /// `DataViewDeselected` only when the flag actually changes.
    ///
    /// Returns whether it changed; unknown ids change nothing.
    pub fn set_selected(&mut self, id: DataViewId, selected: bool) -> bool {
        let display = self.id;
        let Some(view) = self.get_mut(id) else {
            return false;
        };
        if !view.set_selected(selected) {
            return false;
        }
        let event = if selected {
            DisplayEvent::DataViewSelected { display, view: id }
        } else {
            DisplayEvent::DataViewDeselected { display, view: id }
        };
        self.bus.publish(event);
        true
    }

    /// Ids of every selected view, in display order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<DataViewId> {
        self.views.iter().filter(|v| v.is_selected()).map(DataView::id).collect()
    }

    // --- Axes ---

    #[must_use]
    pub fn num_dimensions(&self) -> usize {
        self.axes.len()
    }

    #[must_use]
    pub fn axis(&self, index: usize) -> Option<Axis> {
        self.axes.get(index).copied()
    }

    #[must_use]
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Current position along `axis`; 0 for axes the display doesn't have.
    #[must_use]
    pub fn position(&self, axis: Axis) -> i64 {
        self.positions.get(&axis).copied().unwrap_or(0)
    }

    /// Move to `position` along `axis`. Ignored for axes the display doesn't have.
    pub fn set_position(&mut self, position: i64, axis: Axis) {
        if let Some(slot) = self.positions.get_mut(&axis) {
            *slot = position;
        }
    }

    // --- Canvas ---

    #[must_use]
    pub fn canvas(&self) -> &PanZoomCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut PanZoomCanvas {
        &mut self.canvas
    }

    /// Union of the data-space bounds of every view, or an empty rectangle.
    #[must_use]
    pub fn plane_extents(&self) -> RealRect {
        self.views
            .iter()
            .filter_map(DataView::bounds)
            .reduce(|acc, r| acc.union(&r))
            .unwrap_or_default()
    }

    // --- Lifecycle ---

    /// Ask viewers to refresh. Counted so hosts can coalesce repaints.
    pub fn update(&mut self) {
        self.updates += 1;
        tracing::trace!(display = %self.id, updates = self.updates, "display update requested");
    }

    /// Number of update requests so far.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.updates
    }

    /// Announce that this display is going away.
    pub fn delete(&self) {
        self.bus.publish(DisplayEvent::DisplayDeleted { display: self.id });
    }
}
