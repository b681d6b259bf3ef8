//! Canvas model: pan/zoom/viewport state independent of any widget.
//!
//! [`ImageCanvas`] is the contract the viewport synchronizer reads and
//! mutates. [`PanZoomCanvas`] is the headless implementation a display owns;
//! it publishes [`DisplayEvent::PanZoom`] whenever its geometry actually
//! changes, and [`DisplayEvent::MouseCursor`] when its cursor changes.
//!
//! Panel coordinates are `round((data - origin) * zoom)`, where `origin` is
//! the data coordinate shown at the panel's top-left pixel.

#[cfg(test)]
#[path = "canvas_test.rs"]
mod canvas_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{ZOOM_MAX, ZOOM_MIN};
use crate::event::{DisplayEvent, EventBus};
use crate::geometry::{Extent, IntCoords, RealCoords};

/// Unique identifier for a canvas model.
pub type CanvasId = Uuid;

/// Pointer cursor the canvas asks the UI to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorKind {
    #[default]
    Default,
    Crosshair,
    Hand,
    Move,
    Wait,
}

/// Pan/zoom/viewport state consumed by the viewport synchronizer.
pub trait ImageCanvas {
    fn id(&self) -> CanvasId;

    fn viewport_width(&self) -> i32;

    fn viewport_height(&self) -> i32;

    /// Resize the viewport in panel pixels.
    fn set_viewport_size(&mut self, width: i32, height: i32);

    fn zoom_factor(&self) -> f64;

    /// Set the zoom factor, placing data point `center` at the viewport center.
    fn set_zoom(&mut self, factor: f64, center: RealCoords);

    /// Map a data-space point to panel pixels.
    fn data_to_panel(&self, data: RealCoords) -> IntCoords;

    /// Map a panel pixel to data space.
    fn panel_to_data(&self, panel: IntCoords) -> RealCoords;

    fn cursor(&self) -> CursorKind;
}

/// Headless canvas model owned by a display.
#[derive(Debug, Clone)]
pub struct PanZoomCanvas {
    id: CanvasId,
    viewport: Extent,
    zoom: f64,
    origin: RealCoords,
    cursor: CursorKind,
    bus: Option<EventBus>,
}

impl Default for PanZoomCanvas {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            viewport: Extent::default(),
            zoom: 1.0,
            origin: RealCoords::default(),
            cursor: CursorKind::Default,
            bus: None,
        }
    }
}

impl PanZoomCanvas {
    /// A detached canvas that publishes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A canvas that announces its changes on `bus`.
    #[must_use]
    pub fn with_bus(bus: EventBus) -> Self {
        Self { bus: Some(bus), ..Self::default() }
    }

    /// Data coordinate shown at the panel's top-left pixel.
    #[must_use]
    pub fn origin(&self) -> RealCoords {
        self.origin
    }

    /// Pan by a panel-space delta; positive values move the view right/down.
    pub fn pan(&mut self, delta: IntCoords) {
        if delta == IntCoords::default() {
            return;
        }
        self.origin = RealCoords::new(
            self.origin.x + f64::from(delta.x) / self.zoom,
            self.origin.y + f64::from(delta.y) / self.zoom,
        );
        self.announce_pan_zoom();
    }

    /// Change the cursor, announcing the change.
    pub fn set_cursor(&mut self, cursor: CursorKind) {
        if self.cursor == cursor {
            return;
        }
        self.cursor = cursor;
        if let Some(bus) = &self.bus {
            bus.publish(DisplayEvent::MouseCursor { canvas: self.id });
        }
    }

    fn announce_pan_zoom(&self) {
        if let Some(bus) = &self.bus {
            bus.publish(DisplayEvent::PanZoom { canvas: self.id });
        }
    }
}

impl ImageCanvas for PanZoomCanvas {
    fn id(&self) -> CanvasId {
        self.id
    }

    fn viewport_width(&self) -> i32 {
        self.viewport.width
    }

    fn viewport_height(&self) -> i32 {
        self.viewport.height
    }

    fn set_viewport_size(&mut self, width: i32, height: i32) {
        let viewport = Extent::new(width, height);
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;
        self.announce_pan_zoom();
    }

    fn zoom_factor(&self) -> f64 {
        self.zoom
    }

    #[allow(clippy::float_cmp)]
    fn set_zoom(&mut self, factor: f64, center: RealCoords) {
        let zoom = if factor.is_finite() { factor.clamp(ZOOM_MIN, ZOOM_MAX) } else { self.zoom };
        let origin = RealCoords::new(
            center.x - f64::from(self.viewport.width) / 2.0 / zoom,
            center.y - f64::from(self.viewport.height) / 2.0 / zoom,
        );
        let before = (self.zoom, self.data_to_panel(RealCoords::default()));
        self.zoom = zoom;
        self.origin = origin;
        if before != (self.zoom, self.data_to_panel(RealCoords::default())) {
            self.announce_pan_zoom();
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn data_to_panel(&self, data: RealCoords) -> IntCoords {
        IntCoords::new(
            ((data.x - self.origin.x) * self.zoom).round() as i32,
            ((data.y - self.origin.y) * self.zoom).round() as i32,
        )
    }

    fn panel_to_data(&self, panel: IntCoords) -> RealCoords {
        RealCoords::new(
            f64::from(panel.x) / self.zoom + self.origin.x,
            f64::from(panel.y) / self.zoom + self.origin.y,
        )
    }

    fn cursor(&self) -> CursorKind {
        self.cursor
    }
}
