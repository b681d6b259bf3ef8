//! UI-side contracts: the scrollable, zoomable viewport and its window.
//!
//! [`ScrollPane`] is a headless stand-in for a toolkit scroll pane wrapping
//! the drawing view. Hosts with a real widget implement [`ViewportUi`] over it.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use crate::geometry::{Extent, IntCoords};

/// Scroll/zoom geometry as the UI widget sees it.
pub trait ViewportUi {
    /// Visible area of the viewport, in pixels.
    fn extent_size(&self) -> Extent;

    /// Drawing view scale factor.
    fn scale_factor(&self) -> f64;

    /// Scroll position: the view pixel shown at the viewport's top-left.
    fn view_position(&self) -> IntCoords;

    /// Size of the scrollable view inside the viewport.
    fn view_size(&self) -> Extent;

    fn set_view_size(&mut self, size: Extent);

    fn set_scale_factor(&mut self, scale: f64);

    fn set_view_position(&mut self, position: IntCoords);
}

/// The top-level window hosting a canvas.
pub trait ViewerWindow {
    /// Resize the window to its content's preferred size.
    fn pack(&mut self);
}

/// Headless scroll pane.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollPane {
    extent: Extent,
    view_size: Extent,
    view_position: IntCoords,
    scale: f64,
}

impl Default for ScrollPane {
    fn default() -> Self {
        Self { extent: Extent::default(), view_size: Extent::default(), view_position: IntCoords::default(), scale: 1.0 }
    }
}

impl ScrollPane {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The viewport was resized by the layout (window resize, split drag).
    pub fn resize(&mut self, extent: Extent) {
        self.extent = extent;
    }

    /// The user moved a scrollbar.
    pub fn scroll_to(&mut self, position: IntCoords) {
        self.view_position = position;
    }

    /// The user zoomed the drawing view directly.
    pub fn zoom_to(&mut self, scale: f64) {
        self.scale = scale;
    }
}

impl ViewportUi for ScrollPane {
    fn extent_size(&self) -> Extent {
        self.extent
    }

    fn scale_factor(&self) -> f64 {
        self.scale
    }

    fn view_position(&self) -> IntCoords {
        self.view_position
    }

    fn view_size(&self) -> Extent {
        self.view_size
    }

    fn set_view_size(&mut self, size: Extent) {
        self.view_size = size;
    }

    fn set_scale_factor(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn set_view_position(&mut self, position: IntCoords) {
        self.view_position = position;
    }
}

/// Window that only counts pack requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadlessWindow {
    packs: usize,
}

impl HeadlessWindow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `pack` requests received.
    #[must_use]
    pub fn pack_count(&self) -> usize {
        self.packs
    }
}

impl ViewerWindow for HeadlessWindow {
    fn pack(&mut self) {
        self.packs += 1;
    }
}
