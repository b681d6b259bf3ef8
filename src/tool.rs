//! Tools and annotation creation.
//!
//! DESIGN
//! ======
//! A [`Tool`] is whatever the host's toolbar activates. Tools that can draw
//! new annotations expose an [`OverlayAdapter`], which hands out a
//! [`CreationTool`] bound to one display. The canvas installs that creation
//! tool in its [`ToolDelegator`]; other tools leave the delegator empty.
//!
//! A creation tool draws its figure straight into the drawing view and then
//! reports the new overlay through a [`CreationListener`]. The listener is a
//! channel sender, so the canvas picks the report up on its next event pump
//! instead of being called back while the drawing view is borrowed.

#[cfg(test)]
#[path = "tool_test.rs"]
mod tool_test;

use std::fmt;
use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::canvas::CursorKind;
use crate::display::{DisplayId, ImageDisplay};
use crate::figure::{DrawingView, Figure, FigureId, FigureSelectionEvent, FigureShape};
use crate::geometry::{RealCoords, RealRect};
use crate::raster::Argb;
use crate::view::{DataView, Overlay, OverlayShape};

// =============================================================================
// CONTRACTS
// =============================================================================

/// A tool the host can activate.
pub trait Tool: fmt::Debug {
    fn name(&self) -> &str;

    /// Cursor to show while the tool is active.
    fn cursor(&self) -> CursorKind {
        CursorKind::Default
    }

    /// Creation capability, for tools that draw new annotations.
    fn overlay_adapter(&self) -> Option<&dyn OverlayAdapter> {
        None
    }
}

/// Hands out creation tools for a display.
pub trait OverlayAdapter {
    fn creation_tool(&self, display: &ImageDisplay, listener: CreationListener) -> Box<dyn CreationTool>;
}

/// A tool that draws a new annotation into a drawing view.
pub trait CreationTool: fmt::Debug {
    /// Display the created overlays belong to.
    fn display(&self) -> DisplayId;

    /// Draw a figure spanning `from`..`to`, then report the new overlay to
    /// the listener.
    fn draw(&mut self, from: RealCoords, to: RealCoords, drawing: &mut DrawingView) -> CreationOutcome;
}

/// What a [`CreationTool::draw`] call did to the drawing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationOutcome {
    pub figure: FigureId,
    /// Native selection change, if the tool selected its figure.
    pub selection: Option<FigureSelectionEvent>,
}

/// Report of a newly drawn annotation.
#[derive(Debug, Clone)]
pub struct FigureCreated {
    /// The overlay data view, not yet added to any display.
    pub overlay: DataView,
    /// The figure already in the drawing.
    pub figure: FigureId,
}

/// Where creation tools report new annotations.
#[derive(Debug, Clone)]
pub struct CreationListener {
    tx: mpsc::Sender<FigureCreated>,
}

impl CreationListener {
    /// A listener and the receiving end its reports arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::Receiver<FigureCreated>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// Deliver a report. Returns false if nobody is listening any more.
    pub fn notify(&self, created: FigureCreated) -> bool {
        self.tx.send(created).is_ok()
    }
}

// =============================================================================
// DELEGATOR
// =============================================================================

/// Holds the creation tool, if any, that pointer input is routed to.
#[derive(Debug, Default)]
pub struct ToolDelegator {
    creation_tool: Option<Box<dyn CreationTool>>,
}

impl ToolDelegator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `tool` for `display`: install a creation tool if the tool
    /// can create annotations, otherwise clear the slot. Returns whether a
    /// creation tool was installed.
    pub fn activate(&mut self, tool: &dyn Tool, display: &ImageDisplay, listener: CreationListener) -> bool {
        self.creation_tool = tool.overlay_adapter().map(|adapter| adapter.creation_tool(display, listener));
        let display_id = display.id();
        tracing::debug!(
            tool = tool.name(),
            display = %display_id,
            creating = self.creation_tool.is_some(),
            "tool activated"
        );
        self.creation_tool.is_some()
    }

    pub fn set_creation_tool(&mut self, tool: Option<Box<dyn CreationTool>>) {
        self.creation_tool = tool;
    }

    #[must_use]
    pub fn creation_tool(&self) -> Option<&dyn CreationTool> {
        self.creation_tool.as_deref()
    }

    pub fn creation_tool_mut(&mut self) -> Option<&mut (dyn CreationTool + 'static)> {
        self.creation_tool.as_deref_mut()
    }

    #[must_use]
    pub fn is_creating(&self) -> bool {
        self.creation_tool.is_some()
    }
}

// =============================================================================
// BUILT-IN TOOLS
// =============================================================================

/// Geometry a [`ShapeTool`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Line,
    Point,
}

impl ShapeKind {
    /// The shape dragged out from `from` to `to`. Points sit at `to`.
    #[must_use]
    pub fn between(self, from: RealCoords, to: RealCoords) -> OverlayShape {
        match self {
            Self::Rectangle => OverlayShape::Rectangle(RealRect::from_corners(from, to)),
            Self::Ellipse => OverlayShape::Ellipse(RealRect::from_corners(from, to)),
            Self::Line => OverlayShape::Line { from, to },
            Self::Point => OverlayShape::Point(to),
        }
    }
}

/// Annotation tool drawing one kind of shape.
#[derive(Debug, Clone)]
pub struct ShapeTool {
    name: String,
    kind: ShapeKind,
    stroke: Argb,
    fill: Option<Argb>,
    select_created: bool,
}

impl ShapeTool {
    /// A tool that selects each figure it draws.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ShapeKind, stroke: Argb) -> Self {
        Self { name: name.into(), kind, stroke, fill: None, select_created: true }
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Argb) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Leave drawn figures out of the selection.
    #[must_use]
    pub fn without_selecting(mut self) -> Self {
        self.select_created = false;
        self
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }
}

impl Tool for ShapeTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn cursor(&self) -> CursorKind {
        CursorKind::Crosshair
    }

    fn overlay_adapter(&self) -> Option<&dyn OverlayAdapter> {
        Some(self)
    }
}

impl OverlayAdapter for ShapeTool {
    fn creation_tool(&self, display: &ImageDisplay, listener: CreationListener) -> Box<dyn CreationTool> {
        Box::new(ShapeCreationTool {
            display: display.id(),
            kind: self.kind,
            stroke: self.stroke,
            fill: self.fill,
            select_created: self.select_created,
            listener,
        })
    }
}

/// Creation tool handed out by [`ShapeTool`].
#[derive(Debug)]
struct ShapeCreationTool {
    display: DisplayId,
    kind: ShapeKind,
    stroke: Argb,
    fill: Option<Argb>,
    select_created: bool,
    listener: CreationListener,
}

impl CreationTool for ShapeCreationTool {
    fn display(&self) -> DisplayId {
        self.display
    }

    fn draw(&mut self, from: RealCoords, to: RealCoords, drawing: &mut DrawingView) -> CreationOutcome {
        let shape = self.kind.between(from, to);
        let figure = drawing.add_figure(Figure::new(FigureShape::from(shape), self.stroke).with_fill(self.fill));
        let selection = if self.select_created { drawing.set_selection([figure]) } else { None };

        let overlay = DataView::overlay(Overlay::planar(shape, self.stroke, self.fill));
        if !self.listener.notify(FigureCreated { overlay, figure }) {
            tracing::warn!(display = %self.display, %figure, "no listener for created overlay");
        }
        CreationOutcome { figure, selection }
    }
}

/// Navigation tool; draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanTool;

impl Tool for PanTool {
    fn name(&self) -> &'static str {
        "pan"
    }

    fn cursor(&self) -> CursorKind {
        CursorKind::Hand
    }
}
