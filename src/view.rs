//! Data views: the display-layer handles for the raster image and annotations.
//!
//! A [`DataView`] carries identity, a selection flag, and per-axis positions.
//! What it shows is the tagged [`DataViewKind`]: a dataset raster, an overlay
//! annotation, or some other kind this crate has no figure for.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::dataset::Axis;
use crate::figure::FigureShape;
use crate::geometry::{RealCoords, RealRect};
use crate::raster::{Argb, ArgbImage};

/// Unique identifier for a data view.
pub type DataViewId = Uuid;

/// Raster view of a dataset, already rendered to screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetView {
    /// Name of the dataset being shown.
    pub dataset_name: String,
    /// The current plane rendered to ARGB.
    pub screen_image: ArgbImage,
}

impl DatasetView {
    #[must_use]
    pub fn new(dataset_name: impl Into<String>, screen_image: ArgbImage) -> Self {
        Self { dataset_name: dataset_name.into(), screen_image }
    }

    /// Data-space bounds of the rendered plane.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bounds(&self) -> RealRect {
        RealRect::new(0.0, 0.0, self.screen_image.width() as f64, self.screen_image.height() as f64)
    }
}

/// Geometry of an annotation in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayShape {
    Rectangle(RealRect),
    /// Ellipse inscribed in the rectangle.
    Ellipse(RealRect),
    Line { from: RealCoords, to: RealCoords },
    Point(RealCoords),
}

impl OverlayShape {
    /// Axis-aligned bounding box.
    #[must_use]
    pub fn bounds(&self) -> RealRect {
        match *self {
            Self::Rectangle(r) | Self::Ellipse(r) => r,
            Self::Line { from, to } => RealRect::from_corners(from, to),
            Self::Point(p) => RealRect::new(p.x, p.y, 0.0, 0.0),
        }
    }
}

impl From<OverlayShape> for FigureShape {
    fn from(shape: OverlayShape) -> Self {
        match shape {
            OverlayShape::Rectangle(r) => Self::Rectangle(r),
            OverlayShape::Ellipse(r) => Self::Ellipse(r),
            OverlayShape::Line { from, to } => Self::Line { from, to },
            OverlayShape::Point(p) => Self::Point(p),
        }
    }
}

/// An annotation: shape, style, and the axes it intrinsically spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub shape: OverlayShape,
    pub stroke: Argb,
    pub fill: Option<Argb>,
    axes: Vec<Axis>,
}

impl Overlay {
    /// A planar overlay spanning X and Y.
    #[must_use]
    pub fn planar(shape: OverlayShape, stroke: Argb, fill: Option<Argb>) -> Self {
        Self { shape, stroke, fill, axes: vec![Axis::X, Axis::Y] }
    }

    /// Extend the overlay across another axis (it then has no single position there).
    #[must_use]
    pub fn spanning(mut self, axis: Axis) -> Self {
        if !self.axes.contains(&axis) {
            self.axes.push(axis);
        }
        self
    }

    /// Index of `axis` within the overlay's own axes.
    #[must_use]
    pub fn axis_index(&self, axis: Axis) -> Option<usize> {
        self.axes.iter().position(|&a| a == axis)
    }

    #[must_use]
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }
}

/// What a data view shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DataViewKind {
    Dataset(DatasetView),
    Overlay(Overlay),
    /// A view kind contributed elsewhere, with no figure representation here.
    Other { type_name: String },
}

impl DataViewKind {
    /// Short label for logs.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Dataset(_) => "dataset",
            Self::Overlay(_) => "overlay",
            Self::Other { type_name } => type_name,
        }
    }
}

/// A display-layer handle with a selection flag and per-axis positions.
#[derive(Debug, Clone, PartialEq)]
pub struct DataView {
    id: DataViewId,
    selected: bool,
    kind: DataViewKind,
    positions: BTreeMap<Axis, i64>,
}

impl DataView {
    #[must_use]
    pub fn new(kind: DataViewKind) -> Self {
        Self { id: Uuid::new_v4(), selected: false, kind, positions: BTreeMap::new() }
    }

    #[must_use]
    pub fn dataset(view: DatasetView) -> Self {
        Self::new(DataViewKind::Dataset(view))
    }

    #[must_use]
    pub fn overlay(overlay: Overlay) -> Self {
        Self::new(DataViewKind::Overlay(overlay))
    }

    #[must_use]
    pub fn id(&self) -> DataViewId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> &DataViewKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut DataViewKind {
        &mut self.kind
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Set the selection flag. Returns whether it changed.
    ///
    /// Views inside a display should be selected through
    /// [`crate::display::ImageDisplay::set_selected`], which also announces the change.
    pub fn set_selected(&mut self, selected: bool) -> bool {
        if self.selected == selected {
            return false;
        }
        self.selected = selected;
        true
    }

    /// Explicit position along `axis`, if one was assigned.
    #[must_use]
    pub fn position(&self, axis: Axis) -> Option<i64> {
        self.positions.get(&axis).copied()
    }

    pub fn set_position(&mut self, position: i64, axis: Axis) {
        self.positions.insert(axis, position);
    }

    /// Whether this view is pinned along `axis`, either by spanning it or by
    /// an explicit position.
    #[must_use]
    pub fn has_position(&self, axis: Axis) -> bool {
        if self.positions.contains_key(&axis) {
            return true;
        }
        match &self.kind {
            DataViewKind::Overlay(overlay) => overlay.axis_index(axis).is_some(),
            DataViewKind::Dataset(_) => axis.is_xy(),
            DataViewKind::Other { .. } => false,
        }
    }

    /// Data-space bounds of what the view shows, if it has any.
    #[must_use]
    pub fn bounds(&self) -> Option<RealRect> {
        match &self.kind {
            DataViewKind::Dataset(ds) => Some(ds.bounds()),
            DataViewKind::Overlay(overlay) => Some(overlay.shape.bounds()),
            DataViewKind::Other { .. } => None,
        }
    }
}
