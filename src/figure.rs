//! Drawing surface: figures, the drawing that owns them, and the drawing
//! view's native selection.
//!
//! Figures live in data space at one pixel per unit; the drawing view's scale
//! factor is applied by the host when it paints to screen. Capture paints
//! figures unscaled onto the dataset's screen image.

#[cfg(test)]
#[path = "figure_test.rs"]
mod figure_test;

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::canvas::CursorKind;
use crate::geometry::{Extent, IntCoords, RealCoords, RealRect};
use crate::raster::{Argb, ArgbImage};

/// Unique identifier for a figure in a drawing.
pub type FigureId = Uuid;

/// What a figure paints.
#[derive(Debug, Clone, PartialEq)]
pub enum FigureShape {
    /// A raster placed with its top-left pixel at `origin`.
    Image { origin: IntCoords, image: ArgbImage },
    Rectangle(RealRect),
    /// Ellipse inscribed in the rectangle.
    Ellipse(RealRect),
    Line { from: RealCoords, to: RealCoords },
    Point(RealCoords),
}

/// A drawable shape with stroke/fill style and visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub shape: FigureShape,
    pub stroke: Argb,
    pub fill: Option<Argb>,
    pub visible: bool,
}

impl Figure {
    /// A visible figure with no fill.
    #[must_use]
    pub fn new(shape: FigureShape, stroke: Argb) -> Self {
        Self { shape, stroke, fill: None, visible: true }
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Option<Argb>) -> Self {
        self.fill = fill;
        self
    }

    /// Data-space bounding box.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bounds(&self) -> RealRect {
        match &self.shape {
            FigureShape::Image { origin, image } => RealRect::new(
                f64::from(origin.x),
                f64::from(origin.y),
                image.width() as f64,
                image.height() as f64,
            ),
            FigureShape::Rectangle(r) | FigureShape::Ellipse(r) => *r,
            FigureShape::Line { from, to } => RealRect::from_corners(*from, *to),
            FigureShape::Point(p) => RealRect::new(p.x, p.y, 0.0, 0.0),
        }
    }

    /// Paint onto `target`. Invisible figures paint nothing.
    pub fn draw(&self, target: &mut ArgbImage) {
        if !self.visible {
            return;
        }
        match &self.shape {
            FigureShape::Image { origin, image } => target.draw_image(image, *origin),
            FigureShape::Rectangle(r) => self.draw_rect(target, r),
            FigureShape::Ellipse(r) => self.draw_ellipse(target, r),
            FigureShape::Line { from, to } => draw_line(target, *from, *to, self.stroke),
            FigureShape::Point(p) => target.blend(px(p.x), px(p.y), self.stroke),
        }
    }

    fn draw_rect(&self, target: &mut ArgbImage, r: &RealRect) {
        let (x0, y0) = (px(r.x), px(r.y));
        let (x1, y1) = (px(r.x + r.width), px(r.y + r.height));
        for y in y0..=y1 {
            for x in x0..=x1 {
                let edge = x == x0 || x == x1 || y == y0 || y == y1;
                if edge {
                    target.blend(x, y, self.stroke);
                } else if let Some(fill) = self.fill {
                    target.blend(x, y, fill);
                }
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw_ellipse(&self, target: &mut ArgbImage, r: &RealRect) {
        let (rx, ry) = (r.width / 2.0, r.height / 2.0);
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let c = r.center();
        let inside = |x: f64, y: f64, rx: f64, ry: f64| {
            if rx <= 0.0 || ry <= 0.0 {
                return false;
            }
            let (dx, dy) = ((x - c.x) / rx, (y - c.y) / ry);
            dx * dx + dy * dy <= 1.0
        };
        for y in px(r.y)..=px(r.y + r.height) {
            for x in px(r.x)..=px(r.x + r.width) {
                let (fx, fy) = (x as f64, y as f64);
                if !inside(fx, fy, rx, ry) {
                    continue;
                }
                if !inside(fx, fy, rx - 1.0, ry - 1.0) {
                    target.blend(x, y, self.stroke);
                } else if let Some(fill) = self.fill {
                    target.blend(x, y, fill);
                }
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn px(v: f64) -> i64 {
    v.round() as i64
}

/// Bresenham segment between rounded endpoints, both inclusive.
fn draw_line(target: &mut ArgbImage, from: RealCoords, to: RealCoords, color: Argb) {
    let (mut x, mut y) = (px(from.x), px(from.y));
    let (x1, y1) = (px(to.x), px(to.y));
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        target.blend(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Ordered collection of figures; later figures paint over earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Drawing {
    figures: Vec<(FigureId, Figure)>,
}

impl Drawing {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a figure on top. Returns its id.
    pub fn add(&mut self, figure: Figure) -> FigureId {
        let id = Uuid::new_v4();
        self.figures.push((id, figure));
        id
    }

    /// Remove a figure, returning it if it was present.
    pub fn remove(&mut self, id: FigureId) -> Option<Figure> {
        let index = self.figures.iter().position(|(fid, _)| *fid == id)?;
        Some(self.figures.remove(index).1)
    }

    #[must_use]
    pub fn get(&self, id: FigureId) -> Option<&Figure> {
        self.figures.iter().find(|(fid, _)| *fid == id).map(|(_, f)| f)
    }

    /// Replace a figure's content. Returns true only if the content differed.
    pub fn replace(&mut self, id: FigureId, figure: Figure) -> bool {
        let Some((_, slot)) = self.figures.iter_mut().find(|(fid, _)| *fid == id) else {
            return false;
        };
        if *slot == figure {
            return false;
        }
        *slot = figure;
        true
    }

    #[must_use]
    pub fn contains(&self, id: FigureId) -> bool {
        self.figures.iter().any(|(fid, _)| *fid == id)
    }

    /// Figures bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = (FigureId, &Figure)> {
        self.figures.iter().map(|(id, f)| (*id, f))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.figures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    /// Union of every figure's bounds, or `None` for an empty drawing.
    #[must_use]
    pub fn bounds(&self) -> Option<RealRect> {
        self.figures.iter().map(|(_, f)| f.bounds()).reduce(|acc, r| acc.union(&r))
    }
}

/// Change notification for the drawing view's selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureSelectionEvent {
    pub old_selection: BTreeSet<FigureId>,
    pub new_selection: BTreeSet<FigureId>,
}

/// A drawing plus the UI-native selected-figure set and cursor.
#[derive(Debug, Clone, Default)]
pub struct DrawingView {
    drawing: Drawing,
    selection: BTreeSet<FigureId>,
    cursor: CursorKind,
}

impl DrawingView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    pub fn drawing_mut(&mut self) -> &mut Drawing {
        &mut self.drawing
    }

    pub fn add_figure(&mut self, figure: Figure) -> FigureId {
        self.drawing.add(figure)
    }

    /// Remove a figure from the drawing and the selection.
    ///
    /// No selection event is produced: the figure's data view has already
    /// left the display, so there is nothing to mirror.
    pub fn remove_figure(&mut self, id: FigureId) -> Option<Figure> {
        self.selection.remove(&id);
        self.drawing.remove(id)
    }

    // --- Selection ---

    #[must_use]
    pub fn selected_figures(&self) -> &BTreeSet<FigureId> {
        &self.selection
    }

    #[must_use]
    pub fn is_selected(&self, id: FigureId) -> bool {
        self.selection.contains(&id)
    }

    /// Add a figure of this drawing to the selection.
    pub fn add_to_selection(&mut self, id: FigureId) -> Option<FigureSelectionEvent> {
        if !self.drawing.contains(id) || self.selection.contains(&id) {
            return None;
        }
        let old_selection = self.selection.clone();
        self.selection.insert(id);
        Some(FigureSelectionEvent { old_selection, new_selection: self.selection.clone() })
    }

    pub fn remove_from_selection(&mut self, id: FigureId) -> Option<FigureSelectionEvent> {
        if !self.selection.contains(&id) {
            return None;
        }
        let old_selection = self.selection.clone();
        self.selection.remove(&id);
        Some(FigureSelectionEvent { old_selection, new_selection: self.selection.clone() })
    }

    /// Replace the selection. Ids not in the drawing are ignored.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = FigureId>) -> Option<FigureSelectionEvent> {
        let new_selection: BTreeSet<FigureId> = ids.into_iter().filter(|id| self.drawing.contains(*id)).collect();
        if new_selection == self.selection {
            return None;
        }
        let old_selection = std::mem::replace(&mut self.selection, new_selection);
        Some(FigureSelectionEvent { old_selection, new_selection: self.selection.clone() })
    }

    pub fn clear_selection(&mut self) -> Option<FigureSelectionEvent> {
        self.set_selection(std::iter::empty())
    }

    // --- Presentation ---

    #[must_use]
    pub fn cursor(&self) -> CursorKind {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: CursorKind) {
        self.cursor = cursor;
    }

    /// Screen size of the drawing's content at `scale`; zero when empty.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn preferred_size(&self, scale: f64) -> Extent {
        let Some(bounds) = self.drawing.bounds() else {
            return Extent::default();
        };
        let far = bounds.far_corner();
        Extent::new((far.x.max(0.0) * scale).ceil() as i32, (far.y.max(0.0) * scale).ceil() as i32)
    }
}
