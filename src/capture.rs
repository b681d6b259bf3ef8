//! Capture: flatten what the canvas shows into a new RGB dataset.
//!
//! The active dataset view's screen image is copied onto a blank buffer and
//! every live figure is painted over it in registry order. The result becomes
//! a `[width, height, 3]` dataset over `X, Y, Channel`, 8 bits per sample,
//! flagged RGB-merged.

#[cfg(test)]
#[path = "capture_test.rs"]
mod capture_test;

use crate::consts::{CAPTURE_BITS_PER_SAMPLE, CAPTURE_CHANNELS};
use crate::dataset::{Axis, Dataset, DatasetError, DatasetFactory};
use crate::display::ImageDisplay;
use crate::figure::Drawing;
use crate::geometry::IntCoords;
use crate::raster::{ArgbImage, channels};
use crate::registry::FigureViewRegistry;

/// Composite the display's visible raster and figures into a dataset.
///
/// Returns `Ok(None)` when there is no display or it has no dataset view.
///
/// # Errors
///
/// Propagates `DatasetError` from the factory or from writing samples.
pub fn capture(
    display: Option<&ImageDisplay>,
    registry: &FigureViewRegistry,
    drawing: &Drawing,
    factory: &dyn DatasetFactory,
    name: &str,
) -> Result<Option<Dataset>, DatasetError> {
    let Some(display) = display else {
        return Ok(None);
    };
    let display_id = display.id();
    let Some(dataset_view) = display.active_dataset_view() else {
        tracing::debug!(display = %display_id, "nothing to capture: no dataset view");
        return Ok(None);
    };

    let screen = &dataset_view.screen_image;
    let (width, height) = (screen.width(), screen.height());
    let mut buffer = ArgbImage::new(width, height);
    buffer.draw_image(screen, IntCoords::default());
    for figure_view in registry.iter() {
        if let Some(figure) = drawing.get(figure_view.figure()) {
            figure.draw(&mut buffer);
        }
    }

    let mut dataset = factory.create(
        &[width, height, CAPTURE_CHANNELS],
        name,
        &[Axis::X, Axis::Y, Axis::Channel],
        CAPTURE_BITS_PER_SAMPLE,
        false,
        false,
    )?;
    dataset.set_rgb_merged(true);

    for x in 0..width {
        for y in 0..height {
            let Some(pixel) = buffer.get(x, y) else {
                continue;
            };
            let [_, r, g, b] = channels(pixel);
            dataset.set(&[x, y, 0], f64::from(r))?;
            dataset.set(&[x, y, 1], f64::from(g))?;
            dataset.set(&[x, y, 2], f64::from(b))?;
        }
    }

    tracing::info!(display = %display_id, name, width, height, "captured view");
    Ok(Some(dataset))
}
