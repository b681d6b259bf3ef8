//! Headless demo: drives a figure canvas through a scripted session and
//! prints a JSON summary of the result.

use std::process::ExitCode;
use std::rc::Rc;

use figure_canvas::canvas::ImageCanvas;
use figure_canvas::config::CanvasConfig;
use figure_canvas::dataset::{Axis, DefaultDatasetFactory};
use figure_canvas::display::ImageDisplay;
use figure_canvas::event::{DisplayEvent, EventBus};
use figure_canvas::geometry::{Extent, IntCoords, RealCoords};
use figure_canvas::image_canvas::FigureCanvas;
use figure_canvas::raster::{ArgbImage, rgb};
use figure_canvas::tool::{ShapeKind, ShapeTool};
use figure_canvas::ui::HeadlessWindow;
use figure_canvas::view::{DataView, DatasetView};

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run() {
        Ok(summary) => {
            println!("{summary:#}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "demo session failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let config = CanvasConfig::from_env()?;
    tracing::info!(workspace = ?config.workspace, capture = %config.capture_name, "canvas configured");

    let bus = EventBus::new();
    let mut display = ImageDisplay::new("demo", &[Axis::X, Axis::Y, Axis::Time], bus.clone());
    display.add(DataView::dataset(DatasetView::new("gradient", gradient(64, 48))));
    display.set_position(2, Axis::Time);

    let mut canvas = FigureCanvas::new(&mut display, None, HeadlessWindow::new(), config);
    canvas.rebuild(&display);

    canvas.on_viewport_resized(Extent::new(320, 240), &mut display)?;
    canvas.on_view_zoomed(4.0, &mut display)?;
    canvas.on_scroll_adjusted(IntCoords::new(16, 8), &mut display)?;
    canvas.process_events(&mut display)?;

    bus.publish(DisplayEvent::ToolActivated {
        tool: Rc::new(ShapeTool::new("rectangle", ShapeKind::Rectangle, rgb(255, 255, 0))),
    });
    canvas.process_events(&mut display)?;
    let overlay = canvas.draw_with_active_tool(RealCoords::new(8.0, 8.0), RealCoords::new(24.0, 20.0), &mut display);
    canvas.process_events(&mut display)?;

    let captured = canvas.capture(Some(&display), &DefaultDatasetFactory)?;
    let summary = serde_json::json!({
        "display": display.name(),
        "views": display.len(),
        "selected": display.selected_ids().len(),
        "overlay_time": overlay.and_then(|id| display.get(id)).and_then(|v| v.position(Axis::Time)),
        "zoom": display.canvas().zoom_factor(),
        "window_packs": canvas.window().pack_count(),
        "preferred_size": canvas.preferred_size(&display),
        "capture": captured.map(|ds| serde_json::json!({
            "name": ds.name(),
            "dims": ds.dims(),
            "axes": ds.axes(),
            "rgb_merged": ds.is_rgb_merged(),
        })),
    });
    Ok(summary)
}

/// Horizontal red ramp over a vertical blue ramp.
#[allow(clippy::cast_possible_truncation)]
fn gradient(width: usize, height: usize) -> ArgbImage {
    let mut image = ArgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u8;
            let b = (y * 255 / height.max(1)) as u8;
            image.set(x, y, rgb(r, 0, b));
        }
    }
    image
}
