//! Headless image canvas with annotation figures and two-way viewport sync.
//!
//! This crate keeps a scroll/zoom viewport and a logical pan/zoom canvas model
//! in agreement, and mirrors the display's data views (one raster dataset view,
//! any number of overlay views) as drawable figures. The host toolkit supplies
//! pixels and input; everything here is plain state that can be driven and
//! inspected without a window system.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`image_canvas`] | Top-level [`image_canvas::FigureCanvas`] that routes events |
//! | [`sync`] | Viewport synchronizer: pure `plan` + `apply`, auto-resize check |
//! | [`registry`] | Figure views paired with data views |
//! | [`selection`] | Native selection ⇄ data-view selection flags |
//! | [`tool`] | Tool activation and annotation creation tools |
//! | [`capture`] | Flatten the visible raster and figures into a dataset |
//! | [`display`] | Display: ordered data views, axes, positions, canvas |
//! | [`view`] | Data views (dataset, overlay) |
//! | [`figure`] | Figures, the drawing, and the drawing view's selection |
//! | [`canvas`] | Canvas model trait and the pan/zoom implementation |
//! | [`ui`] | Scroll pane and window contracts |
//! | [`event`] | Event bus and scoped subscriptions |
//! | [`dataset`] | Axes, datasets, and the dataset factory |
//! | [`raster`] | ARGB images and compositing |
//! | [`geometry`] | Integer/real coordinates, rectangles, extents |
//! | [`config`] | Environment-driven configuration |
//! | [`consts`] | Shared numeric and naming constants |

pub mod canvas;
pub mod capture;
pub mod config;
pub mod consts;
pub mod dataset;
pub mod display;
pub mod event;
pub mod figure;
pub mod geometry;
pub mod image_canvas;
pub mod raster;
pub mod registry;
pub mod selection;
pub mod sync;
pub mod tool;
pub mod ui;
pub mod view;
