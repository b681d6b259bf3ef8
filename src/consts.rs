//! Shared numeric and naming constants for the canvas crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest zoom factor the canvas model accepts.
pub const ZOOM_MIN: f64 = 1.0 / 64.0;

/// Largest zoom factor the canvas model accepts.
pub const ZOOM_MAX: f64 = 64.0;

// ── Capture ─────────────────────────────────────────────────────

/// Name given to datasets produced by capture when none is configured.
pub const DEFAULT_CAPTURE_NAME: &str = "Captured view";

/// Bits per sample of a captured dataset.
pub const CAPTURE_BITS_PER_SAMPLE: u32 = 8;

/// Channel count of a captured dataset (R, G, B).
pub const CAPTURE_CHANNELS: usize = 3;

// ── Workspace ───────────────────────────────────────────────────

/// Desktop workspace width used when none is configured.
pub const DEFAULT_WORKSPACE_WIDTH: i32 = 1920;

/// Desktop workspace height used when none is configured.
pub const DEFAULT_WORKSPACE_HEIGHT: i32 = 1080;

/// Scroll-pane border inset (per side) used when none is configured.
pub const DEFAULT_BORDER_INSET: i32 = 1;

// ── Events ──────────────────────────────────────────────────────

/// Upper bound on drain rounds per event pump. Selection mirroring settles
/// in two rounds; anything beyond this is a feedback loop.
pub const MAX_EVENT_ROUNDS: usize = 16;
