//! Map surface that prints to a terminal
//!
//! Each distinct view is written once as a short block of text; repeated
//! renders of the same view are suppressed.

use std::io::Write;

use application::{MapSurfacePort, MapView};
use domain::Coordinate;
use parking_lot::Mutex;
use tracing::warn;

/// Text map surface over any writer
#[derive(Debug)]
pub struct TerminalSurface<W> {
    out: Mutex<W>,
    last: Mutex<Option<MapView>>,
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            last: Mutex::new(None),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write_line(&self, line: &str) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!(error = %e, "Failed to write map view");
        }
    }
}

impl<W: Write + Send> MapSurfacePort for TerminalSurface<W> {
    fn recenter(&self, center: Coordinate) {
        self.write_line(&format!("🧭 Map centered on {center}"));
    }

    fn render(&self, view: &MapView) {
        {
            let mut last = self.last.lock();
            if last.as_ref() == Some(view) {
                return;
            }
            *last = Some(view.clone());
        }
        self.write_line(&describe(view));
    }
}

/// Human-readable summary of a view
pub fn describe(view: &MapView) -> String {
    let mut lines = vec![format!("── {} ──", view.phase)];

    if let Some(origin) = view.origin_marker {
        lines.push(format!("  📍 From: {origin}"));
    }
    if let Some(destination) = view.destination_marker {
        lines.push(format!("  🏁 To:   {destination}"));
    }
    if let Some(route) = &view.route {
        let km = route.distance_or_estimate() / 1000.0;
        let mut summary = format!("  🛣️  Route: {km:.1} km, {} points", route.polyline.len());
        if let Some(secs) = route.duration_secs {
            summary.push_str(&format!(", ~{} min", (secs / 60.0).round()));
        }
        lines.push(summary);
    }
    if view.loading {
        lines.push("  ⏳ Loading...".to_string());
    }
    if let Some(message) = view.banner_message() {
        lines.push(format!("  ⚠️  {message}"));
    }

    lines.join("\n")
}
