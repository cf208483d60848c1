//! Output formatting for the CLI.
//!
//! Every renderer writes to a caller-supplied [`Write`] so the interactive
//! session and one-shot commands share the same code.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use streetroute_lib::output::{format_distance, format_duration};
use streetroute_lib::{BoundingBox, Place, RouteRenderMode, RouteSummary};

use crate::terminal::{divider, ColorPalette};

/// Snap distances above this are highlighted in text output.
const FAR_SNAP_M: f64 = 100.0;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// Markdown summary.
    Rich,
    /// Pretty-printed JSON.
    Json,
    /// GeoJSON FeatureCollection, ready for any web map.
    Geojson,
}

impl OutputFormat {
    /// Render a planned route.
    pub fn render_route<W: Write>(self, out: &mut W, summary: &RouteSummary) -> io::Result<()> {
        match self {
            OutputFormat::Text => RouteRenderer::new(ColorPalette::detect()).render(out, summary),
            OutputFormat::Rich => write!(out, "{}", summary.render(RouteRenderMode::RichText)),
            OutputFormat::Json => write_json(out, summary),
            OutputFormat::Geojson => write_json(out, &summary.to_geojson()),
        }
    }

    /// Render a geocoded place.
    pub fn render_place<W: Write>(self, out: &mut W, place: &Place) -> io::Result<()> {
        match self {
            OutputFormat::Text | OutputFormat::Rich => {
                let name = place.display_name.as_deref().unwrap_or(&place.query);
                writeln!(out, "{name}: {}", place.coordinate)
            }
            OutputFormat::Json => write_json(out, place),
            OutputFormat::Geojson => write_json(
                out,
                &serde_json::json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [place.coordinate.lon(), place.coordinate.lat()],
                    },
                    "properties": {
                        "address": place.query,
                        "display_name": place.display_name,
                    }
                }),
            ),
        }
    }

    /// Render the bounding box derived for a pair of places.
    pub fn render_region<W: Write>(self, out: &mut W, region: &RegionReport) -> io::Result<()> {
        match self {
            OutputFormat::Text | OutputFormat::Rich => {
                writeln!(
                    out,
                    "Region around {} and {} (margin {} deg):",
                    region.origin.coordinate, region.destination.coordinate, region.margin
                )?;
                writeln!(out, "  {}", region.bbox)
            }
            OutputFormat::Json => write_json(out, region),
            OutputFormat::Geojson => {
                let b = &region.bbox;
                write_json(
                    out,
                    &serde_json::json!({
                        "type": "Feature",
                        "bbox": [b.west, b.south, b.east, b.north],
                        "geometry": {
                            "type": "Polygon",
                            "coordinates": [[
                                [b.west, b.south],
                                [b.east, b.south],
                                [b.east, b.north],
                                [b.west, b.north],
                                [b.west, b.south],
                            ]],
                        },
                        "properties": { "margin": region.margin }
                    }),
                )
            }
        }
    }
}

/// Result of the `region` command.
#[derive(Debug, Clone, Serialize)]
pub struct RegionReport {
    pub origin: Place,
    pub destination: Place,
    pub margin: f64,
    pub bbox: BoundingBox,
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    out.write_all(b"\n")
}

/// Text renderer with tagged endpoints and a totals footer.
pub struct RouteRenderer {
    palette: ColorPalette,
}

impl RouteRenderer {
    #[must_use]
    pub const fn new(palette: ColorPalette) -> Self {
        Self { palette }
    }

    pub fn render<W: Write>(&self, out: &mut W, summary: &RouteSummary) -> io::Result<()> {
        let p = &self.palette;
        let origin = endpoint_name(&summary.origin);
        let destination = endpoint_name(&summary.destination);

        writeln!(
            out,
            "Route from {}{}{} to {}{}{} ({}, by {}):",
            p.white_bold, origin, p.reset, p.white_bold, destination, p.reset, summary.mode,
            summary.weight
        )?;

        let len = summary.steps.len();
        for (i, step) in summary.steps.iter().enumerate() {
            let (tag_color, tag_text) = if i == 0 {
                (p.tag_start, " FROM ")
            } else if i + 1 == len {
                (p.tag_goal, "  TO  ")
            } else {
                (p.tag_via, " VIA  ")
            };
            writeln!(
                out,
                "{}{}{} node {} {}({}){}",
                tag_color, tag_text, p.reset, step.node, p.gray, step.coordinate, p.reset
            )?;
        }

        self.render_snap(out, "origin", summary.origin.snap_distance_m)?;
        self.render_snap(out, "destination", summary.destination.snap_distance_m)?;
        self.render_footer(out, summary)
    }

    fn render_snap<W: Write>(&self, out: &mut W, label: &str, distance_m: f64) -> io::Result<()> {
        if distance_m <= FAR_SNAP_M {
            return Ok(());
        }
        let p = &self.palette;
        writeln!(
            out,
            "{}note:{} {label} is {} from the nearest street node",
            p.orange,
            p.reset,
            format_distance(distance_m)
        )
    }

    fn render_footer<W: Write>(&self, out: &mut W, summary: &RouteSummary) -> io::Result<()> {
        let p = &self.palette;
        writeln!(out)?;
        writeln!(out, "{}{}{}", p.gray, divider(39), p.reset)?;
        writeln!(
            out,
            "  {}Distance:{}  {}{}{}",
            p.cyan,
            p.reset,
            p.white_bold,
            format_distance(summary.total_length_m),
            p.reset
        )?;
        writeln!(
            out,
            "  {}Time:{}      {}{}{}",
            p.green,
            p.reset,
            p.white_bold,
            format_duration(summary.total_time_s),
            p.reset
        )?;
        writeln!(out, "  Segments:  {}", summary.segments)
    }
}

fn endpoint_name(endpoint: &streetroute_lib::output::RouteEndpoint) -> &str {
    endpoint
        .display_name
        .as_deref()
        .unwrap_or(&endpoint.address)
}
