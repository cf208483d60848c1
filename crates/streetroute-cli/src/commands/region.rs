//! Region command handler: show the area fetched for a pair of addresses.

use std::io::Write;

use anyhow::Result;

use streetroute_lib::{BoundingBox, Geocoder};

use crate::commands::{explain_failure, Sources};
use streetroute_cli::output::{OutputFormat, RegionReport};

/// Handle the region subcommand.
///
/// Only geocodes; no street data is downloaded.
pub fn handle_region<W: Write>(
    out: &mut W,
    sources: &Sources,
    from: &str,
    to: &str,
    margin: f64,
    format: OutputFormat,
) -> Result<()> {
    let resolver = sources.resolver()?;
    let origin = resolver
        .lookup(from)
        .map_err(|err| explain_failure(err, &resolver, None))?;
    let destination = resolver
        .lookup(to)
        .map_err(|err| explain_failure(err, &resolver, None))?;
    let bbox = BoundingBox::enclosing(origin.coordinate, destination.coordinate, margin)?;

    let report = RegionReport {
        origin,
        destination,
        margin,
        bbox,
    };
    format.render_region(out, &report)?;
    Ok(())
}
