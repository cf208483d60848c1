//! Locate command handler: geocode a single address.

use std::io::Write;

use anyhow::Result;
use tracing::debug;

use streetroute_lib::Geocoder;

use crate::commands::{explain_failure, Sources};
use streetroute_cli::output::OutputFormat;

/// Handle the locate subcommand.
pub fn handle_locate<W: Write>(
    out: &mut W,
    sources: &Sources,
    address: &str,
    format: OutputFormat,
) -> Result<()> {
    let resolver = sources.resolver()?;
    let place = resolver
        .lookup(address)
        .map_err(|err| explain_failure(err, &resolver, None))?;
    debug!(address, coordinate = %place.coordinate, "located address");
    format.render_place(out, &place)?;
    Ok(())
}
