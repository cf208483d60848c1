//! Interactive session: edit a route form line by line and plan it on `go`.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::debug;

use streetroute_lib::{
    RegionStrategy, RouteForm, TravelMode, WeightKind, DEFAULT_AROUND_DISTANCE_M,
};

use crate::commands::route::run_request;
use crate::commands::{Resolver, Sources};
use streetroute_cli::output::OutputFormat;

const HELP: &str = "\
Commands:
  from <address>     set the origin
  to <address>       set the destination
  mode <walk|drive|bike>
  weight <length|time>
  margin <degrees>   pad the endpoints' envelope
  around [metres]    fetch a square around the origin
  place <name>       fetch the extent of a named place
  show               print the current form
  go                 plan the route
  reset              clear the form
  quit               leave the session";

/// Outcome of one session line.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

/// Run the interactive session until `quit` or end of input.
///
/// A failed `go` reports the error and keeps the form, so a single field can
/// be corrected and the request retried.
pub fn run_session<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    sources: &Sources,
    format: OutputFormat,
) -> Result<()> {
    let resolver = sources.resolver()?;
    let mut form = RouteForm::new();
    writeln!(out, "streetroute session. Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(line, "session command");
        if handle_line(line, &mut form, out, sources, &resolver, format)? == Step::Quit {
            break;
        }
    }
    Ok(())
}

fn handle_line<W: Write>(
    line: &str,
    form: &mut RouteForm,
    out: &mut W,
    sources: &Sources,
    resolver: &Resolver,
    format: OutputFormat,
) -> Result<Step> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_ascii_lowercase().as_str() {
        "from" => form.set_origin(rest),
        "to" => form.set_destination(rest),
        "mode" => match rest.parse::<TravelMode>() {
            Ok(mode) => form.set_mode(mode),
            Err(err) => writeln!(out, "error: {err}")?,
        },
        "weight" => match rest.parse::<WeightKind>() {
            Ok(weight) => form.set_weight(weight),
            Err(err) => writeln!(out, "error: {err}")?,
        },
        "margin" => match rest.parse::<f64>() {
            Ok(margin) => form.set_region(RegionStrategy::Envelope { margin }),
            Err(_) => writeln!(out, "error: margin must be a number of degrees")?,
        },
        "around" => {
            let distance = if rest.is_empty() {
                Ok(DEFAULT_AROUND_DISTANCE_M)
            } else {
                rest.parse::<f64>()
            };
            match distance {
                Ok(distance_m) => form.set_region(RegionStrategy::AroundOrigin { distance_m }),
                Err(_) => writeln!(out, "error: distance must be a number of metres")?,
            }
        }
        "place" => {
            if rest.is_empty() {
                writeln!(out, "error: place needs a name")?;
            } else {
                form.set_region(RegionStrategy::Place {
                    name: rest.to_string(),
                });
            }
        }
        "show" => show_form(out, form)?,
        "go" => match form.request() {
            Some(request) => {
                if let Err(err) = run_request(out, sources, resolver, &request, format) {
                    writeln!(out, "error: {err}")?;
                }
            }
            None => writeln!(out, "error: set both 'from' and 'to' before 'go'")?,
        },
        "reset" => {
            form.reset();
            writeln!(out, "form cleared")?;
        }
        "help" | "?" => writeln!(out, "{HELP}")?,
        "quit" | "exit" => return Ok(Step::Quit),
        other => writeln!(out, "unknown command '{other}'; type 'help'")?,
    }
    Ok(Step::Continue)
}

fn show_form<W: Write>(out: &mut W, form: &RouteForm) -> std::io::Result<()> {
    let blank = |value: &str| {
        if value.is_empty() {
            "(unset)".to_string()
        } else {
            value.to_string()
        }
    };
    writeln!(out, "from:   {}", blank(&form.origin))?;
    writeln!(out, "to:     {}", blank(&form.destination))?;
    writeln!(out, "mode:   {}", form.mode)?;
    writeln!(out, "weight: {}", form.weight)?;
    writeln!(out, "region: {}", form.region)
}
