//! Route command handler for computing street routes between two addresses.

use std::io::Write;

use anyhow::Result;
use tracing::info;

use streetroute_lib::{
    plan_route, RegionStrategy, RouteRequest, RouteSummary, TravelMode, WeightKind,
};

use crate::commands::{explain_failure, Resolver, Sources};
use streetroute_cli::output::OutputFormat;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Origin address.
    pub from: String,
    /// Destination address.
    pub to: String,
    pub mode: TravelMode,
    pub weight: WeightKind,
    /// How the downloaded area is chosen.
    pub region: RegionStrategy,
}

impl RouteCommandArgs {
    /// Convert CLI args to a library RouteRequest.
    pub fn to_request(&self) -> RouteRequest {
        RouteRequest::new(self.from.clone(), self.to.clone())
            .with_mode(self.mode)
            .with_weight(self.weight)
            .with_region(self.region.clone())
    }
}

/// Handle the route subcommand.
pub fn handle_route<W: Write>(
    out: &mut W,
    sources: &Sources,
    args: &RouteCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let resolver = sources.resolver()?;
    let request = args.to_request();
    run_request(out, sources, &resolver, &request, format)
}

/// Plan `request` and render it. Shared with the interactive session.
pub fn run_request<W: Write>(
    out: &mut W,
    sources: &Sources,
    resolver: &Resolver,
    request: &RouteRequest,
    format: OutputFormat,
) -> Result<()> {
    let provider = sources.provider()?;
    let plan = plan_route(resolver, provider.as_ref(), request)
        .map_err(|err| explain_failure(err, resolver, Some(request)))?;
    let summary = RouteSummary::from_plan(&plan)?;
    info!(
        segments = summary.segments,
        length_m = summary.total_length_m,
        "route ready"
    );
    format.render_route(out, &summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_carry_into_request() {
        let args = RouteCommandArgs {
            from: "Grand Place".to_string(),
            to: "Place Rogier".to_string(),
            mode: TravelMode::Walk,
            weight: WeightKind::Time,
            region: RegionStrategy::AroundOrigin { distance_m: 500.0 },
        };
        let request = args.to_request();
        assert_eq!(request.origin, "Grand Place");
        assert_eq!(request.mode, TravelMode::Walk);
        assert_eq!(request.weight, WeightKind::Time);
        assert_eq!(
            request.region,
            RegionStrategy::AroundOrigin { distance_m: 500.0 }
        );
    }
}
