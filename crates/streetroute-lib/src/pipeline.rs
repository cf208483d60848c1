//! End-to-end route planning: geocode, fetch the region, route.

use serde::Serialize;
use tracing::info;

use crate::coord::BoundingBox;
use crate::error::{Error, Result};
use crate::geocode::{Geocoder, Place};
use crate::graph::{StreetNetwork, TravelMode, WeightKind};
use crate::network::NetworkProvider;
use crate::region::{fetch_region, RegionStrategy};
use crate::router::{Route, Router};

/// High-level route planning request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    pub mode: TravelMode,
    pub weight: WeightKind,
    pub region: RegionStrategy,
}

impl RouteRequest {
    /// Request with default mode, weight and region.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            mode: TravelMode::default(),
            weight: WeightKind::default(),
            region: RegionStrategy::default(),
        }
    }

    pub fn with_mode(mut self, mode: TravelMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_weight(mut self, weight: WeightKind) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_region(mut self, region: RegionStrategy) -> Self {
        self.region = region;
        self
    }

    /// Fail with [`Error::MissingAddress`] unless both addresses are filled.
    pub fn validate(&self) -> Result<()> {
        if self.origin.trim().is_empty() {
            return Err(Error::MissingAddress { field: "origin" });
        }
        if self.destination.trim().is_empty() {
            return Err(Error::MissingAddress {
                field: "destination",
            });
        }
        Ok(())
    }
}

/// Planned route together with everything needed to render it.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub origin: Place,
    pub destination: Place,
    pub mode: TravelMode,
    pub bbox: BoundingBox,
    pub network: StreetNetwork,
    pub route: Route,
}

/// Resolve both addresses, fetch the street network for the request's region
/// and compute the route.
pub fn plan_route<G, P>(geocoder: &G, provider: &P, request: &RouteRequest) -> Result<RoutePlan>
where
    G: Geocoder + ?Sized,
    P: NetworkProvider + ?Sized,
{
    request.validate()?;

    let origin = geocoder.lookup(request.origin.trim())?;
    let destination = geocoder.lookup(request.destination.trim())?;

    let bbox = request
        .region
        .bounding_box(origin.coordinate, destination.coordinate, geocoder)?;
    let network = fetch_region(&bbox, request.mode, provider)?;

    let route = Router::new(&network).route(
        &origin.coordinate,
        &destination.coordinate,
        request.weight,
    )?;

    info!(
        origin = %request.origin,
        destination = %request.destination,
        mode = %request.mode,
        weight = %request.weight,
        region = %request.region,
        "planned route"
    );

    Ok(RoutePlan {
        origin,
        destination,
        mode: request.mode,
        bbox,
        network,
        route,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::geocode::Gazetteer;

    struct CountingProvider {
        calls: Cell<usize>,
    }

    impl NetworkProvider for CountingProvider {
        fn fetch(&self, _bbox: &BoundingBox, mode: TravelMode) -> Result<StreetNetwork> {
            self.calls.set(self.calls.get() + 1);
            Ok(StreetNetwork::new(mode))
        }
    }

    #[test]
    fn blank_addresses_fail_before_any_lookup() {
        let provider = CountingProvider {
            calls: Cell::new(0),
        };
        let gazetteer = Gazetteer::default();

        let err = plan_route(&gazetteer, &provider, &RouteRequest::new("  ", "Somewhere"))
            .unwrap_err();
        assert!(matches!(err, Error::MissingAddress { field: "origin" }));

        let err = plan_route(&gazetteer, &provider, &RouteRequest::new("Here", ""))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAddress {
                field: "destination"
            }
        ));
        assert_eq!(provider.calls.get(), 0);
    }

    #[test]
    fn unknown_address_stops_before_fetch() {
        let provider = CountingProvider {
            calls: Cell::new(0),
        };
        let mut gazetteer = Gazetteer::default();
        gazetteer.insert("Here", 0.0, 0.0);

        let err = plan_route(&gazetteer, &provider, &RouteRequest::new("Here", "Atlantis"))
            .unwrap_err();
        assert!(matches!(err, Error::Resolution { address } if address == "Atlantis"));
        assert_eq!(provider.calls.get(), 0);
    }

    #[test]
    fn empty_region_is_fetch_error() {
        let provider = CountingProvider {
            calls: Cell::new(0),
        };
        let mut gazetteer = Gazetteer::default();
        gazetteer.insert("Here", 0.0, 0.0);
        gazetteer.insert("There", 0.0, 0.01);

        let err = plan_route(&gazetteer, &provider, &RouteRequest::new("Here", "There"))
            .unwrap_err();
        assert!(matches!(err, Error::NetworkFetch { .. }));
        assert_eq!(provider.calls.get(), 1);
    }

    #[test]
    fn builder_sets_fields() {
        let request = RouteRequest::new("a", "b")
            .with_mode(TravelMode::Walk)
            .with_weight(WeightKind::Time)
            .with_region(RegionStrategy::AroundOrigin { distance_m: 250.0 });
        assert_eq!(request.mode, TravelMode::Walk);
        assert_eq!(request.weight, WeightKind::Time);
        assert_eq!(
            request.region,
            RegionStrategy::AroundOrigin { distance_m: 250.0 }
        );
    }
}
