//! Editable route form backing interactive sessions.

use serde::Serialize;

use crate::graph::{TravelMode, WeightKind};
use crate::pipeline::RouteRequest;
use crate::region::RegionStrategy;

/// Request-scoped form state. Fields are edited one at a time and turned into
/// a [`RouteRequest`] once both addresses are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteForm {
    pub origin: String,
    pub destination: String,
    pub mode: TravelMode,
    pub weight: WeightKind,
    pub region: RegionStrategy,
}

impl RouteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_origin(&mut self, address: impl Into<String>) {
        self.origin = address.into().trim().to_string();
    }

    pub fn set_destination(&mut self, address: impl Into<String>) {
        self.destination = address.into().trim().to_string();
    }

    pub fn set_mode(&mut self, mode: TravelMode) {
        self.mode = mode;
    }

    pub fn set_weight(&mut self, weight: WeightKind) {
        self.weight = weight;
    }

    pub fn set_region(&mut self, region: RegionStrategy) {
        self.region = region;
    }

    /// Whether both addresses are filled in.
    pub fn is_complete(&self) -> bool {
        !self.origin.is_empty() && !self.destination.is_empty()
    }

    /// The request described by the form, or `None` while an address is
    /// missing.
    pub fn request(&self) -> Option<RouteRequest> {
        self.is_complete().then(|| {
            RouteRequest::new(self.origin.clone(), self.destination.clone())
                .with_mode(self.mode)
                .with_weight(self.weight)
                .with_region(self.region.clone())
        })
    }

    /// Clear every field back to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_requires_both_addresses() {
        let mut form = RouteForm::new();
        assert!(form.request().is_none());

        form.set_origin("Grand Place");
        assert!(form.request().is_none());

        form.set_destination("   ");
        assert!(form.request().is_none(), "blank destination is missing");

        form.set_destination(" Place Rogier ");
        let request = form.request().unwrap();
        assert_eq!(request.origin, "Grand Place");
        assert_eq!(request.destination, "Place Rogier");
        assert_eq!(request.mode, TravelMode::Drive);
        assert_eq!(request.weight, WeightKind::Length);
    }

    #[test]
    fn request_carries_edited_options() {
        let mut form = RouteForm::new();
        form.set_origin("a");
        form.set_destination("b");
        form.set_mode(TravelMode::Bike);
        form.set_weight(WeightKind::Time);
        form.set_region(RegionStrategy::Envelope { margin: 0.02 });

        let request = form.request().unwrap();
        assert_eq!(request.mode, TravelMode::Bike);
        assert_eq!(request.weight, WeightKind::Time);
        assert_eq!(request.region, RegionStrategy::Envelope { margin: 0.02 });
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = RouteForm::new();
        form.set_origin("a");
        form.set_destination("b");
        form.set_mode(TravelMode::Walk);
        form.reset();
        assert_eq!(form, RouteForm::default());
        assert!(form.request().is_none());
    }
}
