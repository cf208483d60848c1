mod common;

use streetroute_lib::{plan_route, RouteRenderMode, RouteRequest, RouteSummary, WeightKind};

use common::{gazetteer, provider};

fn fixture_summary(weight: WeightKind) -> RouteSummary {
    let request = RouteRequest::new("Grand Place", "Place Rogier").with_weight(weight);
    let plan = plan_route(&gazetteer(), &provider(), &request).expect("route planned");
    RouteSummary::from_plan(&plan).expect("summary builds")
}

#[test]
fn summary_from_plan_populates_endpoints() {
    let summary = fixture_summary(WeightKind::Length);

    assert_eq!(summary.origin.address, "Grand Place");
    assert_eq!(
        summary.origin.display_name.as_deref(),
        Some("Grand-Place, Brussels")
    );
    assert_eq!(summary.origin.node, 101);
    assert_eq!(summary.destination.node, 104);
    assert_eq!(summary.segments, 3);
    assert_eq!(summary.steps.len(), 4);
    assert_eq!(summary.steps[2].node, 103);
}

#[test]
fn plain_text_render_names_places() {
    let text = fixture_summary(WeightKind::Time).render(RouteRenderMode::PlainText);
    assert!(text.starts_with(
        "Route: Grand-Place, Brussels -> Place Charles Rogier, Saint-Josse-ten-Noode (drive, shortest by time)"
    ));
    assert!(text.contains("node 105"));
}

#[test]
fn geojson_line_follows_route_nodes() {
    let summary = fixture_summary(WeightKind::Time);
    let geojson = summary.to_geojson();

    let line = geojson["features"][0]["geometry"]["coordinates"]
        .as_array()
        .expect("line coordinates");
    assert_eq!(line.len(), 3);
    assert_eq!(line[1][0], 4.36);
    assert_eq!(line[1][1], 50.847);
    assert_eq!(geojson["features"][0]["properties"]["weight"], "time");
    assert_eq!(
        geojson["features"][2]["properties"]["address"],
        "Place Rogier"
    );
}
