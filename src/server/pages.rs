use crate::entities::{RoutePlan, RouteSummary};

const STYLE: &str = "body { font-family: sans-serif; margin: 2em; } \
                     label { display: block; margin-top: 1em; } \
                     input[type=text] { width: 28em; }";

fn layout(title: &str, body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n",
            "<style>{style}</style>\n</head>\n<body>\n{body}</body>\n</html>\n"
        ),
        title = title,
        style = STYLE,
        body = body,
    )
}

pub fn form_page() -> String {
    layout(
        "Route finder",
        concat!(
            "<h1>Route finder</h1>\n",
            "<form method=\"post\" action=\"/\">\n",
            "<label for=\"origin\">Origin</label>\n",
            "<input type=\"text\" id=\"origin\" name=\"origin\" required>\n",
            "<label for=\"destination\">Destination</label>\n",
            "<input type=\"text\" id=\"destination\" name=\"destination\" required>\n",
            "<p><button type=\"submit\">Find routes</button></p>\n",
            "</form>\n"
        ),
    )
}

fn summary_line(label: &str, summary: Option<&RouteSummary>) -> String {
    match summary {
        Some(summary) => format!(
            "<p>{}: {} km, {} min</p>\n",
            label, summary.distance_km, summary.duration_min
        ),
        None => String::new(),
    }
}

pub fn result_page(plan: &RoutePlan) -> String {
    let mut body = String::from("<h1>Routes</h1>\n");

    body.push_str(&summary_line("Shortest route", plan.shortest.as_ref()));
    body.push_str(&summary_line("Fastest route", plan.fastest.as_ref()));
    body.push_str(plan.map.as_str());
    body.push_str("<p><a href=\"/\">New search</a></p>\n");

    layout("Routes", &body)
}

#[test]
fn result_page_omits_missing_summaries() {
    use crate::entities::MapArtifact;

    let plan = RoutePlan {
        shortest: Some(RouteSummary {
            distance_km: 12,
            duration_min: 2,
        }),
        fastest: None,
        route_count: 1,
        map: MapArtifact::new("<div id=\"route-map\"></div>".into()),
    };

    let page = result_page(&plan);

    assert!(page.contains("Shortest route: 12 km, 2 min"));
    assert!(!page.contains("Fastest route"));
    assert!(page.contains("<div id=\"route-map\"></div>"));
}
