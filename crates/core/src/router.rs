#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Recommendations,
}

#[derive(Debug, Clone, Copy)]
pub struct RouteRecord {
    pub path: &'static str,
    pub name: &'static str,
    pub route: Route,
}

pub const ROUTES: &[RouteRecord] = &[
    RouteRecord {
        path: "/",
        name: "home",
        route: Route::Home,
    },
    RouteRecord {
        path: "/recommendations",
        name: "recommendations",
        route: Route::Recommendations,
    },
];

impl Route {
    fn record(self) -> &'static RouteRecord {
        match self {
            Route::Home => &ROUTES[0],
            Route::Recommendations => &ROUTES[1],
        }
    }

    pub fn path(self) -> &'static str {
        self.record().path
    }

    pub fn name(self) -> &'static str {
        self.record().name
    }
}

/// Resolves a location to a route. Query string, fragment and one trailing slash
/// are ignored; unknown paths resolve to `None`.
pub fn resolve(location: &str) -> Option<Route> {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let path = match path.strip_suffix('/') {
        Some(rest) if !rest.is_empty() => rest,
        _ => path,
    };

    ROUTES.iter().find(|r| r.path == path).map(|r| r.route)
}

pub fn resolve_name(name: &str) -> Option<Route> {
    ROUTES.iter().find(|r| r.name == name).map(|r| r.route)
}
