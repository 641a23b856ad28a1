use crate::app::router::{AUTH_ENDPOINTS, MAIN_ENDPOINTS, auth_routes, main_routes};
use crate::doctor::report::{Detail, Mark};
use crate::doctor::{Check, CheckContext, CheckFuture, CheckOutcome};

pub struct RoutesCheck;

impl Check for RoutesCheck {
    fn name(&self) -> &'static str {
        "Routes"
    }

    fn title(&self) -> &'static str {
        "ROUTES CHECK"
    }

    fn run<'a>(&'a self, _ctx: &'a CheckContext) -> CheckFuture<'a> {
        Box::pin(async move { check_routes() })
    }
}

/// Never returns a failing outcome. Its only failure mode is a panic while
/// building a route group, which the runner reports as a failed check.
fn check_routes() -> CheckOutcome {
    let mut detail = Detail::default();

    let main = main_routes();
    let auth = auth_routes();
    detail
        .block("Building Route Groups:")
        .pass(format!("Main routes ({})", main.name))
        .pass(format!("Auth routes ({})", auth.name));

    let endpoints = detail.block("Route Endpoints:");
    endpoints.note("Main routes:");
    for path in MAIN_ENDPOINTS {
        endpoints.nested(Mark::Pass, path);
    }
    endpoints.note("");
    endpoints.note("Auth routes:");
    for path in AUTH_ENDPOINTS {
        endpoints.nested(Mark::Pass, path);
    }

    CheckOutcome::new(true, detail)
}
