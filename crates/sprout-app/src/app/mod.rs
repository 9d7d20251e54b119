pub mod api;

use salvo::cors::{AllowOrigin, Cors};
use salvo::http::{Method, header};
use salvo::{Router, Service};

/// ## Summary
/// Wraps the router in a service that answers CORS requests from any origin.
#[must_use]
pub fn service(router: Router) -> Service {
    let cors = Cors::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .into_handler();

    Service::new(router).hoop(cors)
}
