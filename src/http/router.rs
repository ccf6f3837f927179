use crate::stub::catalogue::CATALOGUE_PATH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// CORS preflight, only recognised when CORS is enabled.
    Preflight,
    /// `GET /endpoints`.
    Catalogue,
    /// Any other method on `/endpoints`.
    CatalogueMethodNotAllowed,
    /// Everything else is looked up in the registry.
    Stub,
}

pub fn find_route(method: &str, path: &str, cors: bool) -> Route {
    if cors && method.eq_ignore_ascii_case("OPTIONS") {
        return Route::Preflight;
    }
    if path == CATALOGUE_PATH {
        return if method == "GET" {
            Route::Catalogue
        } else {
            Route::CatalogueMethodNotAllowed
        };
    }
    Route::Stub
}
