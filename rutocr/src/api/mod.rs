mod extractors;
mod handlers;
mod openapi;
mod response;
mod routes;
mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
