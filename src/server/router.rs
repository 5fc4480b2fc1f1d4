//! HTTP routing and OpenAPI documentation configuration.
//!
//! All API endpoints are registered here together with their OpenAPI specifications, and
//! Swagger UI serves the generated document at `/api/docs`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, model::app::AppState};

/// Builds the application's HTTP router with all API endpoints and Swagger UI documentation.
///
/// # Registered Endpoints
/// - `POST /api/comets` - Register a comet with its initial flybys
/// - `GET /api/comets` - List registered comets
/// - `GET /api/comets/{comet_id}` - Get a comet with its flybys
/// - `POST /api/comets/{comet_id}/flybys` - Record a flyby
/// - `GET /api/comets/{comet_id}/windows` - Load a comet into the session and list its windows
/// - `PUT /api/comets/{comet_id}/windows/{window_key}/selection` - Select a window
/// - `POST /api/generation` - Generate the summary of a window
/// - `GET /api/generation` - Generation status of the session
/// - `DELETE /api/generation` - Cancel the in-flight generation
/// - `GET /api/images/{image_id}` - Stored illustration bytes
///
/// The OpenAPI specification is available at `/api/docs/openapi.json`.
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "astroKapsel", description = "astroKapsel comet flyby summaries API"), tags(
        (name = controller::comet::COMET_TAG, description = "Comet registry API routes"),
        (name = controller::window::WINDOW_TAG, description = "Flyby window API routes"),
        (name = controller::generation::GENERATION_TAG, description = "Summary generation API routes"),
        (name = controller::image::IMAGE_TAG, description = "Summary illustration API routes"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(
            controller::comet::register_comet,
            controller::comet::list_comets
        ))
        .routes(routes!(controller::comet::get_comet))
        .routes(routes!(controller::comet::add_flyby))
        .routes(routes!(controller::window::get_windows))
        .routes(routes!(controller::window::select_window))
        .routes(routes!(
            controller::generation::generate_summary,
            controller::generation::get_generation_status,
            controller::generation::cancel_generation
        ))
        .routes(routes!(controller::image::get_image))
        .split_for_parts();

    routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}
