use axum::{
    http::Method,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod bookings;
pub mod error;
pub mod middleware;
pub mod reviews;
pub mod rooms;
pub mod state;

pub use state::AppState;

use crate::middleware::auth::{verify_token, verify_token_email};

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    // Routes behind token verification plus the email match gate. The
    // token layer is added last so it runs first.
    let gated = Router::new()
        .route("/my-bookings", get(bookings::my_bookings))
        .route("/booking-date-update", patch(bookings::update_booking_date))
        .route("/booking-cancel", delete(bookings::cancel_booking))
        .route_layer(axum::middleware::from_fn(verify_token_email))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            verify_token,
        ));

    // Routes that require a verified identity but no email match
    let token_only = Router::new()
        .route("/review/{room_id}", patch(reviews::add_review))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            verify_token,
        ));

    Router::new()
        .route("/rooms", post(rooms::create_room).get(rooms::get_rooms))
        .route("/top-rated-room", get(rooms::get_top_rated_rooms))
        .route("/rooms/{id}", get(rooms::get_room_details))
        .route("/book-room/{id}", patch(bookings::book_room))
        .route("/latest-reviews", get(reviews::latest_reviews))
        .merge(gated)
        .merge(token_only)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
