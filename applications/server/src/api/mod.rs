/// API route modules
pub mod health;
pub mod player;
pub mod playlists;
pub mod session;
pub mod votes;

use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application router
pub fn router(app_state: AppState) -> Router {
    let playlist_routes = Router::new()
        .route("/playlists", get(playlists::list_playlists))
        .route("/playlist/create", post(playlists::create_playlist))
        .route("/playlist/:id", get(playlists::get_playlist))
        .route("/playlist/:id/add-track", post(playlists::add_track))
        .route("/playlist/:id/external", put(playlists::link_external))
        .route("/playlist/:id/reconcile", post(playlists::reconcile))
        // Votes
        .route("/playlist/:id/vote", post(votes::vote).delete(votes::unvote))
        .route("/playlist/:id/votes/:guest_id", get(votes::votes_of));

    let player_routes = Router::new()
        .route(
            "/player/device",
            get(player::get_device)
                .put(player::bind_device)
                .delete(player::unbind_device),
        )
        .route("/player/play", post(player::play))
        .route("/player/play-context", post(player::play_context))
        .route("/player/play-playlist/:id", post(player::play_playlist))
        .route("/player/pause", post(player::pause))
        .route("/player/resume", post(player::resume))
        .route("/player/next", post(player::next))
        .route("/player/previous", post(player::previous));

    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route(
            "/session",
            post(session::set_session).delete(session::clear_session),
        )
        .merge(playlist_routes)
        .merge(player_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
