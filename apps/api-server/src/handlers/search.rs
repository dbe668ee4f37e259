//! Geo-proximity search handler.

use actix_web::{HttpResponse, web};

use around_core::domain::Post;
use around_shared::dto::{LocationResponse, PostResponse, SearchParams};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /search?lat=&lon=&range=
pub async fn search_posts(
    identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<SearchParams>,
) -> AppResult<HttpResponse> {
    let SearchParams { lat, lon, range } = query.into_inner();
    tracing::info!(user = %identity.username, lat, lon, ?range, "Received one request for search");

    let posts = state.search.search(lat, lon, range).await?;
    let body: Vec<PostResponse> = posts.into_iter().map(post_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        user: post.user,
        message: post.message,
        location: LocationResponse {
            lat: post.location.lat,
            lon: post.location.lon,
        },
        url: post.url,
    }
}
