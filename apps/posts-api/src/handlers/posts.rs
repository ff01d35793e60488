//! Post CRUD handlers.

use actix_web::{HttpResponse, web};

use posts_core::domain::{PostDraft, PostPatch};
use posts_shared::ApiResponse;
use posts_shared::dto::{CreatedPostResponse, MessageResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post with id {} not found", id)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// GET /api/posts/slug/{slug}
pub async fn get_post_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let post = state
        .posts
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post with slug {} not found", slug)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<PostDraft>,
) -> AppResult<HttpResponse> {
    let id = state.posts.create(body.into_inner()).await?;
    tracing::info!(post_id = %id, "Post created");

    Ok(HttpResponse::Created().json(CreatedPostResponse { id }))
}

/// PATCH /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PostPatch>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.update(&id, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::success("Post updated")))
}

/// DELETE /api/posts/{id} - soft delete
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete(&id).await?;
    tracing::info!(post_id = %id, "Post deleted");

    Ok(HttpResponse::Ok().json(MessageResponse::success("Post deleted")))
}

/// OPTIONS on any post route - CORS preflight.
pub async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}
