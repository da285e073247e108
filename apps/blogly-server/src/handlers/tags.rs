//! Tag handlers.

use actix_web::{HttpResponse, web};
use blogly_shared::ApiResponse;
use blogly_shared::dto::{TagDetailResponse, TagForm};

use super::{flash, views};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /tags
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.tags.list().await?;
    let tags: Vec<_> = tags.iter().map(views::tag).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(tags)))
}

/// POST /tags/new
pub async fn create(state: web::Data<AppState>, form: web::Form<TagForm>) -> HttpResponse {
    let outcome = state.tags.create(&form.name).await;
    flash::redirect(outcome)
}

/// GET /tags/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let tag = state.tags.get(id).await?;
    let posts = state.tags.posts(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(TagDetailResponse {
        tag: views::tag(&tag),
        posts: posts.iter().map(views::post).collect(),
    })))
}

/// POST /tags/{id}/edit
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<TagForm>,
) -> HttpResponse {
    let outcome = state.tags.update(path.into_inner(), &form.name).await;
    flash::redirect(outcome)
}

/// POST /tags/{id}/delete
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> HttpResponse {
    let outcome = state.tags.delete(path.into_inner()).await;
    flash::redirect(outcome)
}
