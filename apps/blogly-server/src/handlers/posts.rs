//! Post handlers.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use blogly_core::domain::PostFields;
use blogly_shared::ApiResponse;
use blogly_shared::dto::{EditPostFormResponse, PostDetailResponse, PostForm};

use super::{flash, views};
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn fields(raw: &HashMap<String, String>) -> PostFields {
    let form = PostForm::from_fields(raw);
    PostFields {
        title: form.title,
        content: form.content,
        tag_ids: form.tag_ids,
    }
}

/// POST /users/{id}/posts/new
pub async fn create(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<HashMap<String, String>>,
) -> HttpResponse {
    let outcome = state.posts.create(path.into_inner(), &fields(&form)).await;
    flash::redirect(outcome)
}

/// GET /posts/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state.posts.get(id).await?;
    let author = state.users.get(post.user_id).await?;
    let tags = state.posts.tags(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDetailResponse {
        post: views::post(&post),
        author: views::user(&author),
        tags: tags.iter().map(views::tag).collect(),
    })))
}

/// GET /posts/{id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state.posts.get(id).await?;
    let selected = state.posts.tag_ids(id).await?;
    let tags = state.tags.list().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(EditPostFormResponse {
        post: views::post(&post),
        tags: views::tag_choices(&tags, &selected),
    })))
}

/// POST /posts/{id}/edit
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<HashMap<String, String>>,
) -> HttpResponse {
    let outcome = state.posts.update(path.into_inner(), &fields(&form)).await;
    flash::redirect(outcome)
}

/// POST /posts/{id}/delete
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> HttpResponse {
    let outcome = state.posts.delete(path.into_inner()).await;
    flash::redirect(outcome)
}
