//! User handlers.

use actix_web::{HttpResponse, web};
use blogly_core::domain::UserFields;
use blogly_shared::ApiResponse;
use blogly_shared::dto::{NewPostFormResponse, UserDetailResponse, UserForm};

use super::{flash, views};
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn fields(form: UserForm) -> UserFields {
    UserFields {
        first_name: form.first_name,
        last_name: form.last_name,
        image_url: form.image_url,
    }
}

/// GET /users
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = state.users.list().await?;
    let users: Vec<_> = users.iter().map(views::user).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(users)))
}

/// POST /users/new
pub async fn create(state: web::Data<AppState>, form: web::Form<UserForm>) -> HttpResponse {
    let outcome = state.users.create(&fields(form.into_inner())).await;
    flash::redirect(outcome)
}

/// GET /users/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let user = state.users.get(id).await?;
    let posts = state.users.posts(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserDetailResponse {
        user: views::user(&user),
        posts: posts.iter().map(views::post).collect(),
    })))
}

/// POST /users/{id}/edit
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<UserForm>,
) -> HttpResponse {
    let outcome = state
        .users
        .update(path.into_inner(), &fields(form.into_inner()))
        .await;
    flash::redirect(outcome)
}

/// POST /users/{id}/delete
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> HttpResponse {
    let outcome = state.users.delete(path.into_inner()).await;
    flash::redirect(outcome)
}

/// GET /users/{id}/posts/new
pub async fn new_post_form(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let user = state.users.get(path.into_inner()).await?;
    let tags = state.tags.list().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(NewPostFormResponse {
        user: views::user(&user),
        tags: views::tag_choices(&tags, &Default::default()),
    })))
}
