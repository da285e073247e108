//! HTTP handlers and route configuration.

mod flash;
mod health;
mod posts;
mod tags;
mod users;
mod views;

use actix_web::{HttpResponse, http::header, web};

/// GET / - the user list is the home page.
async fn home() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/users"))
        .finish()
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/api/health", web::get().to(health::health_check))
        .service(
            web::scope("/users")
                .route("", web::get().to(users::list))
                .route("/new", web::post().to(users::create))
                .route("/{id}", web::get().to(users::show))
                .route("/{id}/edit", web::post().to(users::update))
                .route("/{id}/delete", web::post().to(users::delete))
                .route("/{id}/posts/new", web::get().to(users::new_post_form))
                .route("/{id}/posts/new", web::post().to(posts::create)),
        )
        .service(
            web::scope("/posts")
                .route("/{id}", web::get().to(posts::show))
                .route("/{id}/edit", web::get().to(posts::edit_form))
                .route("/{id}/edit", web::post().to(posts::update))
                .route("/{id}/delete", web::post().to(posts::delete)),
        )
        .service(
            web::scope("/tags")
                .route("", web::get().to(tags::list))
                .route("/new", web::post().to(tags::create))
                .route("/{id}", web::get().to(tags::show))
                .route("/{id}/edit", web::post().to(tags::update))
                .route("/{id}/delete", web::post().to(tags::delete)),
        );
}
