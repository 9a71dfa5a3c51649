//! Route tables.
//!
//! `auth_scope` is public apart from logout, which wraps its single
//! resource in the bearer middleware. `api_scope` wraps everything and
//! must be registered after the auth scope so the public routes are
//! matched first.

use actix_web::dev::HttpServiceFactory;
use actix_web::web;

use crate::handlers::{auth, comments, likes, subscriptions, users, videos};
use crate::middleware::JwtAuth;

pub fn auth_scope(auth_mw: JwtAuth) -> impl HttpServiceFactory {
    web::scope("/api/v1/auth")
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .route("/refresh", web::post().to(auth::refresh))
        .service(
            web::resource("/logout")
                .wrap(auth_mw)
                .route(web::post().to(auth::logout)),
        )
}

pub fn api_scope(auth_mw: JwtAuth) -> impl HttpServiceFactory {
    web::scope("/api/v1")
        .wrap(auth_mw)
        .service(
            web::scope("/users")
                .route("/me", web::get().to(users::me))
                .route("/history", web::get().to(users::history))
                .route("/c/{username}", web::get().to(users::channel)),
        )
        .service(
            web::scope("/videos")
                .service(
                    web::resource("")
                        .route(web::get().to(videos::list_videos))
                        .route(web::post().to(videos::publish_video)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(videos::get_video))
                        .route(web::patch().to(videos::update_video))
                        .route(web::delete().to(videos::delete_video)),
                )
                .route("/{id}/publish", web::patch().to(videos::toggle_publish))
                .service(
                    web::resource("/{id}/comments")
                        .route(web::get().to(comments::list_comments))
                        .route(web::post().to(comments::add_comment)),
                ),
        )
        .service(
            web::scope("/comments").service(
                web::resource("/{id}")
                    .route(web::patch().to(comments::update_comment))
                    .route(web::delete().to(comments::delete_comment)),
            ),
        )
        .service(
            web::scope("/likes")
                .route("/videos", web::get().to(likes::liked_videos))
                .route(
                    "/video/{id}/toggle",
                    web::post().to(likes::toggle_video_like),
                )
                .route(
                    "/comment/{id}/toggle",
                    web::post().to(likes::toggle_comment_like),
                ),
        )
        .service(
            web::scope("/subscriptions")
                .route(
                    "/subscribed",
                    web::get().to(subscriptions::list_subscribed_channels),
                )
                .route(
                    "/channel/{id}/toggle",
                    web::post().to(subscriptions::toggle_subscription),
                )
                .route(
                    "/channel/{id}/subscribers",
                    web::get().to(subscriptions::list_subscribers),
                ),
        )
}
