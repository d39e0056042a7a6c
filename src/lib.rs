//! Core library of the *Party Planner API*
//!
//! Provides the database interface, the JWT token context and the REST
//! endpoints. The binary in `main.rs` wires everything together; the app
//! assembly lives here so integration tests can drive the same service
//! configuration through `actix_web::test`.
#[macro_use]
extern crate diesel;

use crate::api::v1::middleware::token_auth::TokenAuth;
use crate::auth::TokenContext;
use crate::db::DbInterface;
use actix_web::web::{self, Data, ServiceConfig};

pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod settings;

/// Returns a closure used to configure an actix app with all API services.
///
/// Public routes (health check, signup, login) are registered directly, all
/// other routes are wrapped in the [`TokenAuth`] middleware which resolves
/// the bearer token to a database user.
pub fn configure_app(
    db_ctx: Data<DbInterface>,
    token_ctx: Data<TokenContext>,
) -> impl FnOnce(&mut ServiceConfig) {
    move |app| {
        app.app_data(db_ctx.clone())
            .app_data(token_ctx.clone())
            .service(api::v1::health)
            .service(api::v1::auth::signup)
            .service(api::v1::auth::login)
            .service(
                web::scope("")
                    .wrap(TokenAuth { db_ctx, token_ctx })
                    .service(api::v1::events::new)
                    .service(api::v1::events::owned)
                    .service(api::v1::events::get)
                    .service(api::v1::events::modify)
                    .service(api::v1::events::delete)
                    .service(api::v1::guests::add)
                    .service(api::v1::guests::list)
                    .service(api::v1::guests::invite)
                    .service(api::v1::rsvps::submit)
                    .service(api::v1::rsvps::get_own),
            );
    }
}
