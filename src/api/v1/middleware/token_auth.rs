//! Handles user authentication in API requests
use crate::api::v1::{ApiError, INVALID_ACCESS_TOKEN};
use crate::auth::TokenContext;
use crate::db::users::User;
use crate::db::DbInterface;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::Error;
use actix_web::http::header::Header;
use actix_web::web::Data;
use actix_web::{web, HttpMessage};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use core::future::ready;
use std::future::{Future, Ready};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// Middleware factory
///
/// Transforms into [`TokenAuthMiddleware`]
pub struct TokenAuth {
    pub db_ctx: Data<DbInterface>,
    pub token_ctx: Data<TokenContext>,
}

impl<S, B> Transform<S, ServiceRequest> for TokenAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = TokenAuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenAuthMiddleware {
            service: Rc::new(service),
            db_ctx: self.db_ctx.clone(),
            token_ctx: self.token_ctx.clone(),
        }))
    }
}

/// Authentication middleware
///
/// Whenever an API request is received, the TokenAuthMiddleware will validate
/// the access token and provide the associated user as [`ReqData`] for the
/// subsequent services.
///
/// [`ReqData`]: actix_web::web::ReqData
pub struct TokenAuthMiddleware<S> {
    service: Rc<S>,
    db_ctx: Data<DbInterface>,
    token_ctx: Data<TokenContext>,
}

type ResultFuture<O, E> = Pin<Box<dyn Future<Output = Result<O, E>>>>;

impl<S, B> Service<ServiceRequest> for TokenAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = ResultFuture<Self::Response, Self::Error>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let db_ctx = self.db_ctx.clone();
        let token_ctx = self.token_ctx.clone();

        Box::pin(async move {
            let auth = Authorization::<Bearer>::parse(&req).map_err(|e| {
                log::warn!("Unable to parse access token, {}", e);
                ApiError::auth_bearer_invalid_request(
                    INVALID_ACCESS_TOKEN,
                    "Unable to parse access token".to_string(),
                )
            })?;

            let access_token = auth.into_scheme().token().to_string();

            let current_user = check_access_token(db_ctx, token_ctx, &access_token).await?;

            req.extensions_mut().insert(current_user);
            service.call(req).await
        })
    }
}

/// Resolves a raw access token to the user it was issued for.
///
/// Fails with an authentication error when the token does not verify or the
/// referenced user no longer exists.
pub async fn check_access_token(
    db_ctx: Data<DbInterface>,
    token_ctx: Data<TokenContext>,
    access_token: &str,
) -> Result<User, ApiError> {
    let user_id = match token_ctx.verify_access_token(access_token) {
        Ok(user_id) => user_id,
        Err(e) => {
            log::warn!("Invalid access token, {}", e);
            return Err(ApiError::auth_bearer_invalid_token(
                INVALID_ACCESS_TOKEN,
                e.to_string(),
            ));
        }
    };

    let current_user = web::block(move || -> Result<User, ApiError> {
        match db_ctx.get_user_by_id(user_id)? {
            None => {
                // happens when a user gets deleted while a token is in circulation
                log::warn!("The requesting user could not be found in the database");
                Err(ApiError::auth_bearer_invalid_token(
                    INVALID_ACCESS_TOKEN,
                    "Could not validate credentials".to_string(),
                ))
            }
            Some(user) => Ok(user),
        }
    })
    .await
    .map_err(|e| {
        log::error!("BlockingError while checking access token - {}", e);
        ApiError::Internal
    })??;

    Ok(current_user)
}
