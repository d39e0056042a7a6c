//! Auth related API structs and Endpoints
use crate::api::v1::{ApiError, INVALID_CREDENTIALS};
use crate::auth::{password, TokenContext};
use crate::db::users as db_users;
use crate::db::DbInterface;
use actix_web::web::{Data, Form, Json};
use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The JSON body expected when making a *POST* request on `/auth/signup`
#[derive(Debug, Deserialize, Validate)]
pub struct SignUp {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Public user profile
///
/// Never contains the password or its digest.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// The form body expected when making a *POST* request on `/auth/login`
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// JSON body of the response coming from the *POST* request on `/auth/login`
#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// API Endpoint *POST /auth/signup*
///
/// Registers a new user from the provided [`SignUp`] body. The password is
/// stored as a one-way digest. Fails with a 400 when the username or email
/// is already taken.
#[post("/auth/signup")]
pub async fn signup(
    db_ctx: Data<DbInterface>,
    sign_up: Json<SignUp>,
) -> Result<Json<UserProfile>, ApiError> {
    let sign_up = sign_up.into_inner();

    if sign_up.validate().is_err() {
        return Err(ApiError::ValidationFailed);
    }

    let db_user = web::block(move || -> Result<db_users::User, ApiError> {
        let existing = db_ctx.get_user_by_username_or_email(&sign_up.username, &sign_up.email)?;

        if existing.is_some() {
            return Err(ApiError::Conflict(
                "Username or Email already exists.".to_string(),
            ));
        }

        let new_user = db_users::NewUser {
            username: sign_up.username,
            email: sign_up.email,
            password_digest: password::digest_password(&sign_up.password),
        };

        Ok(db_ctx.create_user(new_user)?)
    })
    .await
    .map_err(|e| {
        log::error!("BlockingError on POST /auth/signup - {}", e);
        ApiError::Internal
    })??;

    Ok(Json(UserProfile {
        id: db_user.id,
        username: db_user.username,
        email: db_user.email,
    }))
}

/// API Endpoint *POST /auth/login*
///
/// Authenticates a user via the provided [`LoginForm`] and returns a bearer
/// access token. An unknown username and a wrong password both resolve to
/// the same 401 response.
#[post("/auth/login")]
pub async fn login(
    db_ctx: Data<DbInterface>,
    token_ctx: Data<TokenContext>,
    form: Form<LoginForm>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let LoginForm { username, password } = form.into_inner();

    let db_user = web::block(move || -> Result<Option<db_users::User>, ApiError> {
        Ok(db_ctx.get_user_by_username(&username)?)
    })
    .await
    .map_err(|e| {
        log::error!("BlockingError on POST /auth/login - {}", e);
        ApiError::Internal
    })??;

    let db_user = match db_user {
        Some(user) if password::verify_password(&password, &user.password_digest) => user,
        _ => {
            return Err(ApiError::auth_bearer_invalid_token(
                INVALID_CREDENTIALS,
                "Incorrect username or password".to_string(),
            ));
        }
    };

    let access_token = token_ctx.issue_access_token(db_user.id).map_err(|e| {
        log::error!("Failed to issue access token, {}", e);
        ApiError::Internal
    })?;

    Ok(Json(AccessTokenResponse {
        access_token,
        token_type: "bearer",
    }))
}
