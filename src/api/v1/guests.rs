//! Guest and invitation related API structs and Endpoints
//!
//! All operations are owner-only: the event is looked up scoped to the
//! requesting user and a foreign event resolves to a 404.
use crate::api::v1::ApiError;
use crate::db::guests as db_guests;
use crate::db::users::User;
use crate::db::DbInterface;
use actix_web::web::{Data, Json, Path, ReqData};
use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A guest of an event
#[derive(Debug, Serialize)]
pub struct Guest {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub email: String,
}

impl From<db_guests::Guest> for Guest {
    fn from(db_guest: db_guests::Guest) -> Self {
        Self {
            id: db_guest.id,
            event_id: db_guest.event_id,
            name: db_guest.name,
            email: db_guest.email,
        }
    }
}

/// API request parameters to add a single guest
#[derive(Debug, Deserialize, Validate)]
pub struct NewGuest {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

/// API request parameters for the batch invite
#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub guest_emails: Vec<String>,
}

/// API Endpoint *POST /events/{event_id}/guests/*
///
/// Adds a guest to the specified event (owner only).
#[post("/events/{event_id}/guests/")]
pub async fn add(
    db_ctx: Data<DbInterface>,
    current_user: ReqData<User>,
    event_id: Path<i64>,
    new_guest: Json<NewGuest>,
) -> Result<Json<Guest>, ApiError> {
    let event_id = event_id.into_inner();
    let new_guest = new_guest.into_inner();

    if new_guest.validate().is_err() {
        return Err(ApiError::ValidationFailed);
    }

    let db_guest = web::block(move || -> Result<db_guests::Guest, ApiError> {
        let event = match db_ctx.get_event_scoped(event_id, current_user.id)? {
            None => return Err(ApiError::NotFound),
            Some(event) => event,
        };

        let new_guest = db_guests::NewGuest {
            event_id: event.id,
            name: new_guest.name,
            email: new_guest.email,
            invited_by_user_id: current_user.id,
            responded: false,
        };

        Ok(db_ctx.create_guest(new_guest)?)
    })
    .await
    .map_err(|e| {
        log::error!("BlockingError on POST /events/{{event_id}}/guests/ - {}", e);
        ApiError::Internal
    })??;

    Ok(Json(db_guest.into()))
}

/// API Endpoint *GET /events/{event_id}/guests/*
///
/// Returns a JSON array of all guests of the specified event (owner only).
#[get("/events/{event_id}/guests/")]
pub async fn list(
    db_ctx: Data<DbInterface>,
    current_user: ReqData<User>,
    event_id: Path<i64>,
) -> Result<Json<Vec<Guest>>, ApiError> {
    let event_id = event_id.into_inner();

    let db_guests = web::block(move || -> Result<Vec<db_guests::Guest>, ApiError> {
        if db_ctx.get_event_scoped(event_id, current_user.id)?.is_none() {
            return Err(ApiError::NotFound);
        }

        Ok(db_ctx.get_guests_for_event(event_id)?)
    })
    .await
    .map_err(|e| {
        log::error!("BlockingError on GET /events/{{event_id}}/guests/ - {}", e);
        ApiError::Internal
    })??;

    let guests = db_guests.into_iter().map(Guest::from).collect::<Vec<_>>();

    Ok(Json(guests))
}

/// API Endpoint *POST /events/{event_id}/invite/*
///
/// Batch invites guests by email (owner only). For each email a guest is
/// created only when no guest with that email exists for the event yet; the
/// display name defaults to the local part of the email. Returns the newly
/// created guests.
#[post("/events/{event_id}/invite/")]
pub async fn invite(
    db_ctx: Data<DbInterface>,
    current_user: ReqData<User>,
    event_id: Path<i64>,
    invite_request: Json<InviteRequest>,
) -> Result<Json<Vec<Guest>>, ApiError> {
    let event_id = event_id.into_inner();
    let invite_request = invite_request.into_inner();

    if !invite_request
        .guest_emails
        .iter()
        .all(|email| validator::validate_email(email.as_str()))
    {
        return Err(ApiError::ValidationFailed);
    }

    let db_guests = web::block(move || -> Result<Vec<db_guests::Guest>, ApiError> {
        if db_ctx.get_event_scoped(event_id, current_user.id)?.is_none() {
            return Err(ApiError::NotFound);
        }

        let mut created = Vec::new();

        for email in invite_request.guest_emails {
            if db_ctx
                .get_guest_by_event_and_email(event_id, &email)?
                .is_some()
            {
                continue;
            }

            let new_guest = db_guests::NewGuest {
                event_id,
                name: local_part(&email).to_string(),
                email,
                invited_by_user_id: current_user.id,
                responded: false,
            };

            created.push(db_ctx.create_guest(new_guest)?);
        }

        Ok(created)
    })
    .await
    .map_err(|e| {
        log::error!("BlockingError on POST /events/{{event_id}}/invite/ - {}", e);
        ApiError::Internal
    })??;

    let guests = db_guests.into_iter().map(Guest::from).collect::<Vec<_>>();

    Ok(Json(guests))
}

/// Returns the local part of an email address, used as the default guest
/// display name.
fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[cfg(test)]
mod tests {
    use super::local_part;

    #[test]
    fn local_part_of_regular_address() {
        assert_eq!(local_part("bob@x.com"), "bob");
    }

    #[test]
    fn local_part_keeps_only_first_segment() {
        assert_eq!(local_part("bob@x@y"), "bob");
    }

    #[test]
    fn local_part_without_at_sign() {
        assert_eq!(local_part("bob"), "bob");
    }
}
