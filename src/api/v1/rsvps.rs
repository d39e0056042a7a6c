//! RSVP related API structs and Endpoints
use crate::api::v1::ApiError;
use crate::db::rsvps as db_rsvps;
use crate::db::users::User;
use crate::db::DbInterface;
use actix_web::web::{Data, Json, Path, ReqData};
use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

/// The status of an RSVP
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Accepted,
    Declined,
    Maybe,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Accepted => "accepted",
            RsvpStatus::Declined => "declined",
            RsvpStatus::Maybe => "maybe",
        }
    }
}

/// An RSVP of a user for an event
#[derive(Debug, Serialize)]
pub struct Rsvp {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub status: String,
}

impl From<db_rsvps::Rsvp> for Rsvp {
    fn from(db_rsvp: db_rsvps::Rsvp) -> Self {
        Self {
            id: db_rsvp.id,
            event_id: db_rsvp.event_id,
            user_id: db_rsvp.user_id,
            status: db_rsvp.status,
        }
    }
}

/// API request parameters to submit an RSVP
#[derive(Debug, Deserialize)]
pub struct SubmitRsvp {
    pub status: RsvpStatus,
}

/// API Endpoint *POST /events/{event_id}/rsvp/*
///
/// Creates or updates the requesting user's RSVP for the specified event.
/// The requesting user must either own the event or be invited with a guest
/// entry matching their email address.
#[post("/events/{event_id}/rsvp/")]
pub async fn submit(
    db_ctx: Data<DbInterface>,
    current_user: ReqData<User>,
    event_id: Path<i64>,
    submit_rsvp: Json<SubmitRsvp>,
) -> Result<Json<Rsvp>, ApiError> {
    let event_id = event_id.into_inner();
    let status = submit_rsvp.into_inner().status;

    let db_rsvp = web::block(move || -> Result<db_rsvps::Rsvp, ApiError> {
        let event = match db_ctx.get_event(event_id)? {
            None => return Err(ApiError::NotFound),
            Some(event) => event,
        };

        if event.owner_id != current_user.id {
            let guest = db_ctx.get_guest_by_event_and_email(event_id, &current_user.email)?;

            if guest.is_none() {
                return Err(ApiError::InsufficientPermission);
            }
        }

        Ok(db_ctx.upsert_rsvp(event_id, current_user.id, status.as_str().to_string())?)
    })
    .await
    .map_err(|e| {
        log::error!("BlockingError on POST /events/{{event_id}}/rsvp/ - {}", e);
        ApiError::Internal
    })??;

    Ok(Json(db_rsvp.into()))
}

/// API Endpoint *GET /events/{event_id}/rsvp/*
///
/// Returns the requesting user's RSVP for the specified event.
#[get("/events/{event_id}/rsvp/")]
pub async fn get_own(
    db_ctx: Data<DbInterface>,
    current_user: ReqData<User>,
    event_id: Path<i64>,
) -> Result<Json<Rsvp>, ApiError> {
    let event_id = event_id.into_inner();

    let db_rsvp = web::block(move || -> Result<db_rsvps::Rsvp, ApiError> {
        match db_ctx.get_rsvp_by_event_and_user(event_id, current_user.id)? {
            None => Err(ApiError::NotFound),
            Some(rsvp) => Ok(rsvp),
        }
    })
    .await
    .map_err(|e| {
        log::error!("BlockingError on GET /events/{{event_id}}/rsvp/ - {}", e);
        ApiError::Internal
    })??;

    Ok(Json(db_rsvp.into()))
}
