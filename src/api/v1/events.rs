//! Event related API structs and Endpoints
//!
//! The defined structs are exposed to the REST API and will be serialized/deserialized. Similar
//! structs are defined in the Database module [`crate::db`] for database operations.
//!
//! All endpoints require authentication and scope their queries to the
//! requesting user. A request for an event owned by someone else resolves to
//! a 404, indistinguishable from a missing event.
use crate::api::v1::ApiError;
use crate::db::events as db_events;
use crate::db::users::User;
use crate::db::DbInterface;
use actix_web::web::{Data, Json, Path, Query, ReqData};
use actix_web::{delete, get, post, put, web};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An Event
///
/// Contains all event information. Is only accessible to the owner.
#[derive(Debug, Serialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub location: String,
    pub owner_id: i64,
}

impl From<db_events::Event> for Event {
    fn from(db_event: db_events::Event) -> Self {
        Self {
            id: db_event.id,
            title: db_event.title,
            description: db_event.description,
            date: db_event.date,
            location: db_event.location,
            owner_id: db_event.owner_id,
        }
    }
}

/// API request parameters to create a new event
#[derive(Debug, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub location: String,
}

/// API request parameters to modify an event.
///
/// Only the provided fields are applied.
#[derive(Debug, Deserialize)]
pub struct ModifyEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub location: Option<String>,
}

/// Pagination query parameters for the event list
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// JSON body of the *DELETE /events/{event_id}* response
#[derive(Debug, Serialize)]
pub struct DeletionConfirmation {
    pub detail: &'static str,
}

/// API Endpoint *POST /events/*
///
/// Uses the provided [`NewEvent`] to create a new event owned by the
/// requesting user. Returns the created [`Event`].
#[post("/events/")]
pub async fn new(
    db_ctx: Data<DbInterface>,
    current_user: ReqData<User>,
    new_event: Json<NewEvent>,
) -> Result<Json<Event>, ApiError> {
    let new_event = new_event.into_inner();

    let db_event = web::block(move || -> Result<db_events::Event, ApiError> {
        let new_event = db_events::NewEvent {
            title: new_event.title,
            description: new_event.description,
            date: new_event.date,
            location: new_event.location,
            owner_id: current_user.id,
        };

        Ok(db_ctx.create_event(new_event)?)
    })
    .await
    .map_err(|e| {
        log::error!("BlockingError on POST /events/ - {}", e);
        ApiError::Internal
    })??;

    Ok(Json(db_event.into()))
}

/// API Endpoint *GET /events/*
///
/// Returns a JSON array of the events owned by the requesting user,
/// paginated by the `skip`/`limit` query parameters (defaults 0/50).
#[get("/events/")]
pub async fn owned(
    db_ctx: Data<DbInterface>,
    current_user: ReqData<User>,
    pagination: Query<Pagination>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let pagination = pagination.into_inner();

    let db_events = web::block(move || -> Result<Vec<db_events::Event>, ApiError> {
        Ok(db_ctx.get_owned_events(current_user.id, pagination.skip, pagination.limit)?)
    })
    .await
    .map_err(|e| {
        log::error!("BlockingError on GET /events/ - {}", e);
        ApiError::Internal
    })??;

    let events = db_events.into_iter().map(Event::from).collect::<Vec<_>>();

    Ok(Json(events))
}

/// API Endpoint *GET /events/{event_id}*
///
/// Returns the specified event when it is owned by the requesting user.
#[get("/events/{event_id}")]
pub async fn get(
    db_ctx: Data<DbInterface>,
    current_user: ReqData<User>,
    event_id: Path<i64>,
) -> Result<Json<Event>, ApiError> {
    let event_id = event_id.into_inner();

    let db_event = web::block(move || -> Result<db_events::Event, ApiError> {
        match db_ctx.get_event_scoped(event_id, current_user.id)? {
            None => Err(ApiError::NotFound),
            Some(event) => Ok(event),
        }
    })
    .await
    .map_err(|e| {
        log::error!("BlockingError on GET /events/{{event_id}} - {}", e);
        ApiError::Internal
    })??;

    Ok(Json(db_event.into()))
}

/// API Endpoint *PUT /events/{event_id}*
///
/// Uses the provided [`ModifyEvent`] to partially update the specified
/// event. An empty body returns the event unchanged. Returns the updated
/// [`Event`].
#[put("/events/{event_id}")]
pub async fn modify(
    db_ctx: Data<DbInterface>,
    current_user: ReqData<User>,
    event_id: Path<i64>,
    modify_event: Json<ModifyEvent>,
) -> Result<Json<Event>, ApiError> {
    let event_id = event_id.into_inner();
    let modify_event = modify_event.into_inner();

    let db_event = web::block(move || -> Result<db_events::Event, ApiError> {
        let changes = db_events::ModifyEvent {
            title: modify_event.title,
            description: modify_event.description,
            date: modify_event.date,
            location: modify_event.location,
        };

        if changes.is_empty() {
            return match db_ctx.get_event_scoped(event_id, current_user.id)? {
                None => Err(ApiError::NotFound),
                Some(event) => Ok(event),
            };
        }

        Ok(db_ctx.modify_event_scoped(event_id, current_user.id, changes)?)
    })
    .await
    .map_err(|e| {
        log::error!("BlockingError on PUT /events/{{event_id}} - {}", e);
        ApiError::Internal
    })??;

    Ok(Json(db_event.into()))
}

/// API Endpoint *DELETE /events/{event_id}*
///
/// Deletes the specified event together with its guests and RSVPs.
#[delete("/events/{event_id}")]
pub async fn delete(
    db_ctx: Data<DbInterface>,
    current_user: ReqData<User>,
    event_id: Path<i64>,
) -> Result<Json<DeletionConfirmation>, ApiError> {
    let event_id = event_id.into_inner();

    web::block(move || -> Result<(), ApiError> {
        Ok(db_ctx.delete_event_scoped(event_id, current_user.id)?)
    })
    .await
    .map_err(|e| {
        log::error!("BlockingError on DELETE /events/{{event_id}} - {}", e);
        ApiError::Internal
    })??;

    Ok(Json(DeletionConfirmation {
        detail: "Event deleted",
    }))
}
