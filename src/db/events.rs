//! Contains the event specific database structs and queries
use super::Result;
use crate::db::schema::{events, guests, rsvps};
use crate::db::DbInterface;
use crate::diesel::Connection;
use crate::diesel::ExpressionMethods;
use crate::diesel::QueryDsl;
use chrono::NaiveDateTime;
use diesel::result::Error;
use diesel::{Identifiable, Queryable};
use diesel::{QueryResult, RunQueryDsl};

/// Diesel event struct
///
/// Is used as a result in various queries. Represents an event row
#[derive(Debug, Clone, Queryable, Identifiable)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub location: String,
    pub owner_id: i64,
}

/// Diesel insertable event struct
///
/// Represents fields that have to be provided on event insertion.
#[derive(Debug, Insertable)]
#[table_name = "events"]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub location: String,
    pub owner_id: i64,
}

/// Diesel event struct for updates
///
/// Is used in update queries. None fields will be ignored on update queries
#[derive(Debug, AsChangeset)]
#[table_name = "events"]
pub struct ModifyEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub location: Option<String>,
}

impl ModifyEvent {
    /// Returns true when no field is set, i.e. an update would be a no-op.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.location.is_none()
    }
}

impl DbInterface {
    pub fn create_event(&self, new_event: NewEvent) -> Result<Event> {
        let con = self.get_con()?;

        let event_result = diesel::insert_into(events::table)
            .values(new_event)
            .get_result(&con);

        match event_result {
            Ok(event) => Ok(event),
            Err(e) => {
                log::error!("Query error creating new event, {}", e);
                Err(e.into())
            }
        }
    }

    /// Returns a page of the events owned by the given user.
    pub fn get_owned_events(&self, owner_id: i64, skip: i64, limit: i64) -> Result<Vec<Event>> {
        let con = self.get_con()?;

        let events_result: QueryResult<Vec<Event>> = events::table
            .filter(events::columns::owner_id.eq(owner_id))
            .order(events::columns::id)
            .offset(skip)
            .limit(limit)
            .get_results(&con);

        match events_result {
            Ok(events) => Ok(events),
            Err(e) => {
                log::error!("Query error getting owned events, {}", e);
                Err(e.into())
            }
        }
    }

    /// Returns the event with the given id, without any ownership filter.
    pub fn get_event(&self, event_id: i64) -> Result<Option<Event>> {
        let con = self.get_con()?;

        let result: QueryResult<Event> = events::table
            .filter(events::columns::id.eq(event_id))
            .get_result(&con);

        match result {
            Ok(event) => Ok(Some(event)),
            Err(Error::NotFound) => Ok(None),
            Err(e) => {
                log::error!("Query error getting event by id, {}", e);
                Err(e.into())
            }
        }
    }

    /// Returns the event with the given id only when it is owned by `owner_id`.
    ///
    /// A missing event and an event owned by someone else are
    /// indistinguishable for the caller.
    pub fn get_event_scoped(&self, event_id: i64, owner_id: i64) -> Result<Option<Event>> {
        let con = self.get_con()?;

        let result: QueryResult<Event> = events::table
            .filter(events::columns::id.eq(event_id))
            .filter(events::columns::owner_id.eq(owner_id))
            .get_result(&con);

        match result {
            Ok(event) => Ok(Some(event)),
            Err(Error::NotFound) => Ok(None),
            Err(e) => {
                log::error!("Query error getting scoped event, {}", e);
                Err(e.into())
            }
        }
    }

    /// Applies the set fields of `changes` to the event owned by `owner_id`.
    pub fn modify_event_scoped(
        &self,
        event_id: i64,
        owner_id: i64,
        changes: ModifyEvent,
    ) -> Result<Event> {
        let con = self.get_con()?;

        let target = events::table
            .filter(events::columns::id.eq(event_id))
            .filter(events::columns::owner_id.eq(owner_id));

        let event_result: QueryResult<Event> = diesel::update(target).set(changes).get_result(&con);

        match event_result {
            Ok(event) => Ok(event),
            Err(Error::NotFound) => Err(super::DatabaseError::NotFound),
            Err(e) => {
                log::error!("Query error modifying event, {}", e);
                Err(e.into())
            }
        }
    }

    /// Deletes the event owned by `owner_id` together with its guests and
    /// RSVPs in a single transaction.
    pub fn delete_event_scoped(&self, event_id: i64, owner_id: i64) -> Result<()> {
        let con = self.get_con()?;

        con.transaction::<(), super::DatabaseError, _>(|| {
            let owned: QueryResult<i64> = events::table
                .filter(events::columns::id.eq(event_id))
                .filter(events::columns::owner_id.eq(owner_id))
                .select(events::columns::id)
                .get_result(&con);

            match owned {
                Ok(_) => {}
                Err(Error::NotFound) => return Err(super::DatabaseError::NotFound),
                Err(e) => {
                    log::error!("Query error checking event ownership, {}", e);
                    return Err(e.into());
                }
            }

            diesel::delete(rsvps::table.filter(rsvps::columns::event_id.eq(event_id)))
                .execute(&con)?;
            diesel::delete(guests::table.filter(guests::columns::event_id.eq(event_id)))
                .execute(&con)?;
            diesel::delete(events::table.filter(events::columns::id.eq(event_id)))
                .execute(&con)?;

            Ok(())
        })
    }
}
