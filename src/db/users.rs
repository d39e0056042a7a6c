//! Contains the user specific database structs and queries
use super::Result;
use crate::db::schema::users;
use crate::db::DbInterface;
use crate::diesel::BoolExpressionMethods;
use crate::diesel::ExpressionMethods;
use crate::diesel::QueryDsl;
use diesel::result::Error;
use diesel::{Identifiable, Queryable};
use diesel::{QueryResult, RunQueryDsl};

/// Diesel user struct
///
/// Is used as a result in various queries. Represents a user row
#[derive(Debug, Clone, Queryable, Identifiable)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_digest: String,
}

/// Diesel insertable user struct
///
/// Represents fields that have to be provided on user insertion.
#[derive(Debug, Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_digest: String,
}

impl DbInterface {
    pub fn create_user(&self, new_user: NewUser) -> Result<User> {
        let con = self.get_con()?;

        let user_result = diesel::insert_into(users::table)
            .values(new_user)
            .get_result(&con);

        match user_result {
            Ok(user) => Ok(user),
            Err(e) => {
                log::error!("Query error creating new user, {}", e);
                Err(e.into())
            }
        }
    }

    pub fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let con = self.get_con()?;

        let result: QueryResult<User> = users::table
            .filter(users::columns::id.eq(user_id))
            .get_result(&con);

        match result {
            Ok(user) => Ok(Some(user)),
            Err(Error::NotFound) => Ok(None),
            Err(e) => {
                log::error!("Query error getting user by id, {}", e);
                Err(e.into())
            }
        }
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let con = self.get_con()?;

        let result: QueryResult<User> = users::table
            .filter(users::columns::username.eq(username))
            .get_result(&con);

        match result {
            Ok(user) => Ok(Some(user)),
            Err(Error::NotFound) => Ok(None),
            Err(e) => {
                log::error!("Query error getting user by username, {}", e);
                Err(e.into())
            }
        }
    }

    /// Returns any user holding the given username or email address.
    ///
    /// Is used on signup to reject duplicates before inserting.
    pub fn get_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>> {
        let con = self.get_con()?;

        let result: QueryResult<User> = users::table
            .filter(
                users::columns::username
                    .eq(username)
                    .or(users::columns::email.eq(email)),
            )
            .first(&con);

        match result {
            Ok(user) => Ok(Some(user)),
            Err(Error::NotFound) => Ok(None),
            Err(e) => {
                log::error!("Query error getting user by username or email, {}", e);
                Err(e.into())
            }
        }
    }
}
