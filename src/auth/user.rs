//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The email the user registered with.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// Whether the user has confirmed their email with the verification token.
    pub email_verified: bool,
    /// The single-use token for verifying the email, cleared once used.
    pub verification_token: Option<String>,
}

/// Create the user table.
///
/// Emails are compared case-insensitively, so "Foo@bar.baz" and
/// "foo@bar.baz" cannot both be registered.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                password TEXT NOT NULL,
                email_verified INTEGER NOT NULL DEFAULT 0,
                verification_token TEXT UNIQUE
                )",
        (),
    )?;

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(2)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        email: row.get(1)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        email_verified: row.get(3)?,
        verification_token: row.get(4)?,
    })
}

/// Create and insert a new, unverified user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateEmail] if `email` is already registered,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(
    email: &str,
    password_hash: &PasswordHash,
    verification_token: &str,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .prepare(
            "INSERT INTO user (email, password, verification_token) VALUES (?1, ?2, ?3)
             RETURNING id, email, password, email_verified, verification_token",
        )?
        .query_row(
            (email, password_hash.as_ref(), verification_token),
            map_user_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref description),
            ) if description.contains("user.email") => Error::DuplicateEmail,
            error => error.into(),
        })
}

/// Get the user registered with `email`, compared case-insensitively.
///
/// # Errors
///
/// This function will return a:
/// - [Error::UnknownEmail] if no user is registered with `email`,
/// - or [Error::SqlError] if there was an error trying to access the database.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, email, password, email_verified, verification_token
             FROM user WHERE email = :email",
        )?
        .query_row(&[(":email", &email)], map_user_row)
        .optional()?
        .ok_or(Error::UnknownEmail)
}

/// Mark the user holding `verification_token` as verified and clear the token
/// so it cannot be used again.
///
/// # Errors
///
/// This function will return a:
/// - [Error::InvalidVerificationToken] if no user holds `verification_token`,
/// - or [Error::SqlError] if there was an error trying to access the database.
pub fn verify_user_email(verification_token: &str, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET email_verified = 1, verification_token = NULL
         WHERE verification_token = ?1",
        (verification_token,),
    )?;

    if rows_affected == 0 {
        return Err(Error::InvalidVerificationToken);
    }

    Ok(())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))
        .map_err(|error| error.into())
}
