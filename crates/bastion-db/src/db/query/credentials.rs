//! Queries over the `users` and `authorities` tables.

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::db::connection::DbConnection;
use crate::db::schema;
use crate::error::{DbError, DbResult};
use crate::model::user::{Authority, NewAuthority, NewUser, User};

/// ## Summary
/// Loads an enabled user together with their authority strings.
///
/// Disabled users are reported as absent.
///
/// ## Errors
/// Returns an error if either query fails.
pub async fn find_enabled_user(
    conn: &mut DbConnection<'_>,
    username: &str,
) -> DbResult<Option<(User, Vec<Authority>)>> {
    let Some(user) = schema::users::table
        .filter(schema::users::username.eq(username))
        .filter(schema::users::enabled.eq(true))
        .select(User::as_select())
        .first::<User>(conn)
        .await
        .optional()?
    else {
        return Ok(None);
    };

    let authorities = Authority::belonging_to(&user)
        .select(Authority::as_select())
        .load::<Authority>(conn)
        .await?;

    Ok(Some((user, authorities)))
}

/// ## Summary
/// Inserts a user and their authorities in a single transaction.
///
/// ## Side Effects
/// - Inserts one `users` row
/// - Inserts one `authorities` row per authority
///
/// ## Errors
/// Returns a unique-violation `DatabaseError` if the username is taken
/// (see [`DbError::is_unique_violation`]), or any other database error.
pub async fn insert_user_with_authorities(
    conn: &mut DbConnection<'_>,
    username: &str,
    password_hash: &str,
    authorities: &[String],
) -> DbResult<()> {
    let username = username.to_string();
    let password_hash = password_hash.to_string();
    let authorities = authorities.to_vec();

    conn.transaction::<_, DbError, _>(|conn| {
        async move {
            let new_user = NewUser {
                username: &username,
                password: &password_hash,
                enabled: true,
            };
            diesel::insert_into(schema::users::table)
                .values(&new_user)
                .execute(conn)
                .await?;

            let new_authorities: Vec<NewAuthority<'_>> = authorities
                .iter()
                .map(|authority| NewAuthority {
                    username: &username,
                    authority,
                })
                .collect();
            diesel::insert_into(schema::authorities::table)
                .values(&new_authorities)
                .execute(conn)
                .await?;

            Ok(())
        }
        .scope_boxed()
    })
    .await
}
