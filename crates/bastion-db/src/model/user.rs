use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable)]
#[diesel(table_name = schema::users)]
#[diesel(primary_key(username))]
#[diesel(check_for_backend(Pg))]
pub struct User {
    pub username: String,
    pub password: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = schema::authorities)]
#[diesel(primary_key(username, authority))]
#[diesel(belongs_to(User, foreign_key = username))]
#[diesel(check_for_backend(Pg))]
pub struct Authority {
    pub username: String,
    pub authority: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::authorities)]
pub struct NewAuthority<'a> {
    pub username: &'a str,
    pub authority: &'a str,
}
