mod admin;
mod authentication;
mod authorization;
mod headers;
mod helpers;
