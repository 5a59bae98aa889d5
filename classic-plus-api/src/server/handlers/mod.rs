// HTTP request handlers, one module per route group
pub mod admin;
pub mod auth;
pub mod health;
pub mod pins;
pub mod survey;
pub mod votes;
