//! querydeck - structured, parameterized table queries over HTTP
//!
//! A client connects to a MySQL database, receives a session token, and
//! then asks for table contents through a JSON query request. Requests are
//! validated into a [`query::QuerySpec`], assembled into one parameterized
//! `SELECT`, and run on the session's connection pool.

pub mod cli;
pub mod config;
pub mod executor;
pub mod http_server;
pub mod query;
pub mod session;
