//! Seat watchdog server.
//!
//! Watches sold-out trains and, when the whole journey cannot be booked,
//! looks for ways to ride the same train by changing seats at intermediate
//! stops, each hop bought as its own ticket.

pub mod cache;
pub mod config;
pub mod domain;
pub mod logger;
pub mod notify;
pub mod planner;
pub mod regiojet;
pub mod scanner;
pub mod stations;
pub mod store;
pub mod web;
