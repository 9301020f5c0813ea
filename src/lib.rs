//! # Classtable Backend
//!
//! Backend engine for a personal weekly class-timetable manager.
//!
//! Each user owns one [`models::ScheduleDocument`]: a start date, an IANA
//! timezone, the enabled weekdays, an ordered set of time slots, and a list of
//! course placements carrying week-range and odd/even parity rules. The heart
//! of the crate is the occurrence engine in [`services::occurrence`], which
//! computes for any instant the current week number, the cells with a class
//! running right now, the next slot starting within 15 minutes, and the full
//! per-cell course grid. Every renderer (the authenticated viewer, the public
//! share viewer, the printable full view) consumes that single engine through
//! the REST API instead of re-deriving week/period/parity logic.
//!
//! ## Architecture
//!
//! - [`api`]: public DTO surface shared by the service and HTTP layers
//! - [`models`]: the schedule document, course placements and the compact
//!   week/period wire syntaxes
//! - [`services`]: pure business logic (occurrence resolution, validation,
//!   CSV import)
//! - [`db`]: repository trait and the in-memory implementation
//! - [`http`]: axum-based REST server consumed by the schedule renderers

pub mod api;

pub mod db;
pub mod models;

pub mod services;

pub mod http;
