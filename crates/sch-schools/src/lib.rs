//! School records and their HTTP surface.
//!
//! ## Records
//!
//! - [`School`] — Full stored row
//! - [`SchoolSummary`] — List projection
//! - [`NewSchool`] — Validated create input
//! - [`Fields`] — Raw submitted form fields
//!
//! ## Storage
//!
//! - [`SchoolRepository`] — Storage operations, implemented for
//!   [`sch_pg::Postgres`] and for the in-process [`Memory`] store
//!
//! ## Uploads
//!
//! - [`Uploads`] — Validates and persists uploaded images
//! - [`Image`] — A stored upload
//!
//! ## HTTP Handlers
//!
//! With the `server` feature, [`handlers`] exposes the actix-web routes and
//! [`Failure`] maps every error onto a status code and JSON body.
mod dto;
mod error;
mod memory;
mod repository;
mod schema;
mod school;
mod upload;

pub use dto::*;
pub use error::*;
pub use memory::*;
pub use repository::*;
pub use school::*;
pub use upload::*;

#[cfg(feature = "server")]
mod form;
#[cfg(feature = "server")]
pub mod handlers;
#[cfg(feature = "server")]
pub use form::*;
