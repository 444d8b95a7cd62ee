#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::similar_names
)]

pub mod cli;
pub mod entity;
pub mod error;
pub mod hash_store;
pub mod index;
pub mod keys;
pub mod repository;
pub mod store;
pub mod updater;

mod logger;
mod serde;
