//! Core of the wordplay archive: the joke model, the WhatsApp chat importer,
//! catalog queries and the ports implemented by the storage and export adapters.

pub mod application;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod favorites;
pub mod importer;
pub mod ports;
pub mod utils;

pub use error::{ArchiveError, Result};
