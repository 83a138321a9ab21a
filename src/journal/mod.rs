mod controller;
mod error;
mod history;
mod models;
pub mod service;

pub use controller::*;
pub use error::*;
pub use history::*;
pub use models::*;
pub use service::{HttpJournalService, JournalService, ServiceConfig};
