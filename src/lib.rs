pub mod ai;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod models;
pub mod repository;
pub mod storage;

pub use dispatch::{handle, Collaborators, Envelope, Invocation, ResponseMode};
pub use error::{AppError, Result};
