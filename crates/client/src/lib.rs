pub mod display;
pub mod error;
pub mod export;
pub mod gateway;
pub mod participations;
pub mod prize;
pub mod ranking;
pub mod refresh;
pub mod registration;
pub mod share;
pub mod state;
pub mod tasks;

pub use error::{ClientError, Result};
pub use gateway::{FunctionGateway, HttpGateway};
pub use state::ViewState;
