pub mod easy_ship;

pub use crate::domain::model::{Operation, Parameters, ParsedResponse};
pub use crate::domain::ports::{OperationBuilder, Transport};
pub use crate::utils::error::Result;
