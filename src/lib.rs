pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::http::MwsTransport;
pub use crate::core::easy_ship::EasyShipClient;
pub use domain::model::{
    Operation, PackageDimensions, PackageRequestDetails, PackageWeight, Parameters,
    ParsedResponse, PickupSlot, ScheduledPackageId, ScheduledPackageUpdateDetails, ServiceStatus,
};
pub use domain::ports::{OperationBuilder, Transport};
pub use utils::error::{EasyShipError, Result};
