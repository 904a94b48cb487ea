use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "easyship")]
#[command(about = "Issue Easy Ship operations against the marketplace web service")]
pub struct CliConfig {
    #[arg(long, default_value = "https://mws.amazonservices.in")]
    pub endpoint: String,

    #[arg(long)]
    pub seller_id: String,

    #[arg(long)]
    pub access_key_id: String,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check the operational status of the Easy Ship API section
    GetServiceStatus,

    /// List available pickup slots for an order
    ListPickupSlots {
        #[arg(long)]
        marketplace_id: String,
        #[arg(long)]
        amazon_order_id: String,
        #[arg(long, help = "JSON file with the package dimensions")]
        dimensions_file: String,
        #[arg(long, help = "JSON file with the package weight")]
        weight_file: String,
    },

    /// Schedule a pickup slot for an order
    CreateScheduledPackage {
        #[arg(long)]
        marketplace_id: String,
        #[arg(long)]
        amazon_order_id: String,
        #[arg(long, help = "JSON file with the package request details")]
        details_file: String,
    },

    /// Move scheduled packages to new pickup slots
    UpdateScheduledPackages {
        #[arg(long)]
        marketplace_id: String,
        #[arg(long, help = "JSON file with the list of update details")]
        updates_file: String,
    },

    /// Retrieve status and details of a scheduled package
    GetScheduledPackage {
        #[arg(long)]
        marketplace_id: String,
        #[arg(long)]
        amazon_order_id: String,
        #[arg(long)]
        package_id: Option<String>,
    },
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("endpoint", &self.endpoint)?;
        validation::validate_non_empty_string("seller_id", &self.seller_id)?;
        validation::validate_non_empty_string("access_key_id", &self.access_key_id)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        Ok(())
    }
}
