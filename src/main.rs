use clap::Parser;
use easyship::config::cli::{CliConfig, Command};
use easyship::utils::{logger, validation::Validate};
use easyship::{
    EasyShipClient, EasyShipError, MwsTransport, ParsedResponse, ScheduledPackageId,
    ServiceStatus,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting easyship CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let transport = MwsTransport::new(
        &config.endpoint,
        &config.seller_id,
        &config.access_key_id,
        Duration::from_secs(config.timeout_seconds),
    )?;
    let client = EasyShipClient::new(transport);

    let result = dispatch(&client, &config.command).await;

    match result {
        Ok(response) => {
            if let Command::GetServiceStatus = config.command {
                if let Some(status) = extract_service_status(&response) {
                    println!("Service status: {}", status);
                }
            }
            println!("{}", serde_json::to_string_pretty(&response.payload)?);
        }
        Err(e) => {
            tracing::error!("{} failed: {}", operation_name(&config.command), e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn dispatch<T: easyship::Transport>(
    client: &EasyShipClient<T>,
    command: &Command,
) -> Result<ParsedResponse, EasyShipError> {
    match command {
        Command::GetServiceStatus => client.get_service_status().await,
        Command::ListPickupSlots {
            marketplace_id,
            amazon_order_id,
            dimensions_file,
            weight_file,
        } => {
            let dimensions = read_json(dimensions_file)?;
            let weight = read_json(weight_file)?;
            client
                .list_pickup_slots(marketplace_id, amazon_order_id, &dimensions, &weight)
                .await
        }
        Command::CreateScheduledPackage {
            marketplace_id,
            amazon_order_id,
            details_file,
        } => {
            let details = read_json(details_file)?;
            client
                .create_scheduled_package(marketplace_id, amazon_order_id, &details)
                .await
        }
        Command::UpdateScheduledPackages {
            marketplace_id,
            updates_file,
        } => {
            let updates: Vec<easyship::ScheduledPackageUpdateDetails> = read_json(updates_file)?;
            client
                .update_scheduled_packages(marketplace_id, &updates)
                .await
        }
        Command::GetScheduledPackage {
            marketplace_id,
            amazon_order_id,
            package_id,
        } => {
            let scheduled_package_id = ScheduledPackageId {
                amazon_order_id: amazon_order_id.clone(),
                package_id: package_id.clone(),
            };
            client
                .get_scheduled_package(marketplace_id, &scheduled_package_id)
                .await
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, EasyShipError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn extract_service_status(response: &ParsedResponse) -> Option<ServiceStatus> {
    response.payload["GetServiceStatusResponse"]["GetServiceStatusResult"]["Status"]
        .as_str()
        .and_then(|s| s.parse().ok())
}

fn operation_name(command: &Command) -> &'static str {
    match command {
        Command::GetServiceStatus => "GetServiceStatus",
        Command::ListPickupSlots { .. } => "ListPickupSlots",
        Command::CreateScheduledPackage { .. } => "CreateScheduledPackage",
        Command::UpdateScheduledPackages { .. } => "UpdateScheduledPackages",
        Command::GetScheduledPackage { .. } => "GetScheduledPackage",
    }
}
