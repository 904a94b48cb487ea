use crate::domain::model::{
    PackageDimensions, PackageRequestDetails, PackageWeight, Parameters, ParsedResponse,
    ScheduledPackageId, ScheduledPackageUpdateDetails,
};
use crate::domain::ports::{OperationBuilder, Transport};
use crate::utils::error::Result;
use serde_json::Value;

/// Facade over the Easy Ship operations of the marketplace web service.
///
/// Each method builds the parameter mapping for one remote action and
/// submits it through the injected transport as a single call. The facade
/// holds no state across calls and performs no validation, retries, or
/// error translation of its own; whatever the transport yields is returned
/// to the caller unchanged.
pub struct EasyShipClient<T: Transport> {
    transport: T,
}

impl<T: Transport> EasyShipClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    fn operation(&self, name: &str) -> OperationBuilder<'_, T> {
        OperationBuilder::new(&self.transport, name)
    }

    /// Returns time slots available for package pickup, based on the
    /// package dimensions and weight the seller specifies.
    pub async fn list_pickup_slots(
        &self,
        marketplace_id: &str,
        amazon_order_id: &str,
        package_dimensions: &PackageDimensions,
        package_weight: &PackageWeight,
    ) -> Result<ParsedResponse> {
        let mut params = Parameters::new();
        params.insert("MarketplaceId", Value::String(marketplace_id.to_string()));
        params.insert("AmazonOrderId", Value::String(amazon_order_id.to_string()));
        params.insert("PackageDimensions", serde_json::to_value(package_dimensions)?);
        params.insert("PackageWeight", serde_json::to_value(package_weight)?);

        self.operation("ListPickupSlots").add(params).run().await
    }

    /// Schedules a pickup slot for an order, marking it WaitingForPickup on
    /// the service side and generating the shipping label and invoice.
    pub async fn create_scheduled_package(
        &self,
        marketplace_id: &str,
        amazon_order_id: &str,
        package_request_details: &PackageRequestDetails,
    ) -> Result<ParsedResponse> {
        let mut params = Parameters::new();
        params.insert("MarketplaceId", Value::String(marketplace_id.to_string()));
        params.insert("AmazonOrderId", Value::String(amazon_order_id.to_string()));
        params.insert(
            "PackageRequestDetails",
            serde_json::to_value(package_request_details)?,
        );

        self.operation("CreateScheduledPackage").add(params).run().await
    }

    /// Moves already-scheduled packages to new pickup slots.
    pub async fn update_scheduled_packages(
        &self,
        marketplace_id: &str,
        update_details_list: &[ScheduledPackageUpdateDetails],
    ) -> Result<ParsedResponse> {
        let mut params = Parameters::new();
        params.insert("MarketplaceId", Value::String(marketplace_id.to_string()));
        params.insert(
            "ScheduledPackageUpdateDetailsList",
            serde_json::to_value(update_details_list)?,
        );

        self.operation("UpdateScheduledPackages").add(params).run().await
    }

    /// Returns dimensions, weight, pickup slot, invoice and status
    /// information for a scheduled package.
    pub async fn get_scheduled_package(
        &self,
        marketplace_id: &str,
        scheduled_package_id: &ScheduledPackageId,
    ) -> Result<ParsedResponse> {
        let mut params = Parameters::new();
        params.insert("MarketplaceId", Value::String(marketplace_id.to_string()));
        params.insert(
            "ScheduledPackageId",
            serde_json::to_value(scheduled_package_id)?,
        );

        self.operation("GetScheduledPackage").add(params).run().await
    }

    /// Returns the operational status of the Easy Ship API section.
    /// Status values are GREEN, YELLOW, and RED.
    pub async fn get_service_status(&self) -> Result<ParsedResponse> {
        self.operation("GetServiceStatus").run().await
    }
}
