use crate::domain::model::{Operation, Parameters, ParsedResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Seam to the shared client that owns authentication, transport, and
/// response parsing. One invocation submits exactly one remote call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn run(&self, operation: Operation) -> Result<ParsedResponse>;
}

/// Builder for a single remote call: `operation(name).add(params).run()`.
pub struct OperationBuilder<'a, T: Transport + ?Sized> {
    transport: &'a T,
    operation: Operation,
}

impl<'a, T: Transport + ?Sized> OperationBuilder<'a, T> {
    pub fn new(transport: &'a T, name: &str) -> Self {
        Self {
            transport,
            operation: Operation::new(name),
        }
    }

    /// Attaches parameters to the pending operation. Chainable; later
    /// entries with the same name replace earlier ones.
    pub fn add(mut self, parameters: Parameters) -> Self {
        for (name, value) in parameters.iter() {
            self.operation.parameters.insert(name, value.clone());
        }
        self
    }

    /// Submits the operation through the transport and returns its parsed
    /// response unchanged.
    pub async fn run(self) -> Result<ParsedResponse> {
        self.transport.run(self.operation).await
    }
}
