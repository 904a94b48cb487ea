// Domain layer: parameter model and the transport port. No transport or
// config concerns here.

pub mod model;
pub mod ports;
