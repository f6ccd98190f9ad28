// Domain layer: venue models and the ports to the hosted backend and the
// mapping APIs. Adapters live under `crate::adapters`.

pub mod model;
pub mod ports;
