// Domain layer: carrier-neutral models, per-operation options, wire envelope, result wrapper and ports.

pub mod model;
pub mod options;
pub mod ports;
pub mod result;
pub mod wire;
