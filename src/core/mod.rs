pub mod engine;

pub use crate::domain::ports::{CarrierApi, Transport};
pub use crate::utils::error::Result;
pub use engine::ShippingEngine;
