// Domain layer: models and ports. No engine logic lives here.

pub mod model;
pub mod ports;
