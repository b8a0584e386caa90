// Domain layer: bet model and ports. No transport types here.

pub mod model;
pub mod ports;
