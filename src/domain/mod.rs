// Domain layer: records, public views and ports. No knowledge of HTTP or files.

pub mod model;
pub mod ports;
