// Domain layer: records, results and the ports the import core talks through.

pub mod model;
pub mod ports;
pub mod value;
