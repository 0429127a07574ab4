mod device;

pub use device::{Device, LinkMode, Port, PortState};
