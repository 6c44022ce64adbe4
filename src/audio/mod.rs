pub mod analysis;
pub mod decode;
pub mod duration;
pub mod rms;
pub mod segment;
