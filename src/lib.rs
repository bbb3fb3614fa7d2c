pub mod panorama;
pub mod logger;
