pub mod stock_api;
pub mod stockvision;
