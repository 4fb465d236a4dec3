pub mod constants;
pub mod segmentation_config;
pub mod time_range;
