pub mod audio;
pub mod pipeline;
pub mod shared;
