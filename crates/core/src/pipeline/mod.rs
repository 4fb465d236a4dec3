pub mod dialog_audio_service;
pub mod pipeline_logger;
pub mod segment_dialog_use_case;
pub mod segmentation_error;
