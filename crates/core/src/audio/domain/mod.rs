pub mod audio_buffer;
pub mod audio_codec;
pub mod degenerate_silence;
pub mod energy_analyzer;
pub mod silence_point_finder;
pub mod silence_trimmer;
pub mod splitter;
pub mod timing_adjuster;
pub mod word_timing;
