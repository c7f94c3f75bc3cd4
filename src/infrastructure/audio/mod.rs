mod duration_prober;
mod ffmpeg_transcoder;

pub use duration_prober::{WavDurationProber, probe_duration};
pub use ffmpeg_transcoder::{FfmpegTranscoder, check_ffmpeg_binary};
