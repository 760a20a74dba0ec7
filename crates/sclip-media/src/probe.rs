//! FFprobe media information.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use sclip_models::{parse_frame_rate, MediaMetadata};

use crate::command::check_ffprobe;
use crate::error::{MediaError, MediaResult};

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

/// Probe a media file for duration, size and frame rate.
pub async fn probe(path: impl AsRef<Path>) -> MediaResult<MediaMetadata> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    check_ffprobe()?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::probe_failed(
            format!("FFprobe exited with {}", output.status),
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
        ));
    }

    let metadata = parse_probe_output(&output.stdout, path)?;
    debug!(
        "Probed {}: {:.3}s {}x{} @ {:.3}fps",
        path.display(),
        metadata.duration,
        metadata.width,
        metadata.height,
        metadata.frame_rate
    );
    Ok(metadata)
}

/// Extract metadata from raw FFprobe JSON.
fn parse_probe_output(stdout: &[u8], path: &Path) -> MediaResult<MediaMetadata> {
    let probe: FfprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| MediaError::probe_failed(format!("unparseable FFprobe output: {}", e), None))?;

    let video_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| MediaError::NoVideoStream(path.to_path_buf()))?;

    let duration = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| MediaError::missing_metadata("format.duration"))?;

    let width = video_stream
        .width
        .ok_or_else(|| MediaError::missing_metadata("stream.width"))?;
    let height = video_stream
        .height
        .ok_or_else(|| MediaError::missing_metadata("stream.height"))?;

    // r_frame_rate is the container's nominal rate; avg_frame_rate is "0/0"
    // for some streams, so it only serves as a fallback.
    let frame_rate = video_stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| video_stream.avg_frame_rate.as_deref().and_then(parse_frame_rate))
        .ok_or_else(|| MediaError::missing_metadata("stream.r_frame_rate"))?;

    Ok(MediaMetadata {
        duration,
        width,
        height,
        frame_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> MediaResult<MediaMetadata> {
        parse_probe_output(json.as_bytes(), Path::new("input.mp4"))
    }

    #[test]
    fn test_parses_first_video_stream() {
        let meta = parse(
            r#"{
                "format": {"duration": "12.480000", "size": "1024"},
                "streams": [
                    {"codec_type": "audio", "r_frame_rate": "0/0"},
                    {"codec_type": "video", "width": 1920, "height": 1080, "r_frame_rate": "30000/1001"},
                    {"codec_type": "video", "width": 320, "height": 240, "r_frame_rate": "25/1"}
                ]
            }"#,
        )
        .unwrap();

        assert!((meta.duration - 12.48).abs() < 1e-9);
        assert_eq!(meta.width, 1920);
        assert_eq!(meta.height, 1080);
        assert!((meta.frame_rate - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_falls_back_to_avg_frame_rate() {
        let meta = parse(
            r#"{
                "format": {"duration": "3.0"},
                "streams": [{"codec_type": "video", "width": 640, "height": 480,
                             "r_frame_rate": "0/0", "avg_frame_rate": "24/1"}]
            }"#,
        )
        .unwrap();
        assert!((meta.frame_rate - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_video_stream() {
        let err = parse(
            r#"{"format": {"duration": "3.0"}, "streams": [{"codec_type": "audio"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, MediaError::NoVideoStream(_)));
    }

    #[test]
    fn test_missing_duration() {
        let err = parse(
            r#"{"format": {}, "streams": [{"codec_type": "video", "width": 640, "height": 480, "r_frame_rate": "30/1"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, MediaError::MissingMetadata(ref f) if f == "format.duration"));
    }

    #[test]
    fn test_missing_dimensions() {
        let err = parse(
            r#"{"format": {"duration": "1.0"}, "streams": [{"codec_type": "video", "height": 480, "r_frame_rate": "30/1"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, MediaError::MissingMetadata(ref f) if f == "stream.width"));
    }

    #[test]
    fn test_unparseable_output() {
        let err = parse("not json").unwrap_err();
        assert!(matches!(err, MediaError::ProbeExecution { .. }));
    }
}
