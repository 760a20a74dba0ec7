use std::path::Path;

use sclip_asr::AsrConfig;
use sclip_cli::ClipConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ClipConfig::from_env();

    println!(
        "sclip-selfcheck: starting with work_dir={}",
        config.work_dir.display()
    );
    ensure_workdir(&config.work_dir).await?;
    let ffmpeg = sclip_media::check_ffmpeg()?;
    let ffprobe = sclip_media::check_ffprobe()?;
    println!(
        "sclip-selfcheck: ffmpeg={} ffprobe={}",
        ffmpeg.display(),
        ffprobe.display()
    );

    let asr = AsrConfig::from_env()?;
    println!("sclip-selfcheck: transcription endpoint {}", asr.base_url);

    println!("sclip-selfcheck: ok");
    Ok(())
}

async fn ensure_workdir<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}
