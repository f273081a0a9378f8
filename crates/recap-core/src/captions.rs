use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::error::{RecapError, Result};

/// Check that the locator is non-empty and scheme-prefixed before anything
/// touches the network. Returns the trimmed URL.
pub fn validate_url(input: &str) -> Result<String> {
    let url = input.trim();
    if url.is_empty() || !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(RecapError::InvalidUrl {
            input: input.to_string(),
        });
    }
    Ok(url.to_string())
}

/// Download the English caption track (manual or auto-generated) for `url`
/// into `workdir` using yt-dlp. Returns the path of the SRT artifact,
/// `<workdir>/<video id>.en.srt`.
pub async fn download_captions(url: &str, workdir: &Path) -> Result<PathBuf> {
    let output_template = workdir.join("%(id)s.%(ext)s");
    let output = Command::new("yt-dlp")
        .arg(url)
        .arg("--skip-download")
        .arg("--no-simulate")
        .arg("--write-subs")
        .arg("--write-auto-subs")
        .arg("--sub-langs")
        .arg("en")
        .arg("--convert-subs")
        .arg("srt")
        .arg("--print")
        .arg("id")
        .arg("-o")
        .arg(&output_template)
        .output()
        .await?;

    if !output.status.success() {
        return Err(RecapError::CaptionsUnavailable {
            url: url.to_string(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let video_id = stdout.trim().lines().last().unwrap_or("").trim();
    let srt_path = workdir.join(format!("{video_id}.en.srt"));
    if video_id.is_empty() || !srt_path.exists() {
        return Err(RecapError::CaptionsUnavailable {
            url: url.to_string(),
            reason: "no English subtitle track was produced".to_string(),
        });
    }

    Ok(srt_path)
}
