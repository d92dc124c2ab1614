use serde::{Deserialize, Serialize};
use tokio::process::Command;

const PRINT_TEMPLATE: &str = r#"{"id":%(id)j,"title":%(title)j,"thumbnail":%(thumbnail)j,"url":%(webpage_url)j,"channel":%(channel)j}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMeta {
    pub id: String,
    pub title: String,
    pub thumbnail: Option<String>,
    pub url: String,
    pub channel: Option<String>,
}

#[derive(Debug)]
pub enum YtDlpError {
    Spawn(std::io::Error),
    Failed { stderr: String },
    Decode(serde_json::Error),
}

impl std::fmt::Display for YtDlpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YtDlpError::Spawn(e) => write!(f, "could not run yt-dlp: {e}"),
            YtDlpError::Failed { stderr } => write!(f, "yt-dlp failed: {}", stderr.trim()),
            YtDlpError::Decode(e) => write!(f, "could not parse yt-dlp output: {e}"),
        }
    }
}

impl std::error::Error for YtDlpError {}

pub fn decode(stdout: &str) -> Result<VideoMeta, YtDlpError> {
    serde_json::from_str(stdout.trim()).map_err(YtDlpError::Decode)
}

pub async fn fetch_metadata(program: &str, url: &str) -> Result<VideoMeta, YtDlpError> {
    let output = Command::new(program)
        .arg("--skip-download")
        .arg("--print")
        .arg(PRINT_TEMPLATE)
        .arg(url)
        .output()
        .await
        .map_err(YtDlpError::Spawn)?;

    if !output.status.success() {
        return Err(YtDlpError::Failed { stderr: String::from_utf8_lossy(&output.stderr).into_owned() });
    }
    decode(&String::from_utf8_lossy(&output.stdout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_print_output() {
        let out = r#"{"id":"dQw4w9WgXcQ","title":"A talk","thumbnail":"https://i.ytimg.com/x.jpg","url":"https://www.youtube.com/watch?v=dQw4w9WgXcQ","channel":"Some Channel"}
"#;
        let meta = decode(out).unwrap();
        assert_eq!(meta.id, "dQw4w9WgXcQ");
        assert_eq!(meta.channel.as_deref(), Some("Some Channel"));
    }

    #[test]
    fn null_fields_allowed() {
        let meta = decode(r#"{"id":"x","title":"t","thumbnail":null,"url":"u","channel":null}"#).unwrap();
        assert_eq!(meta.thumbnail, None);
    }

    #[test]
    fn garbage_is_decode_error() {
        assert!(matches!(decode("ERROR: not json"), Err(YtDlpError::Decode(_))));
    }

    #[tokio::test]
    async fn missing_binary_is_spawn_error() {
        let err = fetch_metadata("definitely-not-a-real-yt-dlp", "https://youtu.be/x").await.unwrap_err();
        assert!(matches!(err, YtDlpError::Spawn(_)));
    }
}
