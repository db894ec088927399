pub mod client;

use serde::{Deserialize, Serialize};

use crate::utils::format_size_mb;

/// One downloadable encoding/quality variant of a video, as described
/// by the `/info` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoFormat {
    pub format_id: String,
    pub quality: String,
    pub ext: String,
    pub filesize: Option<u64>,
}

impl VideoFormat {
    /// Label shown in the quality selector, e.g. "720p (mp4) (10.00 MB)".
    pub fn label(&self) -> String {
        match self.filesize {
            Some(bytes) => format!("{} ({}) ({})", self.quality, self.ext, format_size_mb(bytes)),
            None => format!("{} ({})", self.quality, self.ext),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    pub formats: Vec<VideoFormat>,
}

/// Failure payload shared by both endpoints.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_includes_size_when_known() {
        let format = VideoFormat {
            format_id: "22".to_string(),
            quality: "720p".to_string(),
            ext: "mp4".to_string(),
            filesize: Some(10_485_760),
        };
        assert_eq!(format.label(), "720p (mp4) (10.00 MB)");
    }

    #[test]
    fn label_omits_size_when_unknown() {
        let format = VideoFormat {
            format_id: "18".to_string(),
            quality: "360p".to_string(),
            ext: "webm".to_string(),
            filesize: None,
        };
        assert_eq!(format.label(), "360p (webm)");
    }
}
