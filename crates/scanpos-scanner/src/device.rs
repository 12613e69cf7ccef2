//! # Camera Devices
//!
//! Device descriptions as reported by the media layer, and the selection
//! heuristic used when the scanner starts.

use serde::{Deserialize, Serialize};

use crate::error::{ScannerError, ScannerResult};

/// Label substrings that identify a rear-facing camera.
pub const DEFAULT_BACK_CAMERA_KEYWORDS: &[&str] = &["back", "リア"];

/// Kind of media device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    VideoInput,
    AudioInput,
    AudioOutput,
}

/// A media device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraDevice {
    /// Opaque identifier passed back to `CameraBackend::open`.
    pub device_id: String,

    /// Human-readable label. May be empty before permission is granted.
    pub label: String,

    pub kind: DeviceKind,
}

impl CameraDevice {
    /// Creates a video input device.
    pub fn video(device_id: impl Into<String>, label: impl Into<String>) -> Self {
        CameraDevice {
            device_id: device_id.into(),
            label: label.into(),
            kind: DeviceKind::VideoInput,
        }
    }

    /// True if the label contains any keyword, ignoring case.
    pub fn matches_any(&self, keywords: &[String]) -> bool {
        let label = self.label.to_lowercase();
        keywords
            .iter()
            .any(|k| !k.is_empty() && label.contains(&k.to_lowercase()))
    }
}

/// Picks the camera to scan with.
///
/// ## Selection
/// ```text
/// video inputs only
///   ├── any label matches a back-camera keyword → first such device
///   ├── otherwise                               → first video input
///   └── none                                    → ScannerError::NoCamera
/// ```
pub fn select_camera<'a>(
    devices: &'a [CameraDevice],
    back_keywords: &[String],
) -> ScannerResult<&'a CameraDevice> {
    let mut videos = devices.iter().filter(|d| d.kind == DeviceKind::VideoInput);
    let first = videos.clone().next().ok_or(ScannerError::NoCamera)?;
    Ok(videos.find(|d| d.matches_any(back_keywords)).unwrap_or(first))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<String> {
        DEFAULT_BACK_CAMERA_KEYWORDS
            .iter()
            .map(|k| k.to_string())
            .collect()
    }

    #[test]
    fn test_prefers_back_camera() {
        let devices = vec![
            CameraDevice::video("front", "Front Camera"),
            CameraDevice::video("rear", "Back Camera"),
        ];
        assert_eq!(select_camera(&devices, &keywords()).unwrap().device_id, "rear");
    }

    #[test]
    fn test_matches_japanese_label() {
        let devices = vec![
            CameraDevice::video("front", "フロントカメラ"),
            CameraDevice::video("rear", "リアカメラ"),
        ];
        assert_eq!(select_camera(&devices, &keywords()).unwrap().device_id, "rear");
    }

    #[test]
    fn test_label_match_ignores_case() {
        let devices = vec![
            CameraDevice::video("a", "USB Webcam"),
            CameraDevice::video("b", "camera2 0, facing BACK"),
        ];
        assert_eq!(select_camera(&devices, &keywords()).unwrap().device_id, "b");
    }

    #[test]
    fn test_falls_back_to_first_video_input() {
        let devices = vec![
            CameraDevice {
                device_id: "mic".to_string(),
                label: "Back microphone".to_string(),
                kind: DeviceKind::AudioInput,
            },
            CameraDevice::video("cam0", "Integrated Webcam"),
            CameraDevice::video("cam1", "External"),
        ];
        assert_eq!(select_camera(&devices, &keywords()).unwrap().device_id, "cam0");
    }

    #[test]
    fn test_no_video_input() {
        let devices = vec![CameraDevice {
            device_id: "spk".to_string(),
            label: "Speakers".to_string(),
            kind: DeviceKind::AudioOutput,
        }];
        assert!(matches!(
            select_camera(&devices, &keywords()),
            Err(ScannerError::NoCamera)
        ));
        assert!(matches!(select_camera(&[], &keywords()), Err(ScannerError::NoCamera)));
    }
}
