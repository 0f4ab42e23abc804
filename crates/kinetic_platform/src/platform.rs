//! Platform quirk profile

use serde::{Deserialize, Serialize};

fn default_native_point_resolution() -> bool {
    true
}

/// What the gesture layer needs to know about the host platform
///
/// Filled in once at startup (from configuration or user-agent sniffing by the
/// host) and never changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformProfile {
    /// Chrome for Android major version, when running in it
    #[serde(default)]
    pub android_chrome: Option<u32>,
    /// Amazon Silk major version, when running in it
    #[serde(default)]
    pub silk: Option<u32>,
    /// Whether the host can resolve the element under a point natively
    #[serde(default = "default_native_point_resolution")]
    pub native_point_resolution: bool,
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self::desktop()
    }
}

impl PlatformProfile {
    /// A desktop browser with native point resolution
    pub fn desktop() -> Self {
        Self {
            android_chrome: None,
            silk: None,
            native_point_resolution: true,
        }
    }

    /// Platform name for logging
    pub fn name(&self) -> &'static str {
        if self.android_chrome.is_some() {
            "android-chrome"
        } else if self.silk.is_some() {
            "silk"
        } else {
            "desktop"
        }
    }

    /// Whether point resolution expects screen coordinates instead of client
    /// coordinates
    ///
    /// True for Chrome for Android up to v18 on high-density displays, and for
    /// Silk 2 (Kindle Fire HD).
    pub fn wants_screen_coordinates(&self) -> bool {
        self.android_chrome.map_or(false, |v| v <= 18) || self.silk == Some(2)
    }
}
