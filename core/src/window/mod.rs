//! Top-level window enumeration and screen capture
//!
//! The platform backends (Win32, X11) sit behind [`WindowSystem`] so that the
//! title scan and the QR decoding run the same way everywhere, including
//! against scripted desktops in tests.

mod frame;
#[cfg(windows)]
mod win32;
#[cfg(not(windows))]
mod x11;

use std::collections::HashSet;
use std::sync::LazyLock;

pub use frame::Frame;

use crate::protocol::constants::CONNECT_INFO_TITLES;
use crate::Result;

/// Opaque identifier of a top-level window, valid only during one scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(u64);

impl WindowHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Window bounds in screen coordinates, right and bottom exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl WindowRect {
    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Overlap with another rectangle, `None` if they do not touch
    pub fn intersect(&self, other: &WindowRect) -> Option<WindowRect> {
        let clipped = WindowRect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        (!clipped.is_empty()).then_some(clipped)
    }
}

/// An open connection to the desktop's window manager
pub trait WindowSystem {
    /// Snapshot of the current top-level windows, lazily consumed
    fn top_level_windows(&self) -> Result<impl Iterator<Item = WindowHandle> + '_>;

    /// Title of `window`, truncated to `capacity - 1` code units.
    ///
    /// Windows that vanish during the scan read as an empty title.
    fn window_title(&self, window: WindowHandle, capacity: usize) -> Result<String>;

    /// Screen rectangle of `window`, `None` if the OS will not report it
    fn window_rect(&self, window: WindowHandle) -> Option<WindowRect>;

    /// Grab the screen pixels inside `rect`
    fn capture_region(&self, rect: WindowRect) -> Result<Frame>;
}

/// Opens [`WindowSystem`] sessions; each discovery run gets a fresh one
pub trait Desktop {
    type Session: WindowSystem;

    fn open(&self) -> Result<Self::Session>;
}

/// The platform's real window system
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDesktop;

impl Desktop for NativeDesktop {
    #[cfg(windows)]
    type Session = win32::Win32Windows;
    #[cfg(not(windows))]
    type Session = x11::X11Windows;

    fn open(&self) -> Result<Self::Session> {
        #[cfg(windows)]
        {
            Ok(win32::Win32Windows)
        }
        #[cfg(not(windows))]
        {
            x11::X11Windows::connect()
        }
    }
}

static KNOWN_TITLES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| CONNECT_INFO_TITLES.iter().copied().collect());

/// Exact match against the localized connect-info dialog titles
pub fn is_known_title(title: &str) -> bool {
    KNOWN_TITLES.contains(title)
}

/// Find the obs-websocket connect-info dialog among the top-level windows.
///
/// Titles are read through a `title_capacity` buffer, so a longer title is
/// compared in truncated form. The first match ends the scan.
pub fn find_window_by_known_title(
    windows: &impl WindowSystem,
    title_capacity: usize,
) -> Result<Option<WindowHandle>> {
    for window in windows.top_level_windows()? {
        let title = windows.window_title(window, title_capacity)?;
        if is_known_title(&title) {
            tracing::info!("found connect info window {:#x} ({})", window.raw(), title);
            return Ok(Some(window));
        }
    }

    tracing::debug!("no connect info window is open");
    Ok(None)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::protocol::constants::TITLE_BUFFER_LEN;

    /// A window on a scripted desktop
    #[derive(Clone)]
    pub(crate) struct FakeWindow {
        pub title: String,
        pub rect: Option<WindowRect>,
    }

    /// Scripted desktop: windows in z-order plus the full screen image
    #[derive(Clone)]
    pub(crate) struct FakeDesktop {
        pub windows: Vec<FakeWindow>,
        pub screen: Frame,
    }

    impl FakeDesktop {
        pub fn with_titles(titles: &[&str]) -> Self {
            Self {
                windows: titles
                    .iter()
                    .map(|t| FakeWindow {
                        title: t.to_string(),
                        rect: Some(WindowRect { left: 0, top: 0, right: 10, bottom: 10 }),
                    })
                    .collect(),
                screen: Frame::new(10, 10, vec![255; 100]),
            }
        }
    }

    impl WindowSystem for FakeDesktop {
        fn top_level_windows(&self) -> Result<impl Iterator<Item = WindowHandle> + '_> {
            Ok((0..self.windows.len() as u64).map(WindowHandle::from_raw))
        }

        fn window_title(&self, window: WindowHandle, capacity: usize) -> Result<String> {
            let title = &self.windows[window.raw() as usize].title;
            Ok(title.chars().take(capacity.saturating_sub(1)).collect())
        }

        fn window_rect(&self, window: WindowHandle) -> Option<WindowRect> {
            self.windows.get(window.raw() as usize).and_then(|w| w.rect)
        }

        fn capture_region(&self, rect: WindowRect) -> Result<Frame> {
            Ok(self.screen.crop(rect))
        }
    }

    impl Desktop for FakeDesktop {
        type Session = FakeDesktop;

        fn open(&self) -> Result<FakeDesktop> {
            Ok(self.clone())
        }
    }

    #[test]
    fn test_matches_localized_titles_exactly() {
        assert!(is_known_title("WebSocket 连接信息"));
        assert!(is_known_title("WebSocket Connect Info"));
        assert!(is_known_title("WebSocket-Verbindungsinformationen"));
        assert!(!is_known_title("WebSocket Connect Infoo"));
        assert!(!is_known_title("websocket connect info"));
        assert!(!is_known_title("OBS 30.1.2 - Profile: Untitled - Scenes: Untitled"));
    }

    #[test]
    fn test_title_table_is_complete() {
        assert_eq!(CONNECT_INFO_TITLES.len(), 39);
        assert_eq!(KNOWN_TITLES.len(), CONNECT_INFO_TITLES.len());
        assert!(CONNECT_INFO_TITLES
            .iter()
            .all(|t| t.len() < TITLE_BUFFER_LEN));
    }

    #[test]
    fn test_scan_stops_at_first_match() {
        let desktop = FakeDesktop::with_titles(&[
            "Program Manager",
            "WebSocket Connect Infoo",
            "WebSocket 连接信息",
            "WebSocket Connect Info",
        ]);
        let found = find_window_by_known_title(&desktop, TITLE_BUFFER_LEN).unwrap();
        assert_eq!(found, Some(WindowHandle::from_raw(2)));
    }

    #[test]
    fn test_scan_without_dialog_finds_nothing() {
        let desktop = FakeDesktop::with_titles(&["Program Manager", "OBS 30.1.2"]);
        assert_eq!(find_window_by_known_title(&desktop, TITLE_BUFFER_LEN).unwrap(), None);

        let empty = FakeDesktop::with_titles(&[]);
        assert_eq!(find_window_by_known_title(&empty, TITLE_BUFFER_LEN).unwrap(), None);
    }

    #[test]
    fn test_truncated_title_is_compared_truncated() {
        // "WebSocket Connect Info" is 22 characters; a 23-unit buffer holds it
        let desktop = FakeDesktop::with_titles(&["WebSocket Connect Info (extra)"]);
        assert_eq!(
            find_window_by_known_title(&desktop, 23).unwrap(),
            Some(WindowHandle::from_raw(0))
        );
        assert_eq!(find_window_by_known_title(&desktop, TITLE_BUFFER_LEN).unwrap(), None);
    }

    #[test]
    fn test_rect_intersection() {
        let screen = WindowRect { left: 0, top: 0, right: 1920, bottom: 1080 };
        let partly_off = WindowRect { left: -100, top: 1000, right: 200, bottom: 1200 };
        assert_eq!(
            partly_off.intersect(&screen),
            Some(WindowRect { left: 0, top: 1000, right: 200, bottom: 1080 })
        );

        let minimized = WindowRect { left: -32000, top: -32000, right: -31840, bottom: -31972 };
        assert_eq!(minimized.intersect(&screen), None);
        assert!(WindowRect { left: 5, top: 5, right: 5, bottom: 9 }.is_empty());
    }
}
