//! QR decoding of the connect-info dialog

use crate::protocol::{parse_connection_url, ConnectionConfig};
use crate::window::{Frame, WindowHandle, WindowSystem};
use crate::{Error, Result};

/// Decode every QR code visible in `frame`, in detection order
pub fn decode_frame(frame: &Frame) -> Vec<String> {
    if frame.width() == 0 || frame.height() == 0 {
        return Vec::new();
    }

    let mut image = rqrr::PreparedImage::prepare_from_greyscale(
        frame.width(),
        frame.height(),
        |x, y| frame.luma_at(x, y),
    );

    image
        .detect_grids()
        .into_iter()
        .filter_map(|grid| match grid.decode() {
            Ok((_meta, content)) => Some(content),
            Err(e) => {
                tracing::debug!("found a QR grid but could not decode it: {:?}", e);
                None
            }
        })
        .collect()
}

/// Capture `window` and read the connection URL from its QR code.
///
/// Returns `Ok(None)` when no code is visible or no decoded payload is an
/// `obsws://` URL. Fails with [`Error::CaptureFailed`] when the window's
/// rectangle cannot be read, typically because it closed after the scan.
pub fn decode_window(
    windows: &impl WindowSystem,
    window: WindowHandle,
) -> Result<Option<ConnectionConfig>> {
    let rect = windows.window_rect(window).ok_or_else(|| {
        Error::CaptureFailed(format!("no screen rectangle for window {:#x}", window.raw()))
    })?;
    if rect.is_empty() {
        return Err(Error::CaptureFailed(format!(
            "window {:#x} has an empty rectangle",
            window.raw()
        )));
    }

    let frame = windows.capture_region(rect)?;
    let payloads = decode_frame(&frame);
    tracing::debug!(
        "decoded {} QR code(s) from a {}x{} capture",
        payloads.len(),
        frame.width(),
        frame.height()
    );

    Ok(payloads.iter().find_map(|p| parse_connection_url(p)))
}

#[cfg(test)]
pub(crate) mod tests {
    use qrcode::{Color, QrCode};

    use super::*;
    use crate::window::tests::{FakeDesktop, FakeWindow};
    use crate::window::WindowRect;

    const MODULE_PX: usize = 4;
    const QUIET_MODULES: usize = 4;

    /// Render `data` as a black-on-white QR code with a quiet zone
    pub(crate) fn qr_frame(data: &str) -> Frame {
        let code = QrCode::new(data.as_bytes()).unwrap();
        let colors = code.to_colors();
        let modules = code.width();
        let side = (modules + 2 * QUIET_MODULES) * MODULE_PX;

        let mut luma = vec![255u8; side * side];
        for y in 0..side {
            for x in 0..side {
                let mx = (x / MODULE_PX) as isize - QUIET_MODULES as isize;
                let my = (y / MODULE_PX) as isize - QUIET_MODULES as isize;
                if mx < 0 || my < 0 || mx >= modules as isize || my >= modules as isize {
                    continue;
                }
                if colors[my as usize * modules + mx as usize] == Color::Dark {
                    luma[y * side + x] = 0;
                }
            }
        }
        Frame::new(side, side, luma)
    }

    /// A desktop with a single dialog showing `frame` at the origin
    pub(crate) fn desktop_showing(title: &str, frame: Frame) -> FakeDesktop {
        let rect = WindowRect {
            left: 0,
            top: 0,
            right: frame.width() as i32,
            bottom: frame.height() as i32,
        };
        FakeDesktop {
            windows: vec![FakeWindow { title: title.to_string(), rect: Some(rect) }],
            screen: frame,
        }
    }

    #[test]
    fn test_decode_frame_reads_payload() {
        let frame = qr_frame("obsws://127.0.0.1:4455/mypassword");
        assert_eq!(decode_frame(&frame), vec!["obsws://127.0.0.1:4455/mypassword".to_string()]);
    }

    #[test]
    fn test_blank_frame_has_no_codes() {
        assert!(decode_frame(&Frame::new(64, 64, vec![255; 64 * 64])).is_empty());
        assert!(decode_frame(&Frame::new(0, 0, Vec::new())).is_empty());
    }

    #[test]
    fn test_decode_window_builds_config() {
        let desktop = desktop_showing(
            "WebSocket Connect Info",
            qr_frame("obsws://127.0.0.1:4455/mypassword"),
        );
        let config = decode_window(&desktop, WindowHandle::from_raw(0)).unwrap().unwrap();
        assert_eq!(config.address(), "127.0.0.1");
        assert_eq!(config.port(), "4455");
        assert_eq!(config.password(), "mypassword");
    }

    #[test]
    fn test_foreign_code_is_not_found() {
        let desktop = desktop_showing("WebSocket Connect Info", qr_frame("https://example.com"));
        assert_eq!(decode_window(&desktop, WindowHandle::from_raw(0)).unwrap(), None);
    }

    #[test]
    fn test_missing_rect_is_capture_failure() {
        let mut desktop = FakeDesktop::with_titles(&["WebSocket Connect Info"]);
        desktop.windows[0].rect = None;
        assert!(matches!(
            decode_window(&desktop, WindowHandle::from_raw(0)),
            Err(Error::CaptureFailed(_))
        ));
    }

    #[test]
    fn test_capture_is_limited_to_window() {
        // The code sits outside the window's rectangle, so it is not seen
        let mut desktop = desktop_showing(
            "WebSocket Connect Info",
            qr_frame("obsws://127.0.0.1:4455/mypassword"),
        );
        desktop.windows[0].rect = Some(WindowRect { left: 0, top: 0, right: 12, bottom: 12 });
        assert_eq!(decode_window(&desktop, WindowHandle::from_raw(0)).unwrap(), None);
    }
}
