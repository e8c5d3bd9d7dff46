//! X11 window enumeration and root-window capture

use x11rb::connection::Connection;
use x11rb::errors::ReplyError;
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ConnectionExt as XprotoExt, ImageFormat, ImageOrder, Window,
};
use x11rb::rust_connection::RustConnection;

use super::{Frame, WindowHandle, WindowRect, WindowSystem};
use crate::{Error, Result};

/// Atoms interned once per session
struct Atoms {
    net_client_list: Atom,
    net_wm_name: Atom,
    utf8_string: Atom,
}

/// One connection to the X server, closed when the session is dropped
pub struct X11Windows {
    conn: RustConnection,
    root: Window,
    screen: WindowRect,
    atoms: Atoms,
}

fn connection_error(e: impl std::fmt::Display) -> Error {
    Error::WindowSystem(e.to_string())
}

impl X11Windows {
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None)
            .map_err(|e| Error::WindowSystem(format!("cannot connect to X display: {}", e)))?;

        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let bounds = WindowRect {
            left: 0,
            top: 0,
            right: screen.width_in_pixels as i32,
            bottom: screen.height_in_pixels as i32,
        };

        let atoms = Atoms {
            net_client_list: intern(&conn, b"_NET_CLIENT_LIST")?,
            net_wm_name: intern(&conn, b"_NET_WM_NAME")?,
            utf8_string: intern(&conn, b"UTF8_STRING")?,
        };

        Ok(Self { conn, root, screen: bounds, atoms })
    }

    /// Fetch a property, treating a vanished window as an empty value
    fn property_bytes(
        &self,
        window: Window,
        property: impl Into<Atom>,
        type_: impl Into<Atom>,
        long_length: u32,
    ) -> Result<Vec<u8>> {
        let cookie = self
            .conn
            .get_property(false, window, property, type_, 0, long_length)
            .map_err(connection_error)?;

        match cookie.reply() {
            Ok(reply) => Ok(reply.value),
            Err(ReplyError::X11Error(e)) => {
                tracing::debug!("window {:#x} went away: {:?}", window, e.error_kind);
                Ok(Vec::new())
            }
            Err(e) => Err(connection_error(e)),
        }
    }

    /// Managed windows per the window manager, or the root's children when
    /// no EWMH window manager runs
    fn client_windows(&self) -> Result<Vec<Window>> {
        let reply = self
            .conn
            .get_property(false, self.root, self.atoms.net_client_list, AtomEnum::WINDOW, 0, u32::MAX)
            .map_err(connection_error)?
            .reply()
            .map_err(connection_error)?;

        if let Some(windows) = reply.value32() {
            let windows: Vec<Window> = windows.collect();
            if !windows.is_empty() {
                return Ok(windows);
            }
        }

        let tree = self
            .conn
            .query_tree(self.root)
            .map_err(connection_error)?
            .reply()
            .map_err(connection_error)?;
        Ok(tree.children)
    }
}

fn intern(conn: &RustConnection, name: &[u8]) -> Result<Atom> {
    Ok(conn
        .intern_atom(false, name)
        .map_err(connection_error)?
        .reply()
        .map_err(connection_error)?
        .atom)
}

/// Cut raw title bytes down to `capacity - 1` bytes; a split UTF-8 sequence
/// becomes a replacement character
fn bounded_title(mut bytes: Vec<u8>, capacity: usize) -> String {
    bytes.truncate(capacity.saturating_sub(1));
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Row length in bytes of a ZPixmap image; only 32 bits per pixel converts
/// to BGRA directly
fn zpixmap_stride(width: usize, bits_per_pixel: u8, scanline_pad: u8) -> Result<usize> {
    if bits_per_pixel != 32 {
        return Err(Error::CaptureFailed(format!(
            "unsupported pixel size of {} bits",
            bits_per_pixel
        )));
    }
    let pad = usize::from(scanline_pad.max(8));
    Ok((width * 32).div_ceil(pad) * pad / 8)
}

impl WindowSystem for X11Windows {
    fn top_level_windows(&self) -> Result<impl Iterator<Item = WindowHandle> + '_> {
        Ok(self
            .client_windows()?
            .into_iter()
            .map(|w| WindowHandle::from_raw(u64::from(w))))
    }

    fn window_title(&self, window: WindowHandle, capacity: usize) -> Result<String> {
        let window = window.raw() as Window;
        let long_length = capacity.div_ceil(4) as u32;

        let mut bytes = self.property_bytes(
            window,
            self.atoms.net_wm_name,
            self.atoms.utf8_string,
            long_length,
        )?;
        if bytes.is_empty() {
            bytes = self.property_bytes(window, AtomEnum::WM_NAME, AtomEnum::STRING, long_length)?;
        }

        Ok(bounded_title(bytes, capacity))
    }

    fn window_rect(&self, window: WindowHandle) -> Option<WindowRect> {
        let window = window.raw() as Window;
        let geometry = self.conn.get_geometry(window).ok()?.reply().ok()?;
        let origin = self
            .conn
            .translate_coordinates(window, self.root, 0, 0)
            .ok()?
            .reply()
            .ok()?;

        let left = origin.dst_x as i32;
        let top = origin.dst_y as i32;
        Some(WindowRect {
            left,
            top,
            right: left + geometry.width as i32,
            bottom: top + geometry.height as i32,
        })
    }

    fn capture_region(&self, rect: WindowRect) -> Result<Frame> {
        let rect = rect
            .intersect(&self.screen)
            .ok_or_else(|| Error::CaptureFailed("window is outside the screen".to_string()))?;
        let (width, height) = (rect.width() as usize, rect.height() as usize);

        let image = self
            .conn
            .get_image(
                ImageFormat::Z_PIXMAP,
                self.root,
                rect.left as i16,
                rect.top as i16,
                width as u16,
                height as u16,
                !0,
            )
            .map_err(connection_error)?
            .reply()
            .map_err(|e| Error::CaptureFailed(format!("GetImage failed: {}", e)))?;

        let setup = self.conn.setup();
        if setup.image_byte_order != ImageOrder::LSB_FIRST {
            return Err(Error::CaptureFailed("big-endian X servers are not supported".to_string()));
        }
        let format = setup
            .pixmap_formats
            .iter()
            .find(|f| f.depth == image.depth)
            .ok_or_else(|| {
                Error::CaptureFailed(format!("no pixmap format for depth {}", image.depth))
            })?;
        let stride = zpixmap_stride(width, format.bits_per_pixel, format.scanline_pad)?;
        Frame::from_bgra(width, height, stride, &image.data)
            .ok_or_else(|| Error::CaptureFailed("GetImage returned a short buffer".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_title_truncates_bytes() {
        assert_eq!(bounded_title(b"WebSocket Connect Info".to_vec(), 128), "WebSocket Connect Info");
        assert_eq!(bounded_title(b"WebSocket Connect Info".to_vec(), 10), "WebSocket");
        assert_eq!(bounded_title(Vec::new(), 128), "");
    }

    #[test]
    fn test_zpixmap_stride_needs_32_bits_per_pixel() {
        assert_eq!(zpixmap_stride(100, 32, 32).unwrap(), 400);
        assert!(matches!(zpixmap_stride(100, 24, 32), Err(Error::CaptureFailed(_))));
        assert!(matches!(zpixmap_stride(100, 16, 32), Err(Error::CaptureFailed(_))));
    }

    #[test]
    fn test_bounded_title_split_utf8() {
        // "连" is three bytes; cutting after two leaves a replacement char
        let title = "WebSocket 连接信息".as_bytes().to_vec();
        let cut = bounded_title(title, 13);
        assert!(cut.starts_with("WebSocket "));
        assert!(cut.ends_with('\u{fffd}'));
    }
}
