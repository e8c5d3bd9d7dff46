//! Win32 window enumeration and GDI screen capture

use std::ffi::c_void;

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT, TRUE};
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC,
    GetDIBits, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, CAPTUREBLT,
    DIB_RGB_COLORS, HBITMAP, HDC, HGDIOBJ, ROP_CODE, SRCCOPY,
};
use windows::Win32::UI::WindowsAndMessaging::{EnumWindows, GetWindowRect, GetWindowTextW};

use super::{Frame, WindowHandle, WindowRect, WindowSystem};
use crate::{Error, Result};

/// Win32 needs no connection; every call goes straight to user32/gdi32
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Windows;

fn to_hwnd(window: WindowHandle) -> HWND {
    HWND(window.raw() as usize as *mut c_void)
}

unsafe extern "system" fn collect_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let handles = &mut *(lparam.0 as *mut Vec<WindowHandle>);
    handles.push(WindowHandle::from_raw(hwnd.0 as usize as u64));
    TRUE
}

impl WindowSystem for Win32Windows {
    fn top_level_windows(&self) -> Result<impl Iterator<Item = WindowHandle> + '_> {
        let mut handles: Vec<WindowHandle> = Vec::new();
        unsafe {
            EnumWindows(
                Some(collect_window),
                LPARAM(&mut handles as *mut Vec<WindowHandle> as isize),
            )
        }
        .map_err(|e| Error::WindowSystem(format!("EnumWindows failed: {}", e)))?;

        Ok(handles.into_iter())
    }

    fn window_title(&self, window: WindowHandle, capacity: usize) -> Result<String> {
        let mut buffer = vec![0u16; capacity.max(1)];
        let len = unsafe { GetWindowTextW(to_hwnd(window), &mut buffer) };
        let len = (len.max(0) as usize).min(buffer.len());
        Ok(String::from_utf16_lossy(&buffer[..len]))
    }

    fn window_rect(&self, window: WindowHandle) -> Option<WindowRect> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(to_hwnd(window), &mut rect) }.ok()?;
        Some(WindowRect {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        })
    }

    fn capture_region(&self, rect: WindowRect) -> Result<Frame> {
        if rect.is_empty() {
            return Err(Error::CaptureFailed("window has an empty rectangle".to_string()));
        }
        let (width, height) = (rect.width() as i32, rect.height() as i32);

        let screen = ScreenDc::acquire()?;
        let memory = MemoryDc::compatible_with(screen.0)?;
        let bitmap = Bitmap::compatible_with(screen.0, width, height)?;
        let selected = SelectedBitmap::select(&memory, &bitmap);

        unsafe {
            BitBlt(
                memory.0,
                0,
                0,
                width,
                height,
                screen.0,
                rect.left,
                rect.top,
                ROP_CODE(SRCCOPY.0 | CAPTUREBLT.0),
            )
        }
        .map_err(|e| Error::CaptureFailed(format!("BitBlt failed: {}", e)))?;

        // GetDIBits wants the bitmap deselected
        drop(selected);

        let mut info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                // negative height asks for top-down rows
                biHeight: -height,
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let stride = width as usize * 4;
        let mut pixels = vec![0u8; stride * height as usize];

        let lines = unsafe {
            GetDIBits(
                memory.0,
                bitmap.0,
                0,
                height as u32,
                Some(pixels.as_mut_ptr() as *mut c_void),
                &mut info,
                DIB_RGB_COLORS,
            )
        };
        if lines != height {
            return Err(Error::CaptureFailed(format!(
                "GetDIBits copied {} of {} lines",
                lines, height
            )));
        }

        Frame::from_bgra(width as usize, height as usize, stride, &pixels)
            .ok_or_else(|| Error::CaptureFailed("captured buffer is too small".to_string()))
    }
}

/// Device context of the whole screen
struct ScreenDc(HDC);

impl ScreenDc {
    fn acquire() -> Result<Self> {
        let dc = unsafe { GetDC(HWND::default()) };
        if dc.is_invalid() {
            return Err(Error::CaptureFailed("GetDC returned no screen context".to_string()));
        }
        Ok(Self(dc))
    }
}

impl Drop for ScreenDc {
    fn drop(&mut self) {
        unsafe {
            let _ = ReleaseDC(HWND::default(), self.0);
        }
    }
}

struct MemoryDc(HDC);

impl MemoryDc {
    fn compatible_with(dc: HDC) -> Result<Self> {
        let memory = unsafe { CreateCompatibleDC(dc) };
        if memory.is_invalid() {
            return Err(Error::CaptureFailed("CreateCompatibleDC failed".to_string()));
        }
        Ok(Self(memory))
    }
}

impl Drop for MemoryDc {
    fn drop(&mut self) {
        unsafe {
            let _ = DeleteDC(self.0);
        }
    }
}

struct Bitmap(HBITMAP);

impl Bitmap {
    fn compatible_with(dc: HDC, width: i32, height: i32) -> Result<Self> {
        let bitmap = unsafe { CreateCompatibleBitmap(dc, width, height) };
        if bitmap.is_invalid() {
            return Err(Error::CaptureFailed(format!(
                "CreateCompatibleBitmap failed for {}x{}",
                width, height
            )));
        }
        Ok(Self(bitmap))
    }
}

impl Drop for Bitmap {
    fn drop(&mut self) {
        unsafe {
            let _ = DeleteObject(HGDIOBJ(self.0 .0));
        }
    }
}

/// Keeps a bitmap selected into a memory DC and restores the previous object
struct SelectedBitmap<'a> {
    dc: &'a MemoryDc,
    previous: HGDIOBJ,
}

impl<'a> SelectedBitmap<'a> {
    fn select(dc: &'a MemoryDc, bitmap: &Bitmap) -> Self {
        let previous = unsafe { SelectObject(dc.0, HGDIOBJ(bitmap.0 .0)) };
        Self { dc, previous }
    }
}

impl Drop for SelectedBitmap<'_> {
    fn drop(&mut self) {
        unsafe {
            let _ = SelectObject(self.dc.0, self.previous);
        }
    }
}
