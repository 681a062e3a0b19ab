//! Tray and window icon loading
//!
//! The icon is read from `app_icon.ico` in the working directory; a missing
//! or unreadable file falls back to a generated placeholder (black square
//! with a white inset rectangle) so the tray never comes up without an icon.

use image::{Rgba, RgbaImage};
use tracing::warn;

use crate::constants::icon::{FALLBACK_INSET, FALLBACK_SIZE, FILENAME};

/// Decoded RGBA icon shared by the tray and the settings window title bar
pub struct AppIcon {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub fn load() -> AppIcon {
    match image::open(FILENAME) {
        Ok(image) => {
            let rgba = image.to_rgba8();
            let (width, height) = rgba.dimensions();
            AppIcon {
                rgba: rgba.into_raw(),
                width,
                height,
            }
        }
        Err(err) => {
            warn!(path = FILENAME, error = %err, "Failed to load icon, using generated fallback");
            fallback()
        }
    }
}

fn fallback() -> AppIcon {
    let mut image = RgbaImage::from_pixel(FALLBACK_SIZE, FALLBACK_SIZE, Rgba([0, 0, 0, 255]));
    for y in FALLBACK_INSET..FALLBACK_SIZE - FALLBACK_INSET {
        for x in FALLBACK_INSET..FALLBACK_SIZE - FALLBACK_INSET {
            image.put_pixel(x, y, Rgba([255, 255, 255, 255]));
        }
    }
    AppIcon {
        rgba: image.into_raw(),
        width: FALLBACK_SIZE,
        height: FALLBACK_SIZE,
    }
}

impl AppIcon {
    pub fn to_egui(&self) -> egui::IconData {
        egui::IconData {
            rgba: self.rgba.clone(),
            width: self.width,
            height: self.height,
        }
    }

    #[cfg(target_os = "windows")]
    pub fn to_tray(&self) -> anyhow::Result<tray_icon::Icon> {
        use anyhow::Context;
        tray_icon::Icon::from_rgba(self.rgba.clone(), self.width, self.height)
            .context("Failed to build tray icon")
    }

    #[cfg(target_os = "linux")]
    pub fn to_ksni(&self) -> ksni::Icon {
        // ksni wants ARGB rows
        let data = self
            .rgba
            .chunks_exact(4)
            .flat_map(|px| [px[3], px[0], px[1], px[2]])
            .collect();
        ksni::Icon {
            width: self.width as i32,
            height: self.height as i32,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(icon: &AppIcon, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * icon.width + x) * 4) as usize;
        [
            icon.rgba[offset],
            icon.rgba[offset + 1],
            icon.rgba[offset + 2],
            icon.rgba[offset + 3],
        ]
    }

    #[test]
    fn test_fallback_shape() {
        let icon = fallback();

        assert_eq!(icon.width, FALLBACK_SIZE);
        assert_eq!(icon.height, FALLBACK_SIZE);
        assert_eq!(icon.rgba.len(), (FALLBACK_SIZE * FALLBACK_SIZE * 4) as usize);

        // Black border, white inset
        assert_eq!(pixel(&icon, 0, 0), [0, 0, 0, 255]);
        assert_eq!(pixel(&icon, FALLBACK_SIZE - 1, FALLBACK_SIZE - 1), [0, 0, 0, 255]);
        assert_eq!(pixel(&icon, FALLBACK_INSET, FALLBACK_INSET), [255, 255, 255, 255]);
        assert_eq!(
            pixel(&icon, FALLBACK_SIZE / 2, FALLBACK_SIZE / 2),
            [255, 255, 255, 255]
        );
        assert_eq!(
            pixel(&icon, FALLBACK_SIZE - FALLBACK_INSET, FALLBACK_SIZE - FALLBACK_INSET),
            [0, 0, 0, 255]
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_ksni_conversion_is_argb() {
        let icon = fallback();
        let ksni_icon = icon.to_ksni();

        assert_eq!(ksni_icon.width, FALLBACK_SIZE as i32);
        assert_eq!(ksni_icon.data.len(), icon.rgba.len());
        // First pixel is opaque black: RGBA [0,0,0,255] -> ARGB [255,0,0,0]
        assert_eq!(&ksni_icon.data[0..4], &[255, 0, 0, 0]);
    }
}
