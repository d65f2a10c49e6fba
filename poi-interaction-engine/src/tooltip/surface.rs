use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use thiserror::Error;

use constants::interaction::{TOOLTIP_TEXTURE_HEIGHT, TOOLTIP_TEXTURE_WIDTH};

use crate::tooltip::content::TooltipContent;

#[derive(Debug, Error)]
pub enum TooltipError {
    /// The environment cannot provide a 2D canvas context. Fatal at
    /// construction: without it the presenter cannot render anything.
    #[error("2d canvas context unavailable")]
    ContextUnavailable,
    #[error("tooltip rasterization failed: {0}")]
    Raster(String),
}

/// Narrow rasterization collaborator. The presenter and its state machine
/// depend only on this seam, never on a concrete drawing API.
pub trait TooltipSurface {
    fn draw(
        &mut self,
        content: &TooltipContent,
        images: &mut Assets<Image>,
    ) -> Result<Handle<Image>, TooltipError>;
}

/// CPU rasterizer for native builds: composes a panel with category accent
/// trim and proportional text blocks. The browser build swaps in the canvas
/// surface for real glyphs.
#[derive(Default)]
pub struct PanelSurface;

impl TooltipSurface for PanelSurface {
    fn draw(
        &mut self,
        content: &TooltipContent,
        images: &mut Assets<Image>,
    ) -> Result<Handle<Image>, TooltipError> {
        let data = compose_panel(content, TOOLTIP_TEXTURE_WIDTH, TOOLTIP_TEXTURE_HEIGHT);
        let image = Image::new(
            Extent3d {
                width: TOOLTIP_TEXTURE_WIDTH,
                height: TOOLTIP_TEXTURE_HEIGHT,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            data,
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
        );
        Ok(images.add(image))
    }
}

const BACKGROUND: [u8; 4] = [16, 18, 26, 236];
const TEXT_BRIGHT: [u8; 4] = [235, 238, 245, 255];
const TEXT_DIM: [u8; 4] = [160, 166, 180, 255];

/// Compose the panel into an RGBA8 buffer. Text is laid out as proportional
/// blocks so the layout is deterministic and testable without fonts.
pub fn compose_panel(content: &TooltipContent, width: u32, height: u32) -> Vec<u8> {
    let mut buffer = vec![0u8; (width * height * 4) as usize];
    fill_rect(&mut buffer, width, 0, 0, width, height, BACKGROUND);

    let accent = [
        (content.accent.red.clamp(0.0, 1.0) * 255.0) as u8,
        (content.accent.green.clamp(0.0, 1.0) * 255.0) as u8,
        (content.accent.blue.clamp(0.0, 1.0) * 255.0) as u8,
        255,
    ];

    // Accent trim along the top edge.
    fill_rect(&mut buffer, width, 0, 0, width, 6, accent);

    let margin = 24u32;
    let text_width = |text: &str, px_per_char: u32| -> u32 {
        (text.chars().count() as u32 * px_per_char).min(width - margin * 2)
    };

    // Category eyebrow, title, summary.
    fill_rect(
        &mut buffer,
        width,
        margin,
        26,
        text_width(&content.category_label, 7),
        12,
        accent,
    );
    fill_rect(
        &mut buffer,
        width,
        margin,
        52,
        text_width(&content.title, 14),
        24,
        TEXT_BRIGHT,
    );
    fill_rect(
        &mut buffer,
        width,
        margin,
        92,
        text_width(&content.summary, 8),
        14,
        TEXT_DIM,
    );

    // Metric rows.
    let mut y = 124u32;
    for (label, value) in &content.metrics {
        if y + 14 > height.saturating_sub(40) {
            break;
        }
        fill_rect(&mut buffer, width, margin, y, text_width(label, 7), 12, TEXT_DIM);
        fill_rect(
            &mut buffer,
            width,
            width - margin - text_width(value, 8),
            y,
            text_width(value, 8),
            12,
            TEXT_BRIGHT,
        );
        y += 22;
    }

    // Prompt line pinned to the bottom.
    fill_rect(
        &mut buffer,
        width,
        margin,
        height - 30,
        text_width(&content.prompt, 7),
        12,
        accent,
    );

    buffer
}

fn fill_rect(buffer: &mut [u8], stride: u32, x: u32, y: u32, w: u32, h: u32, colour: [u8; 4]) {
    for row in y..(y + h).min(buffer.len() as u32 / (stride * 4)) {
        for col in x..(x + w).min(stride) {
            let offset = ((row * stride + col) * 4) as usize;
            buffer[offset..offset + 4].copy_from_slice(&colour);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> TooltipContent {
        TooltipContent {
            title: "Solar Greenhouse".into(),
            category_label: "Environment".into(),
            accent: LinearRgba::rgb(0.3, 0.85, 0.42),
            summary: "Automated greenhouse build.".into(),
            status: None,
            metrics: vec![("Plants".into(), "42".into())],
            prompt: "Click to open".into(),
        }
    }

    fn pixel(buffer: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        buffer[offset..offset + 4].try_into().unwrap()
    }

    #[test]
    fn panel_has_expected_size_and_background() {
        let buffer = compose_panel(&content(), 512, 288);
        assert_eq!(buffer.len(), 512 * 288 * 4);
        assert_eq!(pixel(&buffer, 512, 256, 200), BACKGROUND);
    }

    #[test]
    fn accent_trim_runs_along_the_top() {
        let buffer = compose_panel(&content(), 512, 288);
        let trim = pixel(&buffer, 512, 10, 2);
        assert_eq!(trim[3], 255);
        assert!(trim[1] > trim[0], "accent is green-dominant");
        assert_eq!(pixel(&buffer, 512, 10, 2), pixel(&buffer, 512, 500, 4));
    }

    #[test]
    fn title_block_scales_with_text_length() {
        let short = compose_panel(
            &TooltipContent {
                title: "Hi".into(),
                ..content()
            },
            512,
            288,
        );
        let long = compose_panel(&content(), 512, 288);
        // Column well past the short title but inside the long one.
        let x = 24 + 2 * 14 + 10;
        assert_eq!(pixel(&short, 512, x, 60), BACKGROUND);
        assert_eq!(pixel(&long, 512, x, 60), TEXT_BRIGHT);
    }
}
