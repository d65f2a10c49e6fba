use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use constants::interaction::{TOOLTIP_TEXTURE_HEIGHT, TOOLTIP_TEXTURE_WIDTH};

use crate::tooltip::content::TooltipContent;
use crate::tooltip::surface::{TooltipError, TooltipSurface};

/// Browser rasterizer: draws the tooltip on a detached HTML canvas and reads
/// the pixels back into a Bevy image. The canvas never enters the DOM.
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Fails when the environment cannot hand out a 2D context. Callers are
    /// expected to fail fast; a missing context means an unsupported browser.
    pub fn new() -> Result<Self, TooltipError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(TooltipError::ContextUnavailable)?;
        let canvas = document
            .create_element("canvas")
            .map_err(|_| TooltipError::ContextUnavailable)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| TooltipError::ContextUnavailable)?;
        canvas.set_width(TOOLTIP_TEXTURE_WIDTH);
        canvas.set_height(TOOLTIP_TEXTURE_HEIGHT);

        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(TooltipError::ContextUnavailable)?;
        Ok(Self { context })
    }

    fn text(&self, text: &str, x: f64, y: f64) -> Result<(), TooltipError> {
        self.context
            .fill_text(text, x, y)
            .map_err(|e| TooltipError::Raster(format!("fill_text: {e:?}")))
    }

    /// Greedy word wrap against the canvas's own text metrics.
    fn wrapped_lines(&self, text: &str, max_width: f64) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            let fits = self
                .context
                .measure_text(&candidate)
                .map(|m| m.width() <= max_width)
                .unwrap_or(true);
            if fits {
                current = candidate;
            } else {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

fn css_colour(colour: LinearRgba) -> String {
    let srgb = Srgba::from(colour);
    format!(
        "rgb({}, {}, {})",
        (srgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (srgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (srgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

impl TooltipSurface for CanvasSurface {
    fn draw(
        &mut self,
        content: &TooltipContent,
        images: &mut Assets<Image>,
    ) -> Result<Handle<Image>, TooltipError> {
        let w = TOOLTIP_TEXTURE_WIDTH as f64;
        let h = TOOLTIP_TEXTURE_HEIGHT as f64;
        let margin = 24.0;
        let accent = css_colour(content.accent);
        let ctx = &self.context;

        ctx.clear_rect(0.0, 0.0, w, h);
        ctx.set_fill_style_str("rgba(16, 18, 26, 0.93)");
        ctx.fill_rect(0.0, 0.0, w, h);

        // Accent trim along the top edge.
        ctx.set_fill_style_str(&accent);
        ctx.fill_rect(0.0, 0.0, w, 6.0);

        ctx.set_font("600 13px system-ui, sans-serif");
        self.text(&content.category_label.to_uppercase(), margin, 38.0)?;

        ctx.set_fill_style_str("rgb(235, 238, 245)");
        ctx.set_font("700 28px system-ui, sans-serif");
        self.text(&content.title, margin, 74.0)?;

        ctx.set_fill_style_str("rgb(160, 166, 180)");
        ctx.set_font("15px system-ui, sans-serif");
        let mut y = 102.0;
        for line in self.wrapped_lines(&content.summary, w - margin * 2.0) {
            self.text(&line, margin, y)?;
            y += 20.0;
        }

        y += 8.0;
        for (label, value) in &content.metrics {
            if y > h - 44.0 {
                break;
            }
            ctx.set_fill_style_str("rgb(160, 166, 180)");
            self.text(label, margin, y)?;
            ctx.set_fill_style_str("rgb(235, 238, 245)");
            let value_width = ctx.measure_text(value).map(|m| m.width()).unwrap_or(0.0);
            self.text(value, w - margin - value_width, y)?;
            y += 22.0;
        }

        if let Some(status) = &content.status {
            ctx.set_fill_style_str(&accent);
            self.text(status, margin, h - 46.0)?;
        }

        ctx.set_fill_style_str(&accent);
        ctx.set_font("600 13px system-ui, sans-serif");
        self.text(&content.prompt, margin, h - 20.0)?;

        let image_data = ctx
            .get_image_data(0.0, 0.0, w, h)
            .map_err(|e| TooltipError::Raster(format!("get_image_data: {e:?}")))?;
        let data = image_data.data().0;

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
