//! Canvas2D painter for the blob background

use std::f64::consts::TAU;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasPattern, CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::background::{BlobField, NoiseTile};
use crate::tuning::BackgroundTuning;

/// Owns the blob simulation and draws it every frame
pub struct BackgroundRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    field: BlobField,
    noise: NoiseTile,
    /// Built lazily from `noise` on the first frame
    pattern: Option<CanvasPattern>,
    gradient_core: f32,
}

impl BackgroundRenderer {
    pub fn new(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
        tuning: &BackgroundTuning,
        seed: u64,
    ) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        canvas.set_width(width);
        canvas.set_height(height);

        let mut rng = Pcg32::seed_from_u64(seed);
        let bounds = Vec2::new(width as f32, height as f32);
        let field = BlobField::with_default_blobs(bounds, tuning.clone(), &mut rng);
        let noise = NoiseTile::generate(
            tuning.noise_tile_size,
            tuning.noise_density,
            tuning.noise_alpha,
            &mut rng,
        );

        Ok(Self {
            canvas,
            ctx,
            field,
            noise,
            pattern: None,
            gradient_core: tuning.gradient_core,
        })
    }

    /// Match the viewport; blob motion carries on undisturbed
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.field.resize(Vec2::new(width as f32, height as f32));
    }

    /// Step the simulation and repaint
    pub fn frame(&mut self) -> Result<(), JsValue> {
        self.field.step();
        self.draw()
    }

    fn draw(&mut self) -> Result<(), JsValue> {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        let ctx = &self.ctx;

        // Transparent, so the page background shows through
        ctx.clear_rect(0.0, 0.0, w, h);

        // Overlapping blobs brighten instead of covering each other
        ctx.set_global_composite_operation("screen")?;
        for blob in &self.field.blobs {
            let (x, y, r) = (blob.pos.x as f64, blob.pos.y as f64, blob.radius as f64);
            let color = blob.color.css();
            let gradient = ctx.create_radial_gradient(x, y, 0.0, x, y, r)?;
            gradient.add_color_stop(0.0, &color)?;
            gradient.add_color_stop(self.gradient_core, &color)?;
            gradient.add_color_stop(1.0, "rgba(0,0,0,0)")?;

            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.begin_path();
            ctx.arc(x, y, r, 0.0, TAU)?;
            ctx.fill();
        }
        ctx.set_global_composite_operation("source-over")?;

        self.apply_noise(w, h)
    }

    fn apply_noise(&mut self, w: f64, h: f64) -> Result<(), JsValue> {
        if self.pattern.is_none() {
            self.pattern = self.build_pattern()?;
        }
        if let Some(pattern) = &self.pattern {
            self.ctx.set_fill_style_canvas_pattern(pattern);
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }
        Ok(())
    }

    /// Upload the noise tile to an offscreen canvas and wrap it as a
    /// repeating pattern
    fn build_pattern(&self) -> Result<Option<CanvasPattern>, JsValue> {
        let document = self
            .canvas
            .owner_document()
            .ok_or_else(|| JsValue::from_str("canvas is detached from a document"))?;
        let tile: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        let size = self.noise.size();
        tile.set_width(size);
        tile.set_height(size);

        let image =
            ImageData::new_with_u8_clamped_array_and_sh(Clamped(self.noise.pixels()), size, size)?;
        context_2d(&tile)?.put_image_data(&image, 0.0, 0.0)?;

        log::info!("Noise pattern ready ({}x{}, {} lit)", size, size, self.noise.lit_count());
        self.ctx.create_pattern_with_html_canvas_element(&tile, "repeat")
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}
