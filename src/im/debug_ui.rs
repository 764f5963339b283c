use super::core::{Lum8Im, RgbIm};
use crate::canvas::{Canvas, EMPTY_DEPTH, Pixel};
use eframe::egui;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Plane {
    /// Shaded colors as composited.
    Color,
    /// Depth buffer as gray levels; undrawn pixels are black.
    Depth,
}

/// The composited canvas plus both planes pre-converted to RGBA8, top row first.
struct CanvasView {
    w: usize,
    h: usize,
    pixels: Vec<Pixel>,
    color_rgba: Vec<u8>,
    depth_rgba: Vec<u8>,
}

impl CanvasView {
    fn new(canvas: &Canvas) -> Self {
        let color = RgbIm::from_canvas(canvas);
        let depth = Lum8Im::depth_from_canvas(canvas);
        let color_rgba = color
            .arr
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect();
        let depth_rgba = depth.arr.iter().flat_map(|&v| [v, v, v, 255]).collect();
        Self {
            w: canvas.w,
            h: canvas.h,
            pixels: canvas.arr.clone(),
            color_rgba,
            depth_rgba,
        }
    }

    fn rgba(&self, plane: Plane) -> &[u8] {
        match plane {
            Plane::Color => &self.color_rgba,
            Plane::Depth => &self.depth_rgba,
        }
    }

    /// Readout for image coords `(x, y)`, `y` counted from the top.
    fn text_at(&self, x: usize, y: usize) -> String {
        let j = self.h - y - 1;
        let px = &self.pixels[j * self.w + x];
        let [r, g, b] = px.color.0;
        if px.depth > EMPTY_DEPTH {
            format!("i={x} j={j} rgb=({r},{g},{b}) depth={:.6}", px.depth)
        } else {
            format!("i={x} j={j} rgb=({r},{g},{b}) depth=empty")
        }
    }
}

struct CanvasApp {
    title: String,
    view: CanvasView,
    plane: Plane,
    texture: Option<egui::TextureHandle>,
    hover_text: String,
    dirty: bool,
}

impl CanvasApp {
    fn new(title: &str, view: CanvasView) -> Self {
        Self {
            title: title.to_owned(),
            view,
            plane: Plane::Color,
            texture: None,
            hover_text: String::new(),
            dirty: true,
        }
    }

    fn upload_if_needed(&mut self, ctx: &egui::Context) {
        if !self.dirty && self.texture.is_some() {
            return;
        }

        let img = egui::ColorImage::from_rgba_unmultiplied([self.view.w, self.view.h], self.view.rgba(self.plane));
        match &mut self.texture {
            Some(tex) => tex.set(img, egui::TextureOptions::NEAREST),
            None => self.texture = Some(ctx.load_texture("canvas", img, egui::TextureOptions::NEAREST)),
        }
        self.dirty = false;
    }
}

impl eframe::App for CanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.upload_if_needed(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.title);
                ui.separator();
                let before = self.plane;
                ui.selectable_value(&mut self.plane, Plane::Color, "color");
                ui.selectable_value(&mut self.plane, Plane::Depth, "depth");
                if self.plane != before {
                    self.dirty = true;
                }
                if !self.hover_text.is_empty() {
                    ui.separator();
                    ui.monospace(&self.hover_text);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (w, h) = (self.view.w, self.view.h);
            let Some(tex) = &self.texture else { return };

            let response = ui.add(egui::Image::new((tex.id(), egui::vec2(w as f32, h as f32))));
            if let Some(pos) = response.hover_pos() {
                let rect = response.rect;
                let fx = ((pos.x - rect.left()) / rect.width()).clamp(0.0, 0.999_999);
                let fy = ((pos.y - rect.top()) / rect.height()).clamp(0.0, 0.999_999);
                let x = (fx * w as f32) as usize;
                let y = (fy * h as f32) as usize;
                self.hover_text = self.view.text_at(x, y);
            }
        });

        ctx.request_repaint();
    }
}

/// Opens a window on `canvas` and blocks until it is closed.
pub fn show_canvas(canvas: &Canvas, title: &str) -> Result<(), String> {
    if canvas.w == 0 || canvas.h == 0 {
        return Err(format!("empty canvas {}x{}", canvas.w, canvas.h));
    }
    let view = CanvasView::new(canvas);
    let title_owned = title.to_owned();
    eframe::run_native(
        title,
        eframe::NativeOptions::default(),
        Box::new(move |_cc| Ok(Box::new(CanvasApp::new(&title_owned, view)))),
    )
    .map_err(|e| e.to_string())
}
