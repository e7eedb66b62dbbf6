use wasm_bindgen::prelude::*;
use crate::engine::PosterEngine;
use crate::objects::PosterObject;
use crate::types::{Background, ObjectKind};
use web_sys::{CanvasRenderingContext2d, Path2d};

#[wasm_bindgen]
impl PosterEngine {
    /// Redraws the poster at `zoom` (the host fits the 800x600 poster into
    /// its container).
    pub fn render(&self, ctx: &CanvasRenderingContext2d, zoom: f64) {
        ctx.save();
        ctx.clear_rect(0.0, 0.0, self.scene.width() * zoom, self.scene.height() * zoom);
        let _ = ctx.scale(zoom, zoom);
        self.draw_scene(ctx);
        if !self.hide_selection {
            self.render_selection_overlay(ctx, zoom);
        }
        ctx.restore();
    }
}

impl PosterEngine {
    /// Background and objects, without any editing overlay.
    pub(crate) fn draw_scene(&self, ctx: &CanvasRenderingContext2d) {
        let (width, height) = (self.scene.width(), self.scene.height());
        match self.scene.background() {
            Background::Color { color } => {
                ctx.set_fill_style_str(color);
                ctx.fill_rect(0.0, 0.0, width, height);
            }
            Background::Gradient(grad) => {
                let canvas_grad = ctx.create_linear_gradient(grad.x1, grad.y1, grad.x2, grad.y2);
                for stop in &grad.stops { let _ = canvas_grad.add_color_stop(stop.offset as f32, &stop.color); }
                ctx.set_fill_style_canvas_gradient(&canvas_grad);
                ctx.fill_rect(0.0, 0.0, width, height);
            }
            Background::Image { src } => {
                ctx.set_fill_style_str(&self.config.background);
                ctx.fill_rect(0.0, 0.0, width, height);
                if let Some(img) = self.image_cache.get(src) {
                    let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, width, height);
                }
            }
        }

        for obj in self.scene.objects() {
            self.render_object(ctx, obj);
        }
    }

    fn render_selection_overlay(&self, ctx: &CanvasRenderingContext2d, zoom: f64) {
        let Some(obj) = self.selected_id.and_then(|id| self.scene.get(id)) else { return };
        let (w, h) = obj.scaled_size();
        ctx.save();
        ctx.translate(obj.x + w / 2.0, obj.y + h / 2.0).unwrap_or(());
        ctx.rotate(obj.rotation).unwrap_or(());
        ctx.translate(-w / 2.0, -h / 2.0).unwrap_or(());
        ctx.set_stroke_style_str("#4facfe");
        ctx.set_line_width(1.5 / zoom);
        let _ = ctx.set_line_dash(&js_sys::Array::new());
        ctx.stroke_rect(0.0, 0.0, w, h);
        let handle_size = 8.0 / zoom;
        ctx.set_fill_style_str("#ffffff");
        ctx.set_line_width(1.0 / zoom);
        let handles = [
            (0.0, 0.0), (w, 0.0), (0.0, h), (w, h),
            (w / 2.0, 0.0), (w / 2.0, h), (0.0, h / 2.0), (w, h / 2.0),
        ];
        for (hx, hy) in handles {
            ctx.begin_path();
            ctx.rect(hx - handle_size / 2.0, hy - handle_size / 2.0, handle_size, handle_size);
            ctx.fill();
            ctx.stroke();
        }
        ctx.restore();
    }

    fn render_object(&self, ctx: &CanvasRenderingContext2d, obj: &PosterObject) {
        if !obj.visible { return; }
        let (w, h) = obj.scaled_size();
        ctx.save();
        ctx.set_global_alpha(obj.opacity);
        ctx.translate(obj.x + w / 2.0, obj.y + h / 2.0).unwrap_or(());
        ctx.rotate(obj.rotation).unwrap_or(());
        ctx.translate(-w / 2.0, -h / 2.0).unwrap_or(());
        let _ = ctx.scale(obj.scale_x, obj.scale_y);

        ctx.set_fill_style_str(&obj.fill);
        ctx.set_stroke_style_str(&obj.stroke);
        ctx.set_line_width(obj.stroke_width);

        match obj.kind {
            ObjectKind::Rectangle => {
                ctx.fill_rect(0.0, 0.0, obj.width, obj.height);
                if obj.stroke_width > 0.0 { ctx.stroke_rect(0.0, 0.0, obj.width, obj.height); }
            }
            ObjectKind::Circle => {
                ctx.begin_path();
                let _ = ctx.ellipse(obj.width / 2.0, obj.height / 2.0, obj.width / 2.0, obj.height / 2.0, 0.0, 0.0, std::f64::consts::PI * 2.0);
                ctx.fill();
                if obj.stroke_width > 0.0 { ctx.stroke(); }
            }
            ObjectKind::Triangle => {
                ctx.begin_path();
                ctx.move_to(obj.width / 2.0, 0.0);
                ctx.line_to(obj.width, obj.height);
                ctx.line_to(0.0, obj.height);
                ctx.close_path();
                ctx.fill();
                if obj.stroke_width > 0.0 { ctx.stroke(); }
            }
            ObjectKind::Star => {
                ctx.begin_path();
                for (i, p) in obj.points.iter().enumerate() {
                    if i == 0 { ctx.move_to(p.x, p.y); } else { ctx.line_to(p.x, p.y); }
                }
                ctx.close_path();
                ctx.fill();
                if obj.stroke_width > 0.0 { ctx.stroke(); }
            }
            ObjectKind::Text | ObjectKind::Emoji => {
                ctx.set_font(&format!("{} {} {}px {}", obj.font_style, obj.font_weight, obj.font_size, obj.font_family));
                ctx.set_text_align(&obj.text_align);
                ctx.set_text_baseline("top");
                let _ = ctx.fill_text(&obj.text, 0.0, 0.0);
                if obj.underline {
                    if let Ok(metrics) = ctx.measure_text(&obj.text) {
                        let start = match obj.text_align.as_str() {
                            "center" => -metrics.width() / 2.0,
                            "right" => -metrics.width(),
                            _ => 0.0,
                        };
                        ctx.fill_rect(start, obj.font_size * 1.05, metrics.width(), (obj.font_size / 15.0).max(1.0));
                    }
                }
            }
            ObjectKind::Image => {
                if let Some(img) = self.image_cache.get(&obj.src) {
                    let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, obj.width, obj.height);
                }
            }
            ObjectKind::Path => {
                if let Ok(p) = Path2d::new_with_path_string(&obj.path_data) {
                    ctx.set_line_cap("round");
                    ctx.set_line_join("round");
                    ctx.stroke_with_path(&p);
                }
            }
        }
        ctx.restore();
    }
}
