//! Canvas2D presenter (wasm only)
//!
//! Wraps a [`DisplayList`] and paints it onto an HTML canvas each frame.
//! Sprites are drawn as flat silhouettes: ships as arrowheads, anything
//! else as a quad.

use glam::Vec2;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{DisplayList, DisplayNode, Layer, Primitive, RenderHandle, Renderer};
use crate::sim::Dimension;

const BACKGROUND_COLOR: &str = "#05060a";
const WIREFRAME_COLOR: &str = "#00ff00";

pub struct CanvasRenderer {
    list: DisplayList,
    ctx: CanvasRenderingContext2d,
    canvas: HtmlCanvasElement,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self {
            list: DisplayList::new(),
            ctx,
            canvas,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn draw_node(&self, node: &DisplayNode) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.translate(node.position.x as f64, node.position.y as f64).ok();
        ctx.rotate(node.rotation as f64).ok();

        match &node.primitive {
            Primitive::Sprite {
                texture,
                width,
                height,
            } => {
                let (w, h) = (*width as f64, *height as f64);
                if *texture == "spaceship" {
                    ctx.set_fill_style_str("#7fb8ff");
                    ctx.begin_path();
                    ctx.move_to(w / 2.0, 0.0);
                    ctx.line_to(-w / 2.0, -h / 2.0);
                    ctx.line_to(-w / 4.0, 0.0);
                    ctx.line_to(-w / 2.0, h / 2.0);
                    ctx.close_path();
                    ctx.fill();
                } else {
                    ctx.set_fill_style_str("#ff4040");
                    ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
                }
            }
            Primitive::Rectangle {
                width,
                height,
                color,
            } => {
                let (w, h) = (*width as f64, *height as f64);
                ctx.set_fill_style_str(&css_color(*color));
                ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
            }
            Primitive::Circle {
                radius,
                color,
                alpha,
            } => {
                ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
                ctx.set_fill_style_str(&css_color(*color));
                ctx.begin_path();
                ctx.arc(0.0, 0.0, *radius as f64, 0.0, std::f64::consts::TAU)
                    .ok();
                ctx.fill();
            }
            Primitive::Text { content, size } => {
                ctx.set_fill_style_str("#ffffff");
                ctx.set_font(&format!("{}px monospace", size));
                ctx.set_text_baseline("top");
                ctx.fill_text(content, 0.0, 0.0).ok();
            }
        }

        ctx.restore();
    }

    fn draw_wireframe(&self, points: &[Vec2]) {
        let Some(first) = points.first() else { return };
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(first.x as f64, first.y as f64);
        for p in &points[1..] {
            ctx.line_to(p.x as f64, p.y as f64);
        }
        ctx.close_path();
        ctx.stroke();
    }
}

impl Renderer for CanvasRenderer {
    fn create(&mut self, primitive: Primitive, layer: Layer) -> RenderHandle {
        self.list.create(primitive, layer)
    }

    fn set_transform(&mut self, handle: RenderHandle, position: Vec2, rotation: f32) {
        self.list.set_transform(handle, position, rotation);
    }

    fn destroy(&mut self, handle: RenderHandle) -> bool {
        self.list.destroy(handle)
    }

    fn bounds(&self, handle: RenderHandle) -> Option<Dimension> {
        self.list.bounds(handle)
    }

    fn set_wireframes(&mut self, wireframes: Vec<Vec<Vec2>>) {
        self.list.set_wireframes(wireframes);
    }

    fn present(&mut self) {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;
        self.ctx.set_fill_style_str(BACKGROUND_COLOR);
        self.ctx.fill_rect(0.0, 0.0, width, height);

        for layer in [Layer::Background, Layer::Foreground, Layer::Overlay] {
            for node in self.list.layer(layer) {
                self.draw_node(node);
            }
        }

        self.ctx.set_stroke_style_str(WIREFRAME_COLOR);
        self.ctx.set_line_width(1.0);
        for wireframe in self.list.wireframes() {
            self.draw_wireframe(wireframe);
        }

        self.list.present();
    }
}

fn css_color(color: u32) -> String {
    format!("#{:06x}", color & 0x00ff_ffff)
}
