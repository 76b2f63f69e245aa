//! Canvas2D presentation
//!
//! Draws the playfield in CSS-pixel coordinates; the device-pixel-ratio
//! transform is applied once at startup.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::sim::{GamePhase, GameState};

/// Lane dash layout
const DASH_LENGTH: f64 = 40.0;
const DASH_GAP: f64 = 40.0;
const DASH_WIDTH: f64 = 6.0;
const LANES: u32 = 4;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, dpr: f64) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.scale(dpr, dpr)?;
        Ok(Self { ctx })
    }

    pub fn render(&self, state: &GameState, scroll_enabled: bool) {
        let w = f64::from(state.config.playfield.x);
        let h = f64::from(state.config.playfield.y);

        // Road
        self.ctx.set_fill_style_str("#2b2b33");
        self.ctx.fill_rect(0.0, 0.0, w, h);

        // Lane dashes, phased by the scroll offset so the road moves
        let period = DASH_LENGTH + DASH_GAP;
        let phase = if scroll_enabled {
            f64::from(-state.scroll_offset).rem_euclid(period)
        } else {
            0.0
        };
        self.ctx.set_fill_style_str("#c9c9c9");
        for lane in 1..LANES {
            let x = w * f64::from(lane) / f64::from(LANES);
            let mut y = phase - period;
            while y < h {
                self.ctx
                    .fill_rect(x - DASH_WIDTH / 2.0, y, DASH_WIDTH, DASH_LENGTH);
                y += period;
            }
        }

        // Obstacles, colored by sprite variant
        for obstacle in state.obstacles.iter().filter(|o| o.active) {
            self.ctx.set_fill_style_str(match obstacle.kind {
                1 => "#d9823b",
                2 => "#4f86c6",
                _ => "#6da34d",
            });
            self.ctx.fill_rect(
                f64::from(obstacle.pos.x - obstacle.size.x / 2.0),
                f64::from(obstacle.pos.y - obstacle.size.y / 2.0),
                f64::from(obstacle.size.x),
                f64::from(obstacle.size.y),
            );
        }

        // The car, tinted red once crashed
        let crashed = state.phase == GamePhase::GameOver;
        self.ctx
            .set_fill_style_str(if crashed { "#ff3b30" } else { "#3fa7d6" });
        self.ctx.fill_rect(
            f64::from(state.car.pos.x - state.car.size.x / 2.0),
            f64::from(state.car.pos.y - state.car.size.y / 2.0),
            f64::from(state.car.size.x),
            f64::from(state.car.size.y),
        );

        // Dim the field behind the game-over overlay
        if crashed {
            self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }
    }
}
