//! Text rendering of a model's current generation.

use lifegrid_core::Position;
use lifegrid_world::Model;

/// Shades from dark to light
const RAMP: &[u8] = b" .:-=+*#%@";

fn shade(luma: f32) -> char {
    let last = RAMP.len() - 1;
    let index = (luma.clamp(0.0, 1.0) * last as f32).round() as usize;
    RAMP[index.min(last)] as char
}

/// Render every cell as one character, preceded by the status line when
/// the model has one
pub fn render_frame(model: &dyn Model) -> String {
    let (width, height) = model.dimensions();
    let mut frame = String::with_capacity(((width + 1) * height) as usize + 64);

    let status = model.status();
    if !status.is_empty() {
        frame.push_str(&status);
        frame.push('\n');
    }

    for y in 0..height {
        for x in 0..width {
            let glyph = model
                .color_at(Position::new(x, y))
                .map(|color| shade(color.luma()))
                .unwrap_or(' ');
            frame.push(glyph);
        }
        frame.push('\n');
    }

    frame
}
