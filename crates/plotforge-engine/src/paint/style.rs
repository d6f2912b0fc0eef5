use bytemuck::{Pod, Zeroable};

use super::Color;

/// Per-draw 2D style.
///
/// `width` is in screen pixels and is read only by the point-sprite
/// pipeline (sprite diameter); mesh fills ignore it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Style {
    pub color: Color,
    pub width: f32,
}

impl Style {
    #[inline]
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }

    #[inline]
    pub const fn fill(color: Color) -> Self {
        Self { color, width: 0.0 }
    }

    pub fn uniform(&self) -> StyleUniform {
        StyleUniform {
            color: self.color.to_array(),
            width: self.width,
            _pad: [0.0; 3],
        }
    }
}

/// Per-draw style uniform block.
///
/// Layout is fixed: color (16B), width (4B) + pad — 32 bytes total.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct StyleUniform {
    pub color: [f32; 4],
    pub width: f32,
    pub _pad: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_is_32_bytes() {
        assert_eq!(std::mem::size_of::<StyleUniform>(), 32);
    }

    #[test]
    fn uniform_carries_color_and_width() {
        let u = Style::new(Color::new(0.1, 0.2, 0.3, 0.4), 6.0).uniform();
        assert_eq!(u.color, [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(u.width, 6.0);
    }
}
