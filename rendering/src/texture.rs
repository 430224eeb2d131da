use bytemuck::{Pod, Zeroable};
use formats::{Palette, Rgb, SpriteContainer, SpriteFrame, palette::TRANSPARENT_INDEX};
use glam::UVec2;

use crate::theater::AssetSlots;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub fn opaque(rgb: Rgb) -> Self {
        Self {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
            a: 255,
        }
    }
}

/// RGBA pixels of one sprite frame, positioned on the sprite's canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableTexture {
    pub shape_width: u32,
    pub shape_height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgba8>,
}

impl RenderableTexture {
    /// Resolves `frame`'s palette indices through `palette`. Index 0 is always
    /// transparent. Returns `None` for frames without an image.
    pub fn build(shape: UVec2, frame: &SpriteFrame, palette: &Palette) -> Option<Self> {
        let indices = frame.pixels.as_ref()?;

        let pixels = indices
            .iter()
            .map(|&index| {
                if index == TRANSPARENT_INDEX {
                    Rgba8::TRANSPARENT
                } else {
                    Rgba8::opaque(palette.color(index))
                }
            })
            .collect();

        Some(Self {
            shape_width: shape.x,
            shape_height: shape.y,
            offset_x: frame.x_offset,
            offset_y: frame.y_offset,
            width: frame.width,
            height: frame.height,
            pixels,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get((y * self.width + x) as usize)
            .copied()
    }

    /// Tightly packed RGBA8 rows, ready for a texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Builds every frame of `container` independently; frames without an image
/// leave an empty slot.
pub fn assemble_container(
    container: &SpriteContainer,
    palette: &Palette,
) -> AssetSlots<RenderableTexture> {
    let shape = UVec2::new(container.width, container.height);
    container
        .frames
        .iter()
        .map(|frame| RenderableTexture::build(shape, frame, palette))
        .collect()
}
