/// Upper bound on the pixel count of a single decoded frame.
pub const SIZE_LIMIT: usize = 0x100000;

/// One decoded frame of an indexed sprite.
///
/// `pixels` holds `width * height` palette indices, or `None` when the source
/// marks the frame as having no image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteFrame {
    pub width: u32,
    pub height: u32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub pixels: Option<Vec<u8>>,
}

impl SpriteFrame {
    pub fn empty(x_offset: i32, y_offset: i32) -> Self {
        Self {
            width: 0,
            height: 0,
            x_offset,
            y_offset,
            pixels: None,
        }
    }

    pub fn has_image(&self) -> bool {
        self.pixels.is_some()
    }
}

/// All frames of a sprite file together with the canvas size the frame
/// offsets are relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteContainer {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<SpriteFrame>,
}

impl SpriteContainer {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Option<&SpriteFrame> {
        self.frames.get(index)
    }
}
