use crate::FormatError;

pub const PALETTE_SIZE: usize = 256;

/// Index reserved as "draw nothing", whatever colour the palette stores there.
pub const TRANSPARENT_INDEX: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A 256 colour theater or unit palette.
///
/// Files hold 768 bytes of 6-bit VGA components which are widened to 8 bits
/// on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgb; PALETTE_SIZE],
}

impl Palette {
    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < PALETTE_SIZE * 3 {
            return Err(FormatError::Truncated("palette"));
        }

        let mut colors = [Rgb::default(); PALETTE_SIZE];
        for (color, rgb) in colors.iter_mut().zip(data.chunks_exact(3)) {
            *color = Rgb::new(widen(rgb[0]), widen(rgb[1]), widen(rgb[2]));
        }

        Ok(Self { colors })
    }

    pub fn from_colors(colors: [Rgb; PALETTE_SIZE]) -> Self {
        Self { colors }
    }

    pub fn color(&self, index: u8) -> Rgb {
        self.colors[index as usize]
    }

    pub fn colors(&self) -> &[Rgb; PALETTE_SIZE] {
        &self.colors
    }
}

fn widen(component: u8) -> u8 {
    (component & 0x3F) << 2
}
