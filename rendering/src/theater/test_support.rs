use formats::{FileProvider, game_files::MemoryArchive};
use std::cell::RefCell;

/// 768 bytes of 6-bit palette data; `seed` tints the green channel.
pub fn palette_bytes(seed: u8) -> Vec<u8> {
    (0..256u32)
        .flat_map(|i| [(i % 64) as u8, seed % 64, 63 - (i % 64) as u8])
        .collect()
}

/// SHP file whose frames are stored raw; `None` frames have no image.
pub fn shp_bytes(width: u16, height: u16, frames: &[Option<(u16, u16, Vec<u8>)>]) -> Vec<u8> {
    let mut out = Vec::new();
    for value in [0, width, height, frames.len() as u16] {
        out.extend_from_slice(&value.to_le_bytes());
    }

    let mut offset = 8 + frames.len() * 24;
    let mut bodies = Vec::new();
    for frame in frames {
        let (w, h, data_offset) = match frame {
            Some((w, h, pixels)) => {
                let at = offset as u32;
                offset += pixels.len();
                bodies.extend_from_slice(pixels);
                (*w, *h, at)
            }
            None => (0, 0, 0),
        };
        for value in [0u16, 0, w, h] {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0]);
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&data_offset.to_le_bytes());
    }
    out.extend_from_slice(&bodies);
    out
}

/// Single-cell 8x4 tile template with every diamond pixel set to `fill`.
pub fn tmp_bytes(fill: u8) -> Vec<u8> {
    let mut out = Vec::new();
    for value in [1u32, 1, 8, 4] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&20u32.to_le_bytes());
    out.extend_from_slice(&[0u8; 52]);
    out.extend_from_slice(&[fill; 16]);
    out
}

/// Memory archive that remembers every name it was asked for.
#[derive(Default)]
pub struct RecordingArchive {
    pub files: MemoryArchive,
    pub requests: RefCell<Vec<String>>,
}

impl RecordingArchive {
    pub fn new(files: MemoryArchive) -> Self {
        Self {
            files,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl FileProvider for RecordingArchive {
    fn load_file(&self, name: &str) -> Option<Vec<u8>> {
        self.requests.borrow_mut().push(name.to_string());
        self.files.load_file(name)
    }
}
