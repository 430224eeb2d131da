use byteorder::{LE, ReadBytesExt};
use std::io::{Cursor, Read};

use crate::error::{FormatError, TruncatedExt};
use crate::sprite::{SIZE_LIMIT, SpriteContainer, SpriteFrame};

const HEADER_SIZE: usize = 16;
const CELL_HEADER_SIZE: usize = 52;

const MAX_BLOCK_SIZE: u32 = 1024;

const HAS_EXTRA_DATA: u32 = 0x01;

/// Header of one cell image inside a tile template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TmpCellInfo {
    pub x: i32,
    pub y: i32,
    pub extra_offset: u32,
    pub z_offset: u32,
    pub extra_z_offset: u32,
    pub x_extra: i32,
    pub y_extra: i32,
    pub extra_width: u32,
    pub extra_height: u32,
    pub flags: u32,
    /// Elevation of the cell within the template.
    pub height: u8,
    pub terrain_type: u8,
    pub ramp_type: u8,
    pub radar_left: [u8; 3],
    pub radar_right: [u8; 3],
    image_offset: u32,
}

impl TmpCellInfo {
    pub fn has_extra_data(&self) -> bool {
        self.flags & HAS_EXTRA_DATA != 0 && self.extra_width > 0 && self.extra_height > 0
    }

    fn extra_len(&self) -> usize {
        self.extra_width as usize * self.extra_height as usize
    }
}

/// An isometric tile template: a grid of diamond-shaped cell images, some of
/// which may be empty.
#[derive(Debug, Clone)]
pub struct TmpFile {
    pub blocks_x: u32,
    pub blocks_y: u32,
    pub block_width: u32,
    pub block_height: u32,
    cells: Vec<Option<TmpCellInfo>>,
}

impl TmpFile {
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < HEADER_SIZE {
            return Err(FormatError::Truncated("TMP header"));
        }

        let mut reader = Cursor::new(data);
        let blocks_x = reader.read_u32::<LE>().or_truncated("TMP header")?;
        let blocks_y = reader.read_u32::<LE>().or_truncated("TMP header")?;
        let block_width = reader.read_u32::<LE>().or_truncated("TMP header")?;
        let block_height = reader.read_u32::<LE>().or_truncated("TMP header")?;

        if block_width == 0
            || block_width > MAX_BLOCK_SIZE
            || block_height > MAX_BLOCK_SIZE
            || block_height < 2
            || block_height % 2 != 0
            || (block_width * 2) % block_height != 0
        {
            return Err(FormatError::BadHeader(format!(
                "unsupported TMP cell size {block_width}x{block_height}"
            )));
        }

        let cell_count = (blocks_x as usize)
            .checked_mul(blocks_y as usize)
            .ok_or_else(|| FormatError::BadHeader("TMP cell count overflows".into()))?;
        let index_end = cell_count
            .checked_mul(4)
            .and_then(|len| len.checked_add(HEADER_SIZE));
        match index_end {
            Some(end) if end <= data.len() => {}
            _ => {
                return Err(FormatError::OffsetOutOfBounds {
                    what: "TMP cell index",
                    offset: index_end.unwrap_or(usize::MAX),
                    len: data.len(),
                });
            }
        }

        let mut offsets = Vec::with_capacity(cell_count);
        for _ in 0..cell_count {
            offsets.push(reader.read_u32::<LE>().or_truncated("TMP cell index")?);
        }

        let diamond_len = (block_width * block_height / 2) as usize;
        let mut cells = Vec::with_capacity(cell_count);
        for offset in offsets {
            if offset == 0 {
                cells.push(None);
                continue;
            }

            let info = read_cell_header(data, offset)?;

            let colors_end = offset as usize + CELL_HEADER_SIZE + diamond_len;
            if colors_end > data.len() {
                return Err(FormatError::OffsetOutOfBounds {
                    what: "TMP cell colour data",
                    offset: colors_end,
                    len: data.len(),
                });
            }

            if info.has_extra_data() {
                let extra_end = offset as usize + info.extra_offset as usize + info.extra_len();
                if extra_end > data.len() {
                    return Err(FormatError::OffsetOutOfBounds {
                        what: "TMP cell extra data",
                        offset: extra_end,
                        len: data.len(),
                    });
                }
            }

            cells.push(Some(info));
        }

        Ok(Self {
            blocks_x,
            blocks_y,
            block_width,
            block_height,
            cells,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Header of cell `index`, `None` for empty cells and out of range indices.
    pub fn cell_info(&self, index: usize) -> Option<&TmpCellInfo> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// Decodes cell `index` into one frame holding the diamond and, when
    /// present, the extra data drawn on top of it. Returns `Ok(None)` for
    /// empty cells.
    pub fn decode_cell(
        &self,
        index: usize,
        data: &[u8],
    ) -> Result<Option<SpriteFrame>, FormatError> {
        let slot = self.cells.get(index).ok_or(FormatError::FrameOutOfRange {
            index,
            count: self.cells.len(),
        })?;
        let Some(info) = slot else {
            return Ok(None);
        };

        let bw = self.block_width as i64;
        let bh = self.block_height as i64;
        let (mut min_x, mut min_y) = (info.x as i64, info.y as i64);
        let (mut max_x, mut max_y) = (min_x + bw, min_y + bh);
        if info.has_extra_data() {
            min_x = min_x.min(info.x_extra as i64);
            min_y = min_y.min(info.y_extra as i64);
            max_x = max_x.max(info.x_extra as i64 + info.extra_width as i64);
            max_y = max_y.max(info.y_extra as i64 + info.extra_height as i64);
        }

        let width = (max_x - min_x) as usize;
        let height = (max_y - min_y) as usize;
        if width.checked_mul(height).is_none_or(|count| count > SIZE_LIMIT) {
            return Err(FormatError::corrupt(
                index,
                format!("cell bounds {width}x{height} exceed the size limit"),
            ));
        }
        let mut pixels = vec![0u8; width * height];

        let colors_start = info.image_offset as usize + CELL_HEADER_SIZE;
        let diamond_len = (self.block_width * self.block_height / 2) as usize;
        let colors = data
            .get(colors_start..colors_start + diamond_len)
            .ok_or(FormatError::Truncated("TMP cell colour data"))?;

        let mut source = 0;
        for row in 0..self.block_height {
            let row_width = self.diamond_row_width(row) as usize;
            let row_start = (self.block_width as usize - row_width) / 2;
            let dst_y = (info.y as i64 - min_y) as usize + row as usize;
            let dst_x = (info.x as i64 - min_x) as usize + row_start;
            let dst = dst_y * width + dst_x;
            pixels[dst..dst + row_width].copy_from_slice(&colors[source..source + row_width]);
            source += row_width;
        }

        if info.has_extra_data() {
            let extra_start = info.image_offset as usize + info.extra_offset as usize;
            let extra = data
                .get(extra_start..extra_start + info.extra_len())
                .ok_or(FormatError::Truncated("TMP cell extra data"))?;
            let extra_width = info.extra_width as usize;

            for (ey, line) in extra.chunks_exact(extra_width).enumerate() {
                let dst_y = (info.y_extra as i64 - min_y) as usize + ey;
                let dst_x = (info.x_extra as i64 - min_x) as usize;
                for (ex, &value) in line.iter().enumerate() {
                    if value != 0 {
                        pixels[dst_y * width + dst_x + ex] = value;
                    }
                }
            }
        }

        Ok(Some(SpriteFrame {
            width: width as u32,
            height: height as u32,
            x_offset: min_x as i32,
            y_offset: min_y as i32,
            pixels: Some(pixels),
        }))
    }

    /// Parses `data` and decodes every cell; empty cells become frames
    /// without an image.
    pub fn read_container(data: &[u8]) -> Result<SpriteContainer, FormatError> {
        let tmp = Self::parse(data)?;

        let mut frames = Vec::with_capacity(tmp.cell_count());
        for index in 0..tmp.cell_count() {
            let frame = match tmp.decode_cell(index, data)? {
                Some(frame) => frame,
                None => SpriteFrame::empty(0, 0),
            };
            frames.push(frame);
        }

        Ok(SpriteContainer {
            width: tmp.blocks_x.saturating_mul(tmp.block_width),
            height: tmp.blocks_y.saturating_mul(tmp.block_height),
            frames,
        })
    }

    /// Width of diamond scanline `row`; rows widen towards the middle of the
    /// cell and narrow again below it.
    fn diamond_row_width(&self, row: u32) -> u32 {
        let half = self.block_height / 2;
        let step = self.block_width / half;
        if row < half {
            step * (row + 1)
        } else {
            step * (self.block_height - 1 - row)
        }
    }
}

fn read_cell_header(data: &[u8], offset: u32) -> Result<TmpCellInfo, FormatError> {
    let start = offset as usize;
    let header = data
        .get(start..start + CELL_HEADER_SIZE)
        .ok_or(FormatError::OffsetOutOfBounds {
            what: "TMP cell header",
            offset: start,
            len: data.len(),
        })?;

    let mut reader = Cursor::new(header);
    let what = "TMP cell header";
    let x = reader.read_i32::<LE>().or_truncated(what)?;
    let y = reader.read_i32::<LE>().or_truncated(what)?;
    let extra_offset = reader.read_u32::<LE>().or_truncated(what)?;
    let z_offset = reader.read_u32::<LE>().or_truncated(what)?;
    let extra_z_offset = reader.read_u32::<LE>().or_truncated(what)?;
    let x_extra = reader.read_i32::<LE>().or_truncated(what)?;
    let y_extra = reader.read_i32::<LE>().or_truncated(what)?;
    let extra_width = reader.read_u32::<LE>().or_truncated(what)?;
    let extra_height = reader.read_u32::<LE>().or_truncated(what)?;
    let flags = reader.read_u32::<LE>().or_truncated(what)?;
    let height = reader.read_u8().or_truncated(what)?;
    let terrain_type = reader.read_u8().or_truncated(what)?;
    let ramp_type = reader.read_u8().or_truncated(what)?;
    let mut radar_left = [0u8; 3];
    reader.read_exact(&mut radar_left).or_truncated(what)?;
    let mut radar_right = [0u8; 3];
    reader.read_exact(&mut radar_right).or_truncated(what)?;

    Ok(TmpCellInfo {
        x,
        y,
        extra_offset,
        z_offset,
        extra_z_offset,
        x_extra,
        y_extra,
        extra_width,
        extra_height,
        flags,
        height,
        terrain_type,
        ramp_type,
        radar_left,
        radar_right,
        image_offset: offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestCell {
        x: i32,
        y: i32,
        colors: Vec<u8>,
        extra: Option<(i32, i32, u32, u32, Vec<u8>)>,
    }

    fn build_tmp(
        blocks_x: u32,
        blocks_y: u32,
        bw: u32,
        bh: u32,
        cells: &[Option<TestCell>],
    ) -> Vec<u8> {
        let mut out = Vec::new();
        for value in [blocks_x, blocks_y, bw, bh] {
            out.extend_from_slice(&value.to_le_bytes());
        }

        let index_start = out.len();
        out.resize(index_start + cells.len() * 4, 0);

        for (i, cell) in cells.iter().enumerate() {
            let Some(cell) = cell else { continue };
            let offset = out.len() as u32;
            let slot = index_start + i * 4;
            out[slot..slot + 4].copy_from_slice(&offset.to_le_bytes());

            let (x_extra, y_extra, cx, cy, extra_offset, flags) = match &cell.extra {
                Some((xe, ye, cx, cy, _)) => (
                    *xe,
                    *ye,
                    *cx,
                    *cy,
                    (CELL_HEADER_SIZE + cell.colors.len()) as u32,
                    HAS_EXTRA_DATA,
                ),
                None => (0, 0, 0, 0, 0, 0),
            };

            out.extend_from_slice(&cell.x.to_le_bytes());
            out.extend_from_slice(&cell.y.to_le_bytes());
            out.extend_from_slice(&extra_offset.to_le_bytes());
            out.extend_from_slice(&0u32.to_le_bytes());
            out.extend_from_slice(&0u32.to_le_bytes());
            out.extend_from_slice(&x_extra.to_le_bytes());
            out.extend_from_slice(&y_extra.to_le_bytes());
            out.extend_from_slice(&cx.to_le_bytes());
            out.extend_from_slice(&cy.to_le_bytes());
            out.extend_from_slice(&flags.to_le_bytes());
            out.extend_from_slice(&[2, 0, 0, 9, 9, 9, 8, 8, 8, 0, 0, 0]);
            out.extend_from_slice(&cell.colors);
            if let Some((_, _, _, _, extra)) = &cell.extra {
                out.extend_from_slice(extra);
            }
        }
        out
    }

    fn diamond_8x4() -> Vec<u8> {
        (1..=16).collect()
    }

    #[test]
    fn diamond_rows_are_centred() {
        let data = build_tmp(
            1,
            1,
            8,
            4,
            &[Some(TestCell {
                x: 0,
                y: 0,
                colors: diamond_8x4(),
                extra: None,
            })],
        );

        let tmp = TmpFile::parse(&data).unwrap();
        let frame = tmp.decode_cell(0, &data).unwrap().unwrap();
        assert_eq!((frame.width, frame.height), (8, 4));
        #[rustfmt::skip]
        let expected = vec![
            0, 0, 1, 2, 3, 4, 0, 0,
            5, 6, 7, 8, 9, 10, 11, 12,
            0, 0, 13, 14, 15, 16, 0, 0,
            0, 0, 0, 0, 0, 0, 0, 0,
        ];
        assert_eq!(frame.pixels, Some(expected));
        assert_eq!(tmp.cell_info(0).unwrap().height, 2);
    }

    #[test]
    fn extra_data_extends_the_frame() {
        let data = build_tmp(
            1,
            1,
            8,
            4,
            &[Some(TestCell {
                x: 0,
                y: 0,
                colors: diamond_8x4(),
                extra: Some((2, -2, 2, 3, vec![50, 0, 51, 52, 53, 0])),
            })],
        );

        let tmp = TmpFile::parse(&data).unwrap();
        let frame = tmp.decode_cell(0, &data).unwrap().unwrap();
        assert_eq!((frame.x_offset, frame.y_offset), (0, -2));
        assert_eq!((frame.width, frame.height), (8, 6));

        let pixels = frame.pixels.unwrap();
        let at = |x: usize, y: usize| pixels[y * 8 + x];
        assert_eq!(at(2, 0), 50);
        assert_eq!(at(3, 0), 0);
        assert_eq!(at(2, 1), 51);
        assert_eq!(at(3, 1), 52);
        // Transparent extra pixels keep the diamond underneath.
        assert_eq!(at(3, 2), 2);
        assert_eq!(at(2, 2), 53);
    }

    #[test]
    fn empty_cells_have_no_image() {
        let data = build_tmp(
            2,
            1,
            8,
            4,
            &[
                None,
                Some(TestCell {
                    x: 8,
                    y: 0,
                    colors: diamond_8x4(),
                    extra: None,
                }),
            ],
        );

        let container = TmpFile::read_container(&data).unwrap();
        assert_eq!((container.width, container.height), (16, 4));
        assert_eq!(container.frame_count(), 2);
        assert!(!container.frames[0].has_image());
        assert_eq!(container.frames[1].x_offset, 8);
    }

    #[test]
    fn colour_data_past_end_is_rejected() {
        let mut data = build_tmp(
            1,
            1,
            8,
            4,
            &[Some(TestCell {
                x: 0,
                y: 0,
                colors: diamond_8x4(),
                extra: None,
            })],
        );
        data.truncate(data.len() - 1);

        assert!(matches!(
            TmpFile::parse(&data),
            Err(FormatError::OffsetOutOfBounds { .. })
        ));
    }

    #[test]
    fn odd_cell_height_is_a_bad_header() {
        let data = build_tmp(1, 1, 8, 3, &[None]);
        assert!(matches!(TmpFile::parse(&data), Err(FormatError::BadHeader(_))));
    }
}
