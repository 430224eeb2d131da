use byteorder::{LE, ReadBytesExt};
use num_enum::TryFromPrimitive;
use std::io::{Cursor, Read};

use crate::error::{FormatError, TruncatedExt};
use crate::sprite::{SIZE_LIMIT, SpriteContainer, SpriteFrame};

const HEADER_SIZE: usize = 8;
const FRAME_HEADER_SIZE: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ShpCompression {
    None = 0,
    Raw = 1,
    /// Every scanline is prefixed with its byte length (including the prefix).
    Scanline = 2,
    /// As `Scanline`, with a zero byte followed by a count encoding a run of
    /// transparent pixels.
    ScanlineRle = 3,
}

/// Geometry of a frame as stored in the SHP frame table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShpFrameInfo {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub compression: u8,
    pub radar_color: [u8; 3],
    pub data_offset: u32,
}

impl ShpFrameInfo {
    pub fn has_image(&self) -> bool {
        self.data_offset != 0 && self.width > 0 && self.height > 0
    }

    fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Parsed header and frame table of a SHP sprite.
///
/// The pixel data stays in the caller's buffer and is only decompressed on
/// request through [`ShpFile::decode_frame`].
#[derive(Debug, Clone)]
pub struct ShpFile {
    pub width: u16,
    pub height: u16,
    frames: Vec<ShpFrameInfo>,
}

impl ShpFile {
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < HEADER_SIZE {
            return Err(FormatError::Truncated("SHP header"));
        }

        let mut reader = Cursor::new(data);
        let zero = reader.read_u16::<LE>().or_truncated("SHP header")?;
        if zero != 0 {
            return Err(FormatError::BadHeader(format!(
                "SHP must start with a zero word, found {zero:#06x}"
            )));
        }
        let width = reader.read_u16::<LE>().or_truncated("SHP header")?;
        let height = reader.read_u16::<LE>().or_truncated("SHP header")?;
        let frame_count = reader.read_u16::<LE>().or_truncated("SHP header")? as usize;

        let table_end = HEADER_SIZE + frame_count * FRAME_HEADER_SIZE;
        if table_end > data.len() {
            return Err(FormatError::OffsetOutOfBounds {
                what: "SHP frame table",
                offset: table_end,
                len: data.len(),
            });
        }

        let mut frames = Vec::with_capacity(frame_count);
        for _ in 0..frame_count {
            let x = reader.read_u16::<LE>().or_truncated("SHP frame header")?;
            let y = reader.read_u16::<LE>().or_truncated("SHP frame header")?;
            let frame_width = reader.read_u16::<LE>().or_truncated("SHP frame header")?;
            let frame_height = reader.read_u16::<LE>().or_truncated("SHP frame header")?;
            let compression = reader.read_u8().or_truncated("SHP frame header")?;
            let mut align = [0u8; 3];
            reader.read_exact(&mut align).or_truncated("SHP frame header")?;
            let mut color = [0u8; 4];
            reader.read_exact(&mut color).or_truncated("SHP frame header")?;
            let _reserved = reader.read_u32::<LE>().or_truncated("SHP frame header")?;
            let data_offset = reader.read_u32::<LE>().or_truncated("SHP frame header")?;

            let info = ShpFrameInfo {
                x,
                y,
                width: frame_width,
                height: frame_height,
                compression,
                radar_color: [color[0], color[1], color[2]],
                data_offset,
            };

            if info.pixel_count() > SIZE_LIMIT {
                return Err(FormatError::corrupt(
                    frames.len(),
                    format!("frame size {frame_width}x{frame_height} exceeds the size limit"),
                ));
            }

            if info.has_image() && data_offset as usize >= data.len() {
                return Err(FormatError::OffsetOutOfBounds {
                    what: "SHP frame data",
                    offset: data_offset as usize,
                    len: data.len(),
                });
            }

            frames.push(info);
        }

        Ok(Self {
            width,
            height,
            frames,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_info(&self, index: usize) -> Option<ShpFrameInfo> {
        self.frames.get(index).copied()
    }

    /// Decompresses frame `index` out of `data`, the same buffer given to
    /// [`ShpFile::parse`]. Returns `Ok(None)` for frames without an image.
    pub fn decode_frame(
        &self,
        index: usize,
        data: &[u8],
    ) -> Result<Option<Vec<u8>>, FormatError> {
        let info = self
            .frame_info(index)
            .ok_or(FormatError::FrameOutOfRange {
                index,
                count: self.frames.len(),
            })?;

        if !info.has_image() {
            return Ok(None);
        }

        let start = info.data_offset as usize;
        let source = data.get(start..).ok_or(FormatError::OffsetOutOfBounds {
            what: "SHP frame data",
            offset: start,
            len: data.len(),
        })?;

        let width = info.width as usize;
        let mut pixels = vec![0u8; info.pixel_count()];

        match ShpCompression::try_from(info.compression) {
            Ok(ShpCompression::None | ShpCompression::Raw) => {
                let raw = source
                    .get(..pixels.len())
                    .ok_or(FormatError::Truncated("SHP frame pixels"))?;
                pixels.copy_from_slice(raw);
            }
            Ok(ShpCompression::Scanline) => {
                let mut reader = Cursor::new(source);
                for row in pixels.chunks_exact_mut(width) {
                    let count = read_scanline_length(&mut reader, index)?;
                    if count > width {
                        return Err(FormatError::corrupt(index, "scanline wider than frame"));
                    }
                    reader
                        .read_exact(&mut row[..count])
                        .or_truncated("SHP scanline")?;
                }
            }
            Ok(ShpCompression::ScanlineRle) => {
                let mut reader = Cursor::new(source);
                for row in pixels.chunks_exact_mut(width) {
                    let count = read_scanline_length(&mut reader, index)?;
                    let position = reader.position() as usize;
                    let line = source
                        .get(position..position + count)
                        .ok_or(FormatError::Truncated("SHP scanline"))?;
                    reader.set_position((position + count) as u64);
                    decode_rle_line(line, row)
                        .map_err(|reason| FormatError::corrupt(index, reason))?;
                }
            }
            Err(_) => {
                return Err(FormatError::UnsupportedCompression {
                    frame: index,
                    mode: info.compression,
                });
            }
        }

        Ok(Some(pixels))
    }

    /// Parses `data` and decodes every frame.
    pub fn read_container(data: &[u8]) -> Result<SpriteContainer, FormatError> {
        let shp = Self::parse(data)?;

        let mut frames = Vec::with_capacity(shp.frame_count());
        for (index, info) in shp.frames.iter().enumerate() {
            frames.push(SpriteFrame {
                width: info.width as u32,
                height: info.height as u32,
                x_offset: info.x as i32,
                y_offset: info.y as i32,
                pixels: shp.decode_frame(index, data)?,
            });
        }

        Ok(SpriteContainer {
            width: shp.width as u32,
            height: shp.height as u32,
            frames,
        })
    }
}

fn read_scanline_length(reader: &mut Cursor<&[u8]>, frame: usize) -> Result<usize, FormatError> {
    let length = reader.read_u16::<LE>().or_truncated("SHP scanline length")? as usize;
    length
        .checked_sub(2)
        .ok_or_else(|| FormatError::corrupt(frame, "scanline length shorter than its prefix"))
}

fn decode_rle_line(line: &[u8], row: &mut [u8]) -> Result<(), &'static str> {
    let mut x = 0;
    let mut bytes = line.iter();

    while let Some(&value) = bytes.next() {
        if value == 0 {
            let run = *bytes.next().ok_or("zero run without a length")? as usize;
            if x + run > row.len() {
                return Err("zero run past end of scanline");
            }
            row[x..x + run].fill(0);
            x += run;
        } else {
            let pixel = row.get_mut(x).ok_or("pixel past end of scanline")?;
            *pixel = value;
            x += 1;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestFrame {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        compression: u8,
        body: Option<Vec<u8>>,
    }

    /// Lays out a SHP file with the frame bodies following the frame table.
    fn build_shp(width: u16, height: u16, frames: &[TestFrame]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&(frames.len() as u16).to_le_bytes());

        let mut offset = HEADER_SIZE + frames.len() * FRAME_HEADER_SIZE;
        let mut bodies = Vec::new();
        for frame in frames {
            out.extend_from_slice(&frame.x.to_le_bytes());
            out.extend_from_slice(&frame.y.to_le_bytes());
            out.extend_from_slice(&frame.width.to_le_bytes());
            out.extend_from_slice(&frame.height.to_le_bytes());
            out.push(frame.compression);
            out.extend_from_slice(&[0, 0, 0]);
            out.extend_from_slice(&[1, 2, 3, 0]);
            out.extend_from_slice(&0u32.to_le_bytes());
            match &frame.body {
                Some(body) => {
                    out.extend_from_slice(&(offset as u32).to_le_bytes());
                    offset += body.len();
                    bodies.extend_from_slice(body);
                }
                None => out.extend_from_slice(&0u32.to_le_bytes()),
            }
        }
        out.extend_from_slice(&bodies);
        out
    }

    fn raw_frame(width: u16, height: u16, pixels: Vec<u8>) -> TestFrame {
        TestFrame {
            x: 0,
            y: 0,
            width,
            height,
            compression: 1,
            body: Some(pixels),
        }
    }

    #[test]
    fn decodes_raw_frames() {
        let data = build_shp(2, 2, &[raw_frame(2, 2, vec![1, 2, 3, 4])]);

        let shp = ShpFile::parse(&data).unwrap();
        assert_eq!(shp.frame_count(), 1);
        assert_eq!(shp.decode_frame(0, &data).unwrap(), Some(vec![1, 2, 3, 4]));
    }

    #[test]
    fn frame_info_reports_geometry() {
        let mut frame = raw_frame(3, 1, vec![7, 7, 7]);
        frame.x = 5;
        frame.y = 9;
        let data = build_shp(16, 16, &[frame]);

        let info = ShpFile::parse(&data).unwrap().frame_info(0).unwrap();
        assert_eq!((info.x, info.y, info.width, info.height), (5, 9, 3, 1));
        assert_eq!(info.radar_color, [1, 2, 3]);
    }

    #[test]
    fn decodes_scanline_frames() {
        // Short lines are padded with transparent pixels.
        let body = vec![4, 0, 9, 8, 3, 0, 7];
        let data = build_shp(
            3,
            2,
            &[TestFrame {
                x: 0,
                y: 0,
                width: 3,
                height: 2,
                compression: 2,
                body: Some(body),
            }],
        );

        let shp = ShpFile::parse(&data).unwrap();
        assert_eq!(
            shp.decode_frame(0, &data).unwrap(),
            Some(vec![9, 8, 0, 7, 0, 0])
        );
    }

    #[test]
    fn decodes_zero_runs() {
        // Line 1: 5, run of 2 zeros, 6. Line 2: run of 4 zeros.
        let body = vec![6, 0, 5, 0, 2, 6, 4, 0, 0, 4];
        let data = build_shp(
            4,
            2,
            &[TestFrame {
                x: 0,
                y: 0,
                width: 4,
                height: 2,
                compression: 3,
                body: Some(body),
            }],
        );

        let shp = ShpFile::parse(&data).unwrap();
        assert_eq!(
            shp.decode_frame(0, &data).unwrap(),
            Some(vec![5, 0, 0, 6, 0, 0, 0, 0])
        );
    }

    #[test]
    fn empty_frames_decode_to_none() {
        let data = build_shp(
            8,
            8,
            &[
                raw_frame(1, 1, vec![3]),
                TestFrame {
                    x: 0,
                    y: 0,
                    width: 0,
                    height: 0,
                    compression: 0,
                    body: None,
                },
            ],
        );

        let container = ShpFile::read_container(&data).unwrap();
        assert_eq!(container.frame_count(), 2);
        assert_eq!(container.frames[0].pixels, Some(vec![3]));
        assert_eq!(container.frames[1].pixels, None);
    }

    #[test]
    fn decoded_buffers_match_frame_size() {
        let frames = [
            raw_frame(3, 2, vec![1; 6]),
            TestFrame {
                x: 0,
                y: 0,
                width: 5,
                height: 2,
                compression: 3,
                body: Some(vec![3, 0, 1, 3, 0, 1]),
            },
        ];
        let data = build_shp(8, 8, &frames);

        let shp = ShpFile::parse(&data).unwrap();
        for index in 0..shp.frame_count() {
            let info = shp.frame_info(index).unwrap();
            let pixels = shp.decode_frame(index, &data).unwrap().unwrap();
            assert_eq!(pixels.len(), info.width as usize * info.height as usize);
        }
    }

    #[test]
    fn rejects_nonzero_leading_word() {
        let mut data = build_shp(1, 1, &[raw_frame(1, 1, vec![1])]);
        data[0] = 1;
        assert!(matches!(
            ShpFile::parse(&data),
            Err(FormatError::BadHeader(_))
        ));
    }

    #[test]
    fn rejects_frame_table_past_end() {
        let mut data = build_shp(1, 1, &[raw_frame(1, 1, vec![1])]);
        data[6] = 200;
        assert!(matches!(
            ShpFile::parse(&data),
            Err(FormatError::OffsetOutOfBounds { .. })
        ));
    }

    #[test]
    fn truncated_pixels_are_a_format_error() {
        let mut data = build_shp(4, 4, &[raw_frame(4, 4, vec![1; 16])]);
        data.truncate(data.len() - 3);

        let shp = ShpFile::parse(&data).unwrap();
        assert!(matches!(
            shp.decode_frame(0, &data),
            Err(FormatError::Truncated(_))
        ));
    }

    #[test]
    fn overlong_zero_run_is_corrupt() {
        let body = vec![4, 0, 0, 9];
        let data = build_shp(
            4,
            1,
            &[TestFrame {
                x: 0,
                y: 0,
                width: 4,
                height: 1,
                compression: 3,
                body: Some(body),
            }],
        );

        let shp = ShpFile::parse(&data).unwrap();
        assert!(matches!(
            shp.decode_frame(0, &data),
            Err(FormatError::CorruptFrame { frame: 0, .. })
        ));
    }

    #[test]
    fn unknown_compression_is_reported() {
        let mut frame = raw_frame(1, 1, vec![1]);
        frame.compression = 9;
        let data = build_shp(1, 1, &[frame]);

        let shp = ShpFile::parse(&data).unwrap();
        assert!(matches!(
            shp.decode_frame(0, &data),
            Err(FormatError::UnsupportedCompression { frame: 0, mode: 9 })
        ));
    }
}
