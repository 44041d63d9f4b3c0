//! In-memory TIFF fixtures for integration tests

#![allow(dead_code)]

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};

/// Description of one plane to be written
#[derive(Clone)]
pub struct PlaneFixture {
    pub width: u32,
    pub height: u32,
    pub bits_per_sample: u16,
    pub samples_per_pixel: u16,
    pub compression: u16,
    pub photometric: Option<u16>,
    pub rows_per_strip: u32,
    /// Uncompressed samples, already in the file's byte order
    pub pixels: Vec<u8>,
    pub description: Option<String>,
    /// (XResolution, YResolution) as numerator/denominator pairs
    pub resolution: Option<((u32, u32), (u32, u32))>,
}

impl PlaneFixture {
    pub fn gray8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        PlaneFixture {
            width,
            height,
            bits_per_sample: 8,
            samples_per_pixel: 1,
            compression: 1,
            photometric: Some(1),
            rows_per_strip: height,
            pixels,
            description: None,
            resolution: None,
        }
    }

    pub fn gray16<B: ByteOrder>(width: u32, height: u32, samples: &[u16]) -> Self {
        let mut pixels = Vec::new();
        for &sample in samples {
            pixels.write_u16::<B>(sample).unwrap();
        }
        PlaneFixture {
            bits_per_sample: 16,
            ..Self::gray8(width, height, pixels)
        }
    }

    pub fn lzw(mut self) -> Self {
        self.compression = 5;
        self
    }

    pub fn rows_per_strip(mut self, rows: u32) -> Self {
        self.rows_per_strip = rows;
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.samples_per_pixel as usize * (self.bits_per_sample as usize / 8)
    }

    /// Strip payloads as they will be stored
    fn strips(&self) -> Vec<Vec<u8>> {
        let strip_bytes = (self.rows_per_strip as usize * self.row_bytes()).max(1);
        self.pixels
            .chunks(strip_bytes)
            .map(|chunk| match self.compression {
                5 => weezl::encode::Encoder::with_tiff_size_switch(weezl::BitOrder::Msb, 8)
                    .encode(chunk)
                    .unwrap(),
                _ => chunk.to_vec(),
            })
            .collect()
    }
}

/// Writes the planes as a TIFF file, one IFD per plane, in order
pub fn build_tiff<B: ByteOrder>(planes: &[PlaneFixture]) -> Vec<u8> {
    let mut buffer = Vec::new();
    let marker = if B::read_u16(&[1, 0]) == 1 { b"II" } else { b"MM" };
    buffer.extend_from_slice(marker);
    buffer.write_u16::<B>(42).unwrap();
    buffer.write_u32::<B>(0).unwrap();

    // Value blocks first, records collected for the IFDs written afterwards
    let mut tables = Vec::new();
    for plane in planes {
        let mut records = Vec::new();
        let strips = plane.strips();

        let mut offsets = Vec::new();
        for strip in &strips {
            offsets.push(buffer.len() as u32);
            buffer.extend_from_slice(strip);
        }
        let counts: Vec<u32> = strips.iter().map(|s| s.len() as u32).collect();

        records.push(long_record::<B>(256, plane.width));
        records.push(long_record::<B>(257, plane.height));
        let bits = vec![plane.bits_per_sample as u32; plane.samples_per_pixel as usize];
        records.push(array_record::<B>(&mut buffer, 258, 3, &bits));
        records.push(short_record::<B>(259, plane.compression));
        if let Some(photometric) = plane.photometric {
            records.push(short_record::<B>(262, photometric));
        }
        if let Some(text) = &plane.description {
            let mut bytes = text.as_bytes().to_vec();
            bytes.push(0);
            records.push(blob_record::<B>(&mut buffer, 270, 2, bytes.len() as u32, &bytes));
        }
        records.push(array_record::<B>(&mut buffer, 273, 4, &offsets));
        records.push(short_record::<B>(277, plane.samples_per_pixel));
        records.push(long_record::<B>(278, plane.rows_per_strip));
        records.push(array_record::<B>(&mut buffer, 279, 4, &counts));
        if let Some(((xn, xd), (yn, yd))) = plane.resolution {
            let mut block = Vec::new();
            block.write_u32::<B>(xn).unwrap();
            block.write_u32::<B>(xd).unwrap();
            records.push(blob_record::<B>(&mut buffer, 282, 5, 1, &block));
            let mut block = Vec::new();
            block.write_u32::<B>(yn).unwrap();
            block.write_u32::<B>(yd).unwrap();
            records.push(blob_record::<B>(&mut buffer, 283, 5, 1, &block));
        }
        tables.push(records);
    }

    let mut link_at = 4;
    for records in tables {
        if buffer.len() % 2 == 1 {
            buffer.push(0);
        }
        let offset = buffer.len() as u32;
        B::write_u32(&mut buffer[link_at..link_at + 4], offset);

        buffer.write_u16::<B>(records.len() as u16).unwrap();
        for record in records {
            buffer.extend_from_slice(&record);
        }
        link_at = buffer.len();
        buffer.write_u32::<B>(0).unwrap();
    }
    buffer
}

pub fn build_le(planes: &[PlaneFixture]) -> Vec<u8> {
    build_tiff::<LittleEndian>(planes)
}

pub fn build_be(planes: &[PlaneFixture]) -> Vec<u8> {
    build_tiff::<BigEndian>(planes)
}

fn record<B: ByteOrder>(tag: u16, field_type: u16, count: u32, value: [u8; 4]) -> Vec<u8> {
    let mut out = Vec::with_capacity(12);
    out.write_u16::<B>(tag).unwrap();
    out.write_u16::<B>(field_type).unwrap();
    out.write_u32::<B>(count).unwrap();
    out.extend_from_slice(&value);
    out
}

fn short_record<B: ByteOrder>(tag: u16, value: u16) -> Vec<u8> {
    let mut field = [0u8; 4];
    B::write_u16(&mut field[..2], value);
    record::<B>(tag, 3, 1, field)
}

fn long_record<B: ByteOrder>(tag: u16, value: u32) -> Vec<u8> {
    let mut field = [0u8; 4];
    B::write_u32(&mut field, value);
    record::<B>(tag, 4, 1, field)
}

/// SHORT (3) or LONG (4) array, inline when it fits
fn array_record<B: ByteOrder>(buffer: &mut Vec<u8>, tag: u16, field_type: u16, values: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for &value in values {
        match field_type {
            3 => bytes.write_u16::<B>(value as u16).unwrap(),
            _ => bytes.write_u32::<B>(value).unwrap(),
        }
    }
    blob_record::<B>(buffer, tag, field_type, values.len() as u32, &bytes)
}

/// Stores `bytes` inline when they fit, else appends them to `buffer`
fn blob_record<B: ByteOrder>(buffer: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, bytes: &[u8]) -> Vec<u8> {
    let mut field = [0u8; 4];
    if bytes.len() <= 4 {
        field[..bytes.len()].copy_from_slice(bytes);
    } else {
        if buffer.len() % 2 == 1 {
            buffer.push(0);
        }
        B::write_u32(&mut field, buffer.len() as u32);
        buffer.extend_from_slice(bytes);
    }
    record::<B>(tag, field_type, count, field)
}
