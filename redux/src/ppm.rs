//! Support for plain (ASCII) PPM files.

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use tracing::{debug, info_span};

use crate::{
    color::{Color, Pixel},
    error::LoadError,
    image::Image,
};

pub const MAGIC: &str = "P3";
pub const MAX_VALUE: u32 = 255;

/// Splits PPM data into whitespace-separated tokens, skipping `#` comments. Comments may hold
/// arbitrary bytes; only the tokens themselves need to be ASCII.
fn tokens(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    data.split(|&byte| byte == b'\n').flat_map(|line| {
        let data = match line.iter().position(|&byte| byte == b'#') {
            Some(comment) => &line[..comment],
            None => line,
        };
        data.split(u8::is_ascii_whitespace)
            .filter(|token| !token.is_empty())
    })
}

fn parse_integer(token: &[u8]) -> Option<i64> {
    std::str::from_utf8(token).ok()?.parse().ok()
}

fn parse_header_field<'a>(
    tokens: &mut impl Iterator<Item = &'a [u8]>,
    field: &'static str,
) -> Result<i64, LoadError> {
    tokens
        .next()
        .and_then(parse_integer)
        .ok_or(LoadError::MalformedHeader { field })
}

/// Parses a plain PPM image from text.
pub fn parse(text: &str) -> Result<Image, LoadError> {
    parse_bytes(text.as_bytes())
}

/// Parses a plain PPM image from raw file contents.
pub fn parse_bytes(data: &[u8]) -> Result<Image, LoadError> {
    let mut tokens = tokens(data);

    let magic = tokens.next().unwrap_or_default();
    if magic != MAGIC.as_bytes() {
        return Err(LoadError::InvalidMagic {
            found: String::from_utf8_lossy(magic).into_owned(),
        });
    }

    let width = parse_header_field(&mut tokens, "width")?.max(0) as usize;
    let height = parse_header_field(&mut tokens, "height")?.max(0) as usize;
    let max_value = parse_header_field(&mut tokens, "maximum channel value")?;
    debug!(width, height, max_value, "read PPM header");

    let count = width
        .checked_mul(height)
        .ok_or(LoadError::MalformedHeader {
            field: "dimensions",
        })?;
    if count == 0 {
        return Err(LoadError::Empty);
    }

    let mut pixels = Vec::with_capacity(count.min(data.len()));
    for index in 0..count {
        let mut channel = || -> Result<f64, LoadError> {
            let token = tokens.next().ok_or(LoadError::Truncated {
                expected: count,
                got: index,
            })?;
            parse_integer(token)
                .map(|value| value as f64)
                .ok_or(LoadError::MalformedPixel { index })
        };
        let color = Color::new(channel()?, channel()?, channel()?);
        pixels.push(Pixel::new(color, index));
    }

    Ok(Image::new(width, height, pixels))
}

/// Reads a plain PPM image from `reader`.
pub fn read<R>(mut reader: R) -> Result<Image, LoadError>
where
    R: Read,
{
    let mut data = vec![];
    reader.read_to_end(&mut data)?;
    parse_bytes(&data)
}

/// Loads a plain PPM image from a file.
pub fn load(path: impl AsRef<Path>) -> Result<Image, LoadError> {
    let path = path.as_ref();
    let _span = info_span!("load", ?path).entered();
    let image = read(File::open(path)?)?;
    debug!(pixels = image.pixels.len(), "image loaded");
    Ok(image)
}

/// Writes `colors` as a plain PPM image, one line of `r g b` triples per image row.
pub fn write<W>(
    mut writer: W,
    width: usize,
    height: usize,
    colors: &[Color],
) -> Result<(), std::io::Error>
where
    W: Write,
{
    writeln!(writer, "{MAGIC}")?;
    writeln!(writer, "{width} {height}")?;
    writeln!(writer, "{MAX_VALUE}")?;

    if width == 0 {
        return Ok(());
    }
    for row in colors.chunks(width) {
        for (i, color) in row.iter().enumerate() {
            if i > 0 {
                writer.write_all(b" ")?;
            }
            write!(writer, "{color}")?;
        }
        writer.write_all(b"\n")?;
    }

    Ok(())
}
