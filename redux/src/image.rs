//! The image container.

use std::{io::Write, ops::Index, path::Path};

use tracing::{info, info_span};

use crate::{
    color::{Color, Pixel},
    error::{ClusterError, ExportError, IndexError},
    kmeans::{self, Options, Report},
    palette, ppm,
};

/// A row-major RGB image, along with its reduced palette once one has been computed.
#[derive(Debug, Clone)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Pixel>,
    palette: Vec<Color>,
    parallel: bool,
}

impl Index<(usize, usize)> for Image {
    type Output = Pixel;

    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        assert!(
            x < self.width,
            "column {x} is out of bounds (the image is {} pixels wide)",
            self.width
        );
        match self.pixel(self.pixel_index((x, y))) {
            Ok(pixel) => pixel,
            Err(error) => panic!("{error}"),
        }
    }
}

impl Image {
    /// Creates an image out of a row-major pixel buffer. `pixels` must hold exactly
    /// `width * height` pixels.
    pub fn new(width: usize, height: usize, pixels: Vec<Pixel>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            pixels,
            palette: vec![],
            parallel: false,
        }
    }

    /// Creates an image out of row-major colors, numbering the pixels in order.
    pub fn from_colors(
        width: usize,
        height: usize,
        colors: impl IntoIterator<Item = Color>,
    ) -> Self {
        let pixels = colors
            .into_iter()
            .enumerate()
            .map(|(index, color)| Pixel::new(color, index))
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn pixel_index(&self, (x, y): (usize, usize)) -> usize {
        x + y * self.width
    }

    pub fn pixel(&self, index: usize) -> Result<&Pixel, IndexError> {
        self.pixels.get(index).ok_or(IndexError {
            got: index,
            count: self.pixels.len(),
        })
    }

    /// The reduced palette, if [`Image::cluster`] has been run.
    pub fn palette(&self) -> Option<&[Color]> {
        if self.palette.is_empty() {
            None
        } else {
            Some(self.palette.as_slice())
        }
    }

    /// Reduces the image's colors to `k` representatives. The resulting palette is stored in the
    /// image for later export and also returned as part of the report.
    pub fn cluster(&mut self, k: usize, options: Options) -> Result<Report, ClusterError> {
        let _span = info_span!("cluster", k).entered();
        self.parallel = options.parallel;
        let report = kmeans::cluster(&self.pixels, k, options)?;
        self.palette = report.palette.clone();
        Ok(report)
    }

    /// Returns a copy of this image with every pixel replaced by its closest palette color.
    pub fn reduced(&self) -> Result<Image, ExportError> {
        let centroids = self.palette().ok_or(ExportError::NoPalette)?;
        let colors = palette::remap(&self.pixels, centroids, self.parallel);
        Ok(Image::from_colors(self.width, self.height, colors))
    }

    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.pixels.iter().map(|pixel| pixel.color)
    }

    pub fn write<W>(&self, writer: W) -> Result<(), std::io::Error>
    where
        W: Write,
    {
        let colors: Vec<_> = self.colors().collect();
        ppm::write(writer, self.width, self.height, &colors)
    }

    pub fn write_reduced<W>(&self, writer: W) -> Result<(), ExportError>
    where
        W: Write,
    {
        self.reduced()?.write(writer)?;
        Ok(())
    }

    /// Writes the reduced image to `path`. The whole file is rendered in memory first, so a
    /// failure never leaves a partially written image behind.
    pub fn export_reduced(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let _span = info_span!("export", ?path).entered();
        info!(width = self.width, height = self.height, "exporting reduced image");

        let mut output = vec![];
        self.write_reduced(&mut output)?;
        std::fs::write(path, output)?;

        info!("export complete");
        Ok(())
    }
}
