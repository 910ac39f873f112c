//! Distribution renderer: one histogram panel per feature, stacked
//! vertically into a single PNG.

pub mod canvas;
pub mod histogram;

use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use tempfile::NamedTempFile;

use crate::color::Style;
use crate::data::filter::FilteredRows;
use crate::data::model::CellValue;
use crate::error::RenderError;
use self::histogram::{Histogram, BINS};

pub const PANEL_WIDTH: u32 = 800;
pub const PANEL_HEIGHT: u32 = 500;

/// Most panels one image may stack. Each default panel is about 1.2 MB of
/// raw pixels, so this bounds a render at roughly 20 MB.
pub const MAX_FEATURES: usize = 16;

#[derive(Debug, Clone)]
pub struct Renderer {
    pub style: Style,
    pub bins: usize,
    pub panel_width: u32,
    pub panel_height: u32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            style: Style::default(),
            bins: BINS,
            panel_width: PANEL_WIDTH,
            panel_height: PANEL_HEIGHT,
        }
    }
}

impl Renderer {
    /// Render one histogram per feature of `rows` into a PNG at `output_path`.
    ///
    /// Every feature is resolved before anything touches the filesystem, so
    /// a bad feature name leaves any existing file at `output_path` as it
    /// was. The image goes to a temp file beside the target and is renamed
    /// over it, so the path only ever holds a complete image.
    pub fn render(
        &self,
        rows: &FilteredRows<'_>,
        features: &[String],
        output_path: &Path,
    ) -> Result<(), RenderError> {
        if features.is_empty() {
            return Err(RenderError::NoFeatures);
        }
        if features.len() > MAX_FEATURES {
            return Err(RenderError::TooManyFeatures {
                requested: features.len(),
                max: MAX_FEATURES,
            });
        }

        let histograms = features
            .iter()
            .map(|feature| {
                let values = feature_values(rows, feature)?;
                Ok(Histogram::new(&values, self.bins))
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        let height = u32::try_from(histograms.len())
            .ok()
            .and_then(|n| self.panel_height.checked_mul(n))
            .ok_or(RenderError::ImageTooLarge {
                panels: histograms.len(),
                panel_height: self.panel_height,
            })?;
        let mut img = RgbImage::from_pixel(self.panel_width, height, self.style.background);
        for (i, hist) in histograms.iter().enumerate() {
            canvas::draw_panel(
                &mut img,
                self.panel_height * i as u32,
                self.panel_width,
                self.panel_height,
                hist,
                &self.style,
            );
        }

        write_png(&img, output_path)
    }
}

/// Render with the default styling and bin count.
pub fn render(
    rows: &FilteredRows<'_>,
    features: &[String],
    output_path: &Path,
) -> Result<(), RenderError> {
    Renderer::default().render(rows, features, output_path)
}

/// Numeric values of `feature` over `rows`. Null cells are skipped; any other
/// non-numeric cell rejects the feature.
fn feature_values(rows: &FilteredRows<'_>, feature: &str) -> Result<Vec<f64>, RenderError> {
    let position = rows
        .dataset
        .column_position(feature)
        .ok_or_else(|| RenderError::UnknownFeature(feature.to_string()))?;

    let mut values = Vec::with_capacity(rows.len());
    for cell in rows.column(position) {
        match cell {
            CellValue::Null => {}
            other => match other.as_f64() {
                Some(v) => values.push(v),
                None => return Err(RenderError::NonNumericFeature(feature.to_string())),
            },
        }
    }
    Ok(values)
}

fn write_png(img: &RgbImage, output_path: &Path) -> Result<(), RenderError> {
    let io_err = |source| RenderError::Io {
        path: output_path.to_path_buf(),
        source,
    };

    let dir = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        PngEncoder::new(&mut writer).write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgb8,
        )?;
        writer.flush().map_err(io_err)?;
    }
    tmp.persist(output_path).map_err(|e| io_err(e.error))?;
    Ok(())
}
