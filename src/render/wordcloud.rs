use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use super::font::{rasterize, text_size, GLYPH_HEIGHT};
use crate::stats::FrequencyTable;

/// Side of an occupancy cell in pixels
const CELL: u32 = 4;

const PALETTE: [[u8; 3]; 8] = [
    [31, 119, 180],
    [214, 39, 40],
    [44, 160, 44],
    [148, 103, 189],
    [140, 86, 75],
    [255, 127, 14],
    [23, 190, 207],
    [68, 68, 68],
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordCloudConfig {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
    pub max_words: usize,
    /// Seed for word colors
    pub random_state: u64,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            background: [255, 255, 255],
            max_words: 200,
            random_state: 42,
        }
    }
}

/// A word positioned on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub x: u32,
    pub y: u32,
    /// Pixels per font unit
    pub scale: u32,
    pub color: [u8; 3],
}

pub struct WordCloud {
    config: WordCloudConfig,
    stop_words: HashSet<String>,
}

impl WordCloud {
    pub fn new(config: WordCloudConfig) -> Self {
        Self {
            config,
            stop_words: get(LANGUAGE::English).into_iter().collect(),
        }
    }

    /// Most frequent words of `text` with their frequency relative to the
    /// most frequent one, highest first.
    ///
    /// Words are lowercased; stop words, numbers and one-letter words are
    /// left out.
    pub fn word_frequencies(&self, text: &str) -> Vec<(String, f64)> {
        let table: FrequencyTable<String> = text
            .unicode_words()
            .map(str::to_lowercase)
            .filter(|w| w.chars().count() >= 2)
            .filter(|w| !w.chars().all(|c| c.is_numeric()))
            .filter(|w| !self.stop_words.contains(w))
            .collect();
        let ranked = table.most_common(self.config.max_words);
        let Some(&(_, top)) = ranked.first() else {
            return Vec::new();
        };
        ranked
            .into_iter()
            .map(|(word, count)| (word, count as f64 / top as f64))
            .collect()
    }

    /// Place words from largest to smallest along a spiral from the center.
    ///
    /// A word that does not fit is retried at smaller sizes and dropped
    /// when even the smallest size does not fit.
    pub fn layout(&self, frequencies: &[(String, f64)]) -> Vec<PlacedWord> {
        let mut rng = StdRng::seed_from_u64(self.config.random_state);
        let mut grid = Occupancy::new(self.config.width, self.config.height);
        let max_scale = (self.config.height / (GLYPH_HEIGHT * 4)).max(1);

        let mut placed = Vec::new();
        for (word, relative) in frequencies {
            let mut scale = ((max_scale as f64 * relative).round() as u32).clamp(1, max_scale);
            while scale > 0 && text_size(word, scale).0 > self.config.width {
                scale -= 1;
            }

            let position = loop {
                if scale == 0 {
                    break None;
                }
                let (w, h) = text_size(word, scale);
                if let Some(cell) = grid.find_space(w, h) {
                    break Some(cell);
                }
                scale -= 1;
            };

            let Some((col, row)) = position else {
                debug!("No room left for {:?}", word);
                continue;
            };
            let (w, h) = text_size(word, scale);
            grid.occupy(col, row, w, h);
            placed.push(PlacedWord {
                word: word.clone(),
                x: col * CELL,
                y: row * CELL,
                scale,
                color: PALETTE[rng.gen_range(0..PALETTE.len())],
            });
        }
        placed
    }

    pub fn render(&self, words: &[PlacedWord]) -> RgbImage {
        let mut image = RgbImage::from_pixel(
            self.config.width,
            self.config.height,
            Rgb(self.config.background),
        );
        for word in words {
            rasterize(&word.word, word.scale, |dx, dy| {
                let (x, y) = (word.x + dx, word.y + dy);
                if x < image.width() && y < image.height() {
                    image.put_pixel(x, y, Rgb(word.color));
                }
            });
        }
        image
    }

    /// Draw the word cloud of `text`; text without any drawable word is an error
    pub fn generate(&self, text: &str) -> Result<RgbImage> {
        let frequencies = self.word_frequencies(text);
        if frequencies.is_empty() {
            bail!("Need at least one word to draw a word cloud");
        }
        let words = self.layout(&frequencies);
        debug!("Placed {} of {} words", words.len(), frequencies.len());
        Ok(self.render(&words))
    }
}

pub fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write image: {:?}", path))
}

/// Coarse grid of taken cells with a summed-area table for box queries
struct Occupancy {
    cols: u32,
    rows: u32,
    taken: Vec<bool>,
    sums: Vec<u32>,
}

impl Occupancy {
    fn new(width: u32, height: u32) -> Self {
        let (cols, rows) = (width / CELL, height / CELL);
        Self {
            cols,
            rows,
            taken: vec![false; (cols * rows) as usize],
            sums: vec![0; ((cols + 1) * (rows + 1)) as usize],
        }
    }

    fn cells(width: u32, height: u32) -> (u32, u32) {
        // One extra cell keeps a margin between words
        (width.div_ceil(CELL) + 1, height.div_ceil(CELL) + 1)
    }

    fn sum_at(&self, col: u32, row: u32) -> u32 {
        self.sums[(row * (self.cols + 1) + col) as usize]
    }

    fn is_free(&self, col: u32, row: u32, w: u32, h: u32) -> bool {
        let (c1, r1) = (col + w, row + h);
        if c1 > self.cols || r1 > self.rows {
            return false;
        }
        let total = self.sum_at(c1, r1) + self.sum_at(col, row)
            - self.sum_at(col, r1)
            - self.sum_at(c1, row);
        total == 0
    }

    /// Top-left cell of the first free box on a spiral around the center
    fn find_space(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let (w, h) = Self::cells(width, height);
        if w > self.cols || h > self.rows {
            return None;
        }
        let (cx, cy) = (self.cols as f64 / 2.0, self.rows as f64 / 2.0);
        let aspect = self.rows as f64 / self.cols as f64;
        let limit = self.cols.max(self.rows) as f64;

        let mut step = 0u32;
        loop {
            let t = step as f64 * 0.1;
            let radius = t * 0.5;
            if radius > limit {
                return None;
            }
            let x = cx + radius * t.cos() - w as f64 / 2.0;
            let y = cy + radius * t.sin() * aspect - h as f64 / 2.0;
            if x >= 0.0 && y >= 0.0 {
                let (col, row) = (x.round() as u32, y.round() as u32);
                if self.is_free(col, row, w, h) {
                    return Some((col, row));
                }
            }
            step += 1;
        }
    }

    fn occupy(&mut self, col: u32, row: u32, width: u32, height: u32) {
        let (w, h) = Self::cells(width, height);
        for r in row..(row + h).min(self.rows) {
            for c in col..(col + w).min(self.cols) {
                self.taken[(r * self.cols + c) as usize] = true;
            }
        }
        let stride = self.cols + 1;
        for r in 0..self.rows {
            for c in 0..self.cols {
                let cell = u32::from(self.taken[(r * self.cols + c) as usize]);
                let idx = ((r + 1) * stride + c + 1) as usize;
                self.sums[idx] = cell + self.sums[idx - 1] + self.sums[idx - stride as usize]
                    - self.sums[idx - stride as usize - 1];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud() -> WordCloud {
        WordCloud::new(WordCloudConfig::default())
    }

    #[test]
    fn test_frequencies_skip_stop_words_and_numbers() {
        let frequencies = cloud().word_frequencies("The ballot, the BALLOT and the suffrage in 1965 a");
        assert_eq!(
            frequencies,
            vec![("ballot".to_string(), 1.0), ("suffrage".to_string(), 0.5)]
        );
    }

    #[test]
    fn test_layout_does_not_overlap() {
        let text = "freedom freedom freedom justice justice vote church school land labor";
        let cloud = cloud();
        let words = cloud.layout(&cloud.word_frequencies(text));
        assert!(!words.is_empty());
        assert_eq!(words[0].word, "freedom");

        let boxes: Vec<(u32, u32, u32, u32)> = words
            .iter()
            .map(|p| {
                let (w, h) = text_size(&p.word, p.scale);
                (p.x, p.y, p.x + w, p.y + h)
            })
            .collect();
        for (i, a) in boxes.iter().enumerate() {
            assert!(a.2 <= 800 && a.3 <= 400);
            for b in &boxes[i + 1..] {
                let apart = a.2 <= b.0 || b.2 <= a.0 || a.3 <= b.1 || b.3 <= a.1;
                assert!(apart, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_generate_canvas() {
        let image = cloud().generate("freedom suffrage ballot").unwrap();
        assert_eq!(image.dimensions(), (800, 400));
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert!(image.pixels().any(|p| p != &Rgb([255, 255, 255])));
    }

    #[test]
    fn test_generate_without_words_fails() {
        assert!(cloud().generate("the and of").is_err());
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.png");
        let image = cloud().generate("freedom suffrage").unwrap();
        save_png(&image, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
