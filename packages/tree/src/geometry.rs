//! Layout geometry: padding constants, text metrics and the layout context.
//!
//! All lengths are logical pixels. `LayoutConfig` is plain serde data so
//! hosts can ship it next to their other settings; `Geometry` pairs the
//! scaled config with a text measurer.

use std::borrow::Cow;
use std::fmt;

use codeblocks_format::Catalog;
use serde::{Deserialize, Serialize};

/// A width/height pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether `(x, y)` lies inside `[0, width] x [0, height]`.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x <= self.width && y <= self.height
    }
}

/// Padding and minimum sizes used by layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal gap between the columns of a fixed line.
    pub inner_padding_horizontal: f32,
    /// Vertical space above and below a fixed line's tallest column.
    pub inner_padding_vertical: f32,
    /// Horizontal ring around a nested block, and the stack indent.
    pub element_padding_horizontal: f32,
    /// Vertical ring around a nested block, and the gap between stacked blocks.
    pub element_padding_vertical: f32,
    /// Size of a child slot with nothing in it.
    pub empty_field_width: f32,
    pub empty_field_height: f32,
    /// Width of the gutter to the left of a stack.
    pub empty_line_width: f32,
    /// Width of the closing bar under a trailing stack.
    pub end_line_width: f32,
    /// Display scale applied to every length above.
    pub scale: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            inner_padding_horizontal: 8.0,
            inner_padding_vertical: 4.0,
            element_padding_horizontal: 4.0,
            element_padding_vertical: 4.0,
            empty_field_width: 40.0,
            empty_field_height: 24.0,
            empty_line_width: 16.0,
            end_line_width: 48.0,
            scale: 1.0,
        }
    }
}

impl LayoutConfig {
    /// The same config with `scale` folded into every length.
    pub fn scaled(&self) -> LayoutConfig {
        let s = self.scale;
        LayoutConfig {
            inner_padding_horizontal: self.inner_padding_horizontal * s,
            inner_padding_vertical: self.inner_padding_vertical * s,
            element_padding_horizontal: self.element_padding_horizontal * s,
            element_padding_vertical: self.element_padding_vertical * s,
            empty_field_width: self.empty_field_width * s,
            empty_field_height: self.empty_field_height * s,
            empty_line_width: self.empty_line_width * s,
            end_line_width: self.end_line_width * s,
            scale: 1.0,
        }
    }
}

/// Measures rendered text.
///
/// Hosts with a real font plug in their own measurer; tests and headless
/// tools use `MonospaceMetrics`.
pub trait TextMetrics: fmt::Debug {
    fn text_width(&self, text: &str) -> f32;

    /// Height of one line of text.
    fn line_height(&self) -> f32;
}

/// Every character has the same advance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMetrics {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
        }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

/// Scaled layout constants plus a text measurer.
#[derive(Debug)]
pub struct Geometry {
    config: LayoutConfig,
    metrics: Box<dyn TextMetrics>,
    text_height: f32,
}

impl Geometry {
    /// Build a geometry; `config.scale` is applied once, here.
    pub fn new(config: LayoutConfig, metrics: impl TextMetrics + 'static) -> Self {
        let text_height = metrics.line_height();
        Self {
            config: config.scaled(),
            metrics: Box::new(metrics),
            text_height,
        }
    }

    /// The scaled config.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn text_width(&self, text: &str) -> f32 {
        self.metrics.text_width(text)
    }

    pub fn text_height(&self) -> f32 {
        self.text_height
    }

    /// Height of the closing bar under a trailing stack.
    pub fn closing_line_height(&self) -> f32 {
        self.text_height + 2.0 * self.config.inner_padding_vertical
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::new(LayoutConfig::default(), MonospaceMetrics::default())
    }
}

/// Everything layout needs: geometry for sizes, the catalog for labels.
#[derive(Clone, Copy, Debug)]
pub struct LayoutContext<'a> {
    pub geometry: &'a Geometry,
    pub catalog: &'a Catalog,
}

impl<'a> LayoutContext<'a> {
    pub fn new(geometry: &'a Geometry, catalog: &'a Catalog) -> Self {
        Self { geometry, catalog }
    }

    pub fn config(&self) -> &'a LayoutConfig {
        self.geometry.config()
    }

    /// Resolve a label through the catalog's active language.
    pub fn label<'t>(&self, text: &'t str) -> Cow<'t, str>
    where
        'a: 't,
    {
        self.catalog.localize(text)
    }
}
