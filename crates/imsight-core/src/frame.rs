//! Chart frame layout
//!
//! A [`Frame`] is the outer chart size plus margins reserved for axes and
//! legends. Chart builders lay marks out inside the plot area, with the
//! origin at the top-left corner of that area and y growing downwards.

use serde::{Deserialize, Serialize};

/// Space reserved around the plot area, in pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same margin on every side
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}

impl Default for Margin {
    fn default() -> Self {
        // Leaves room on the right for a legend
        Self::new(20.0, 120.0, 50.0, 60.0)
    }
}

/// Outer chart size and margins
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Frame {
    /// Create a frame with the default margins
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: Margin::default(),
        }
    }

    /// Replace the margins
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Plot area width
    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    /// Plot area height
    pub fn inner_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }

    /// Horizontal range for left-to-right scales
    pub fn x_range(&self) -> [f64; 2] {
        [0.0, self.inner_width()]
    }

    /// Vertical range for bottom-to-top scales (y is flipped)
    pub fn y_range(&self) -> [f64; 2] {
        [self.inner_height(), 0.0]
    }

    /// Largest radius that fits the plot area
    pub fn radius(&self) -> f64 {
        self.inner_width().min(self.inner_height()).max(0.0) / 2.0
    }

    /// Center of the plot area
    pub fn center(&self) -> [f64; 2] {
        [self.inner_width() / 2.0, self.inner_height() / 2.0]
    }

    /// Check if the plot area has positive size
    pub fn is_valid(&self) -> bool {
        self.inner_width() > 0.0 && self.inner_height() > 0.0
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(600.0, 400.0)
    }
}
