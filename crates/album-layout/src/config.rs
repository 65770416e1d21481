use crate::constants::*;
use crate::layout::BoundingBox;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Page geometry and layout tuning, fixed for the lifetime of a layout engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    // Page
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub margins: PageMargins,

    // Usable area
    pub heading_reserve_cm: f32,
    pub image_gap_cm: f32,

    // Image sizing
    pub min_image_width_cm: f32,
    pub tall_ratio: f32,
    pub grid_width_fraction: f32,
    pub grid_height_fraction: f32,

    // Metadata fallback
    pub default_dpi: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            margins: PageMargins::default(),
            heading_reserve_cm: DEFAULT_HEADING_RESERVE_CM,
            image_gap_cm: DEFAULT_IMAGE_GAP_CM,
            min_image_width_cm: DEFAULT_MIN_IMAGE_WIDTH_CM,
            tall_ratio: DEFAULT_TALL_RATIO,
            grid_width_fraction: GRID_WIDTH_FRACTION,
            grid_height_fraction: GRID_HEIGHT_FRACTION,
            default_dpi: DEFAULT_DPI,
        }
    }
}

impl LayoutConfig {
    /// Load a configuration from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config: Self = serde_json::from_slice(&bytes)
            .map_err(|e| LayoutError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Page width and height in centimeters, orientation applied
    pub fn page_dimensions_cm(&self) -> (f32, f32) {
        self.paper_size.dimensions_with_orientation(self.orientation)
    }

    /// Width available for images: page width minus side margins
    pub fn usable_width_cm(&self) -> f32 {
        let (width, _) = self.page_dimensions_cm();
        width - self.margins.left_cm - self.margins.right_cm
    }

    /// Height available for images: page height minus margins and the title reserve
    pub fn usable_height_cm(&self) -> f32 {
        let (_, height) = self.page_dimensions_cm();
        height - self.margins.top_cm - self.margins.bottom_cm - self.heading_reserve_cm
    }

    /// Box for an image alone on its page. Never upscales.
    pub fn single_box(&self) -> BoundingBox {
        BoundingBox::fit(self.usable_width_cm(), self.usable_height_cm())
    }

    /// Box for each of two images stacked one above the other
    pub fn stacked_box(&self) -> BoundingBox {
        BoundingBox::fit(self.usable_width_cm(), self.usable_height_cm() / 2.0)
    }

    /// Box for each of two tall images placed next to each other
    pub fn side_by_side_box(&self) -> BoundingBox {
        BoundingBox::fit(self.usable_width_cm() / 2.0, self.usable_height_cm())
    }

    /// Box for each cell of a four-image page.
    ///
    /// Also the box the capacity check measures every candidate group with.
    pub fn grid_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.usable_width_cm() * self.grid_width_fraction,
            self.usable_height_cm() * self.grid_height_fraction - self.image_gap_cm,
            self.min_image_width_cm,
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.page_dimensions_cm();
        if !(width > 0.0 && height > 0.0) {
            return Err(LayoutError::Config(format!(
                "Page dimensions must be positive, got {}x{} cm",
                width, height
            )));
        }

        let margins = &self.margins;
        if [
            margins.top_cm,
            margins.bottom_cm,
            margins.left_cm,
            margins.right_cm,
        ]
        .iter()
        .any(|m| *m < 0.0 || !m.is_finite())
        {
            return Err(LayoutError::Config(
                "Margins must be finite and non-negative".to_string(),
            ));
        }

        if self.heading_reserve_cm < 0.0 || self.image_gap_cm < 0.0 || self.min_image_width_cm < 0.0
        {
            return Err(LayoutError::Config(
                "Heading reserve, image gap and minimum width must be non-negative".to_string(),
            ));
        }

        if self.usable_width_cm() <= 0.0 || self.usable_height_cm() <= 0.0 {
            return Err(LayoutError::Config(format!(
                "Margins leave no usable area ({:.2}x{:.2} cm)",
                self.usable_width_cm(),
                self.usable_height_cm()
            )));
        }

        for (name, fraction) in [
            ("grid_width_fraction", self.grid_width_fraction),
            ("grid_height_fraction", self.grid_height_fraction),
        ] {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(LayoutError::Config(format!(
                    "{} must be in (0, 1], got {}",
                    name, fraction
                )));
            }
        }

        if self.grid_box().max_height_cm <= 0.0 {
            return Err(LayoutError::Config(
                "Image gap leaves no room for four-image rows".to_string(),
            ));
        }

        if !(self.tall_ratio > 0.0) {
            return Err(LayoutError::Config(
                "Tall image ratio must be positive".to_string(),
            ));
        }

        if !(self.default_dpi > 0.0) {
            return Err(LayoutError::Config(
                "Default resolution must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
