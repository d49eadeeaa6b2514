//! Fixed test prompts

use std::fmt;
use std::str::FromStr;

/// Which wording of the fixed prompts to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptStyle {
    /// Multi-point analysis instructions
    #[default]
    Detailed,
    /// One or two sentence answers
    Brief,
}

impl FromStr for PromptStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "brief" => Ok(Self::Brief),
            _ => Err(format!("Invalid prompt style: {}", s)),
        }
    }
}

/// One of the built-in vision tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisionTest {
    Color,
    Shape,
    General,
}

impl VisionTest {
    pub const ALL: [VisionTest; 3] = [VisionTest::Color, VisionTest::Shape, VisionTest::General];

    /// Human-readable test name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Color => "Color Recognition",
            Self::Shape => "Shape Recognition",
            Self::General => "General Vision Analysis",
        }
    }

    pub fn prompt(&self, style: PromptStyle) -> &'static str {
        match (self, style) {
            (Self::Color, PromptStyle::Detailed) => COLOR_DETAILED,
            (Self::Shape, PromptStyle::Detailed) => SHAPE_DETAILED,
            (Self::General, PromptStyle::Detailed) => GENERAL_DETAILED,
            (Self::Color, PromptStyle::Brief) => COLOR_BRIEF,
            (Self::Shape, PromptStyle::Brief) => SHAPE_BRIEF,
            (Self::General, PromptStyle::Brief) => GENERAL_BRIEF,
        }
    }
}

impl FromStr for VisionTest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "color" | "colour" => Ok(Self::Color),
            "shape" => Ok(Self::Shape),
            "general" => Ok(Self::General),
            _ => Err(format!("Unknown vision test: {}", s)),
        }
    }
}

impl fmt::Display for VisionTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const COLOR_DETAILED: &str = r#"Analyze the colors in this image in detail. Please:
1. List all the dominant colors you can identify
2. Be specific about color shades and tones (e.g., "navy blue" instead of just "blue")
3. Mention any color gradients or transitions
4. Identify any color patterns or color schemes
5. Estimate the percentage of each color in the image"#;

const SHAPE_DETAILED: &str = r#"Identify and analyze all geometric shapes in this image. Please:
1. List all shapes you can identify (circles, squares, triangles, rectangles, etc.)
2. Describe their positions and locations relative to each other
3. Estimate their sizes and proportions
4. Identify any patterns or arrangements of shapes
5. Note any complex shapes or combinations of basic shapes"#;

const GENERAL_DETAILED: &str = r#"Provide a comprehensive analysis of this image. Please describe:
1. All objects and elements you can identify
2. Colors and their distribution
3. Shapes and geometric patterns
4. Spatial relationships between elements
5. Any text or symbols present
6. Overall composition and style
7. Notable details or interesting features"#;

const COLOR_BRIEF: &str =
    "What are the main colors in this image? List them in a single sentence.";

const SHAPE_BRIEF: &str =
    "What geometric shapes do you see in this image? Describe them in one sentence.";

const GENERAL_BRIEF: &str =
    "Briefly describe what you see in this image in one or two sentences.";
