//! `.images` files: reactor size plus the features to paint onto the
//! reactor textures.

use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImageDefinitionError {
    #[error("Image definition is empty")]
    Empty,
    #[error("Invalid reactor size '{0}' - should be NORMAL or LARGE")]
    Size(String),
    #[error("Invalid image feature '{0}'")]
    Feature(String),
}

/// Reactor texture set in use. A large reactor spreads over two textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactorSize {
    Normal,
    Large,
}

impl FromStr for ReactorSize {
    type Err = ImageDefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NORMAL" => Ok(ReactorSize::Normal),
            "LARGE" => Ok(ReactorSize::Large),
            _ => Err(ImageDefinitionError::Size(s.trim().to_string())),
        }
    }
}

/// A feature painted over grid cells. Coordinates are inclusive cell
/// indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// Cells a waldo may not enter
    NoWaldo { x1: i64, y1: i64, x2: i64, y2: i64 },
    /// Barrier along the top edge of row `y`
    HBarrier { y: i64, x1: i64, x2: i64 },
    /// Barrier along the left edge of column `x`
    VBarrier { x: i64, y1: i64, y2: i64 },
}

impl Feature {
    /// `None` for lines that are not features.
    pub fn parse(line: &str) -> Result<Option<Self>, ImageDefinitionError> {
        let mut parts = line.split(',').map(str::trim);
        let kind = parts.next().unwrap_or_default().to_ascii_uppercase();
        let arity = match kind.as_str() {
            "NOWALDO" => 4,
            "HBARRIER" | "VBARRIER" => 3,
            _ => return Ok(None),
        };

        let args = parts
            .map(|p| p.parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ImageDefinitionError::Feature(line.to_string()))?;
        if args.len() < arity {
            return Err(ImageDefinitionError::Feature(line.to_string()));
        }

        Ok(Some(match kind.as_str() {
            "NOWALDO" => Feature::NoWaldo {
                x1: args[0],
                y1: args[1],
                x2: args[2],
                y2: args[3],
            },
            "HBARRIER" => Feature::HBarrier {
                y: args[0],
                x1: args[1],
                x2: args[2],
            },
            _ => Feature::VBarrier {
                x: args[0],
                y1: args[1],
                y2: args[2],
            },
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDefinition {
    pub size: ReactorSize,
    pub features: Vec<Feature>,
}

impl ImageDefinition {
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self, ImageDefinitionError> {
        let (first, rest) = lines.split_first().ok_or(ImageDefinitionError::Empty)?;
        let size = first.as_ref().parse()?;

        let mut features = Vec::new();
        for line in rest {
            if let Some(feature) = Feature::parse(line.as_ref())? {
                features.push(feature);
            }
        }
        Ok(Self { size, features })
    }
}
