use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::selection::CropRect;

/// Image region given on the command line as `X,Y,WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error)]
pub enum RegionParseError {
    #[error("Invalid region format: expected X,Y,WIDTHxHEIGHT (e.g., 10,20,300x40)")]
    InvalidFormat,
    #[error("Invalid region coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("Invalid region size: {0}")]
    InvalidSize(String),
    #[error("Region width and height must be positive")]
    Empty,
}

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(RegionParseError::InvalidFormat);
        }

        let coord = |raw: &str| -> Result<u32, RegionParseError> {
            raw.trim()
                .parse()
                .map_err(|_| RegionParseError::InvalidCoordinate(raw.to_string()))
        };
        let x = coord(parts[0])?;
        let y = coord(parts[1])?;

        let (w, h) = parts[2]
            .split_once('x')
            .ok_or(RegionParseError::InvalidFormat)?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| RegionParseError::InvalidSize(parts[2].to_string()))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| RegionParseError::InvalidSize(parts[2].to_string()))?;

        if width == 0 || height == 0 {
            return Err(RegionParseError::Empty);
        }

        Ok(Region {
            x,
            y,
            width,
            height,
        })
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}x{}", self.x, self.y, self.width, self.height)
    }
}

impl From<Region> for CropRect {
    fn from(region: Region) -> Self {
        CropRect {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
        }
    }
}
