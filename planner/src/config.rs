use std::ffi::OsString;
use std::fmt;

use clap::Parser;

pub const DEFAULT_WIDTH: i64 = 1024;
pub const DEFAULT_HEIGHT: i64 = 768;
pub const DEFAULT_SCALE: i64 = 2;
pub const MIN_SCALE: i64 = 1;
pub const MAX_SCALE: i64 = 5;

#[derive(Debug, Parser)]
#[command(name = "planner", about = "The Plan: a checklist panel over a minimal render loop.")]
struct Args {
    /// Scaling width in pixels
    #[arg(long, value_name = "WIDTH", default_value_t = DEFAULT_WIDTH, allow_negative_numbers = true)]
    width: i64,

    /// Scaling height in pixels
    #[arg(long, value_name = "HEIGHT", default_value_t = DEFAULT_HEIGHT, allow_negative_numbers = true)]
    height: i64,

    /// Scaling factor
    #[arg(long, value_name = "SCALE", default_value_t = DEFAULT_SCALE, allow_negative_numbers = true)]
    scale: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchConfig {
    pub width: u32,
    pub height: u32,
    pub scale_factor: u8,
}

#[derive(Debug)]
pub enum ConfigError {
    /// Unknown flag, malformed number, or a `--help` request.
    Args(clap::Error),
    OutOfRange { width: i64, height: i64, scale: i64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Args(err) => write!(f, "{}", err),
            ConfigError::OutOfRange { .. } => write!(f, "Command line options are outside reasonable range!"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Args(err) => Some(err),
            ConfigError::OutOfRange { .. } => None,
        }
    }
}

impl ConfigError {
    /// The values that were given, for the operator to see what was rejected.
    pub fn parameters(&self) -> Vec<(&'static str, String)> {
        match *self {
            ConfigError::Args(_) => Vec::new(),
            ConfigError::OutOfRange { width, height, scale } => parameters(width, height, scale).to_vec(),
        }
    }
}

impl LaunchConfig {
    /// Parses process arguments, the first item being the program name.
    pub fn parse_from<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = Args::try_parse_from(args).map_err(ConfigError::Args)?;
        Self::validate(args.width, args.height, args.scale)
    }

    fn validate(width: i64, height: i64, scale: i64) -> Result<Self, ConfigError> {
        let out_of_range = || ConfigError::OutOfRange { width, height, scale };

        if !(MIN_SCALE..=MAX_SCALE).contains(&scale) {
            return Err(out_of_range());
        }

        Ok(Self {
            width: u32::try_from(width).map_err(|_| out_of_range())?,
            height: u32::try_from(height).map_err(|_| out_of_range())?,
            scale_factor: scale as u8,
        })
    }

    pub fn scale(&self) -> f32 {
        self.scale_factor as f32
    }

    pub fn parameters(&self) -> [(&'static str, String); 3] {
        parameters(self.width, self.height, self.scale_factor)
    }
}

fn parameters(width: impl fmt::Display, height: impl fmt::Display, scale: impl fmt::Display) -> [(&'static str, String); 3] {
    [
        ("--width", width.to_string()),
        ("--height", height.to_string()),
        ("--scale", scale.to_string()),
    ]
}
