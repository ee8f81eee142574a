//! Convert VS Code color themes into Monaco editor theme definitions.
//!
//! The conversion itself lives in [`theme::transform()`] and never fails.
//! File handling and settings are layered on top in [`convert`] and [`config`].

pub mod config;
pub mod convert;
pub mod error;
pub mod theme;

pub use error::{Result, ThemeError};
pub use theme::{transform, SourceTheme, TargetTheme, TransformOptions};
