//! Data models for annotated components.

mod component;
mod style;

pub use component::{Component, ComponentPatch, ComponentType};
pub use style::{
    BackgroundStyle, BorderStyle, ImageStyle, LayoutStyle, ShadowStyle, Style, TypographyStyle,
};
