//! Reactor texture patching for puzzles with custom reactor layouts

mod definition;
mod texture;

pub use definition::{Feature, ImageDefinition, ImageDefinitionError, ReactorSize};
pub use texture::{
    layouts, FeatureImages, Texture, TextureError, TextureLayout, CELL_SIZE, TEXTURE_WIDTH,
};
