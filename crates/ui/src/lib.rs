//! Editor panels that sit beside the canvas: the node palette catalog and the
//! properties editor for the selected node.

pub mod node_palette;
pub mod properties;

pub use node_palette::{NodeTemplate, PaletteCategory};
pub use properties::{FieldInput, FormField, PropertiesEditor};
