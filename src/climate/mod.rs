pub mod color;
pub mod scheme;
pub mod variable;

pub use color::{ColorMapper, Rgb, SequentialScale};
pub use scheme::ColorScheme;
pub use variable::{Variable, VariableDescriptor};
