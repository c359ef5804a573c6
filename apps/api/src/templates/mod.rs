// Template registry: a closed set of style rows keyed by template id.

pub mod registry;

pub use registry::{is_known, list, resolve, HeaderLayout, HeadingDecoration, Rgb, TemplateStyle};
