//! Header-row interpretation: alias matching and the field-to-column layout.

mod layout;
mod resolve;

pub use layout::Layout;
pub use resolve::{default_columns, normalize_header, resolve};
