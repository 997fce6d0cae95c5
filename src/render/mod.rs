pub mod markup;

pub use markup::{render_inline_markup, MarkupOptions};
