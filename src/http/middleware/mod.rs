pub mod cors;

pub use cors::{cors_layer, options_ok};
