pub use bradio_core::Error;

pub use anstream::eprintln;
pub use color_eyre::eyre::{eyre, Result};
