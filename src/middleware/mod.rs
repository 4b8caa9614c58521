pub mod htmx;
pub mod selection;

pub use htmx::{Htmx, HxRequest};
pub use selection::{Selection, SessionSettings};
