//! Built-in field backends, one per concrete field type.

mod checkbox;
mod date;
mod select;
mod text;

pub use checkbox::CheckboxBackend;
pub use date::{DateBackend, DateTimeBackend};
pub use select::{DropdownBackend, MultiselectBackend};
pub use text::{TextAreaBackend, TextBackend};
