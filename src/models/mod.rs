pub mod drama;
pub mod form;

pub use drama::{Drama, DramaForm};
pub use form::{DramaFormInput, NumberInput};
