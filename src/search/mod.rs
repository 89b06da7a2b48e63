pub mod suggest;

pub use suggest::{Suggester, Suggestion};
