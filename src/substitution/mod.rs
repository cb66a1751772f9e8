//! Matchers and substitutions

pub mod matcher;
#[allow(clippy::module_inception)]
pub mod substitution;

pub use matcher::Matcher;
pub use substitution::Substitution;
