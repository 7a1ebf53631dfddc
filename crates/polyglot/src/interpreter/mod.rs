//! Message resolution engine.
//!
//! The [`Catalog`] stores messages per language, the plural resolver picks a
//! CLDR form for a count, and the interpolator renders templates. A
//! [`Localizer`] ties them together with the fallback chain: preferred
//! languages, then the default message, then the id.

mod catalog;
mod defaults;
mod error;
mod interpolate;
mod localizer;
mod plural;

pub use catalog::{Catalog, parse_language};
#[cfg(feature = "global-defaults")]
pub use defaults::global_defaults;
pub use defaults::DefaultMessages;
pub use error::{
    BoxError, EvalError, InterpolationError, LoadError, LoadWarning, compute_suggestions,
};
pub use interpolate::render;
pub use localizer::Localizer;
pub use plural::{plural_form, plural_forms, plural_operands};
