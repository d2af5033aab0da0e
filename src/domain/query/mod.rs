// Query-string transformation
//
// Parses a URL's query into an ordered parameter set, applies one
// transformation, and serializes it back into a `/path?query` URL.

mod args;
mod params;
mod transformer;

pub use args::{Additions, ArgumentError, OneOrMany};
pub use params::{ParameterSet, ParameterValue, UrlParts};
pub use transformer::QueryTransformer;
