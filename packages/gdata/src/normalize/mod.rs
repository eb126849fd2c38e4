//! Generic feed normalization.
//!
//! Turns arbitrary Atom entries into [`NormalizedRecord`]s whose shape follows
//! the source document:
//!
//! - [`normalize_key`] derives keys from (possibly namespaced) names
//! - [`coerce_value`] turns `"true"`/`"false"` into booleans on first insert
//! - [`flatten`] walks one element recursively
//! - [`extract_verification_methods`] re-reads site entries for their
//!   attribute-keyed verification map

mod flatten;
mod key;
mod types;
mod verification;

pub use flatten::flatten;
pub use key::{coerce_value, normalize_key};
pub use types::{NormalizedRecord, RecordValue};
pub use verification::{extract_verification_methods, VERIFICATION_METHODS_KEY};
