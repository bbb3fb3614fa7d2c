//! Delivery bundle
//!
//! Packages the padded image together with a viewer page describing its geometry.

mod archive;
mod error;
mod template;

pub use archive::{StreetViewBundle, entry_file_name, timestamped_prefix};
pub use error::BundleError;
pub use template::{ViewerPage, ViewerTemplate, escape_html};
