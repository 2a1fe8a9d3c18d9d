//! Data model for harvested publications
//!
//! - `PartialArticle`: one row of a profile listing page
//! - `Article`: a publication with its detail-page metadata (cached by detail URL)
//! - `Profile`: a researcher's ordered article list (cached by user handle)

mod article;
mod profile;

pub use article::{Article, PartialArticle};
pub use profile::Profile;
