//! Conventional content type tags for import uploads.
//!
//! Uploads accept any tag that is a valid key segment; these names are the
//! ones the finalization step knows how to consume.

pub const PACKAGES: &str = "packages";
pub const DOCKERFILE: &str = "dockerfile";
pub const MANIFEST: &str = "manifest";
pub const PARENT_MANIFEST: &str = "parent_manifest";
pub const IMAGE_CONFIG: &str = "image_config";

pub const KNOWN: &[&str] = &[PACKAGES, DOCKERFILE, MANIFEST, PARENT_MANIFEST, IMAGE_CONFIG];

/// Returns true if `tag` is one of the conventional content types.
pub fn is_known(tag: &str) -> bool {
    KNOWN.contains(&tag)
}
