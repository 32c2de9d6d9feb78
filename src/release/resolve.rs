//! Asset lookup within a release descriptor
//!
//! Both lookups scan components and their assets in descriptor order and
//! return the first match. The descriptor schema says nothing about duplicate
//! asset names, so a later duplicate is never seen.

use super::{Asset, AssetType, ReleaseDescriptor};
use crate::error::{Result, release};

/// Resolve the image URI for `name` (asset `"{name}-image"` of type `Image`)
pub fn resolve_image<'a>(descriptor: &'a ReleaseDescriptor, name: &str) -> Result<&'a str> {
    let asset_name = format!("{name}-image");
    let asset = find_asset(descriptor, &asset_name, &AssetType::Image)
        .ok_or_else(|| release::not_found("image", name))?;

    asset
        .image
        .as_ref()
        .map(|locator| locator.uri.as_str())
        .ok_or_else(|| {
            release::parse_failed(
                "release descriptor",
                format!("image asset '{asset_name}' has no image.uri"),
            )
        })
}

/// Resolve the download URI for the archive asset named `file_name`
pub fn resolve_archive<'a>(descriptor: &'a ReleaseDescriptor, file_name: &str) -> Result<&'a str> {
    let asset = find_asset(descriptor, file_name, &AssetType::Archive)
        .ok_or_else(|| release::not_found("archive", file_name))?;

    asset
        .archive
        .as_ref()
        .map(|locator| locator.uri.as_str())
        .ok_or_else(|| {
            release::parse_failed(
                "release descriptor",
                format!("archive asset '{file_name}' has no archive.uri"),
            )
        })
}

fn find_asset<'a>(
    descriptor: &'a ReleaseDescriptor,
    name: &str,
    asset_type: &AssetType,
) -> Option<&'a Asset> {
    descriptor
        .assets()
        .find(|asset| asset.name == name && &asset.asset_type == asset_type)
}
