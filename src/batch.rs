//! Parallel icon processing.
//!
//! Icons share no mutable state, so loading and measuring fan out over the
//! rayon pool with no coordination. Paths are supplied by the caller; this
//! module does not walk directories.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::Path;

use crate::bounds::{BoundsResolver, Dimension};
use crate::icon::Icon;

/// Load every path in parallel. Results keep input order.
pub fn load_all<P>(paths: &[P]) -> Vec<Result<Icon>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            Icon::load(path).with_context(|| format!("loading icon {}", path.display()))
        })
        .collect()
}

/// Load every path, logging and skipping the ones that fail.
pub fn load_valid<P>(paths: &[P]) -> Vec<Icon>
where
    P: AsRef<Path> + Sync,
{
    load_all(paths)
        .into_iter()
        .filter_map(|result| match result {
            Ok(icon) => Some(icon),
            Err(err) => {
                crate::log!("error"; "{:#}", err);
                None
            }
        })
        .collect()
}

/// Resolve and scale every icon in parallel. Results keep input order.
pub fn measure_all(icons: &[Icon], resolver: &BoundsResolver, max_size: u32) -> Vec<Dimension> {
    icons
        .par_iter()
        .map(|icon| icon.dimension_with(resolver, max_size))
        .collect()
}
