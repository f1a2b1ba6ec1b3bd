//! Command implementations

pub mod check;
pub mod completions;
pub mod links;
pub mod plan;
pub mod tree;

use anyhow::Result;

use crate::cli::GlobalOpts;
use berth::core::{LoadOptions, Workspace, MANIFEST_NAME};
use berth::util::diagnostic::suggestions;
use berth::util::GlobalContext;

/// Set up the context and load the manifest tree the options point at.
pub fn load_workspace(opts: &GlobalOpts) -> Result<(GlobalContext, Workspace)> {
    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(opts.verbose);
    if opts.no_color {
        ctx.set_color(false);
    }

    let manifest_path = match &opts.manifest_path {
        Some(path) if path.is_dir() => path.join(MANIFEST_NAME),
        Some(path) => path.clone(),
        None => ctx
            .find_manifest()
            .map_err(|e| anyhow::anyhow!("{}\n{}", e, suggestions::NO_MANIFEST))?,
    };

    let options = LoadOptions::new(ctx.platform(opts.platform))
        .with_platform_libs(ctx.config().platform_libs());
    let ws = Workspace::load(&manifest_path, options)?;

    Ok((ctx, ws))
}
