//! Inlines `#include`'d shader files into one merged file, and splits a merged
//! file back into the files it was made of.
//!
//! Inlined files are wrapped between marker lines:
//!
//! ```text
//! /// BEGIN math.glsl
//! float pi = 3.14;
//! /// END math.glsl
//! ```
//!
//! A file included a second time is not inlined again, its directive is
//! commented out as `/// #include "math.glsl"` instead.

use anyhow::Result;
use log::info;

mod check;
mod collapse;
mod config;
mod expand;
mod markers;
mod store;

pub use check::CheckStatus;
pub use collapse::{collapse, Collapse};
pub use config::{Config, DEFAULT_MERGED, DEFAULT_ROOT};
pub use expand::{expand, Expansion};
pub use store::{check_name, DirStore, MemoryStore, SourceStore};

/// Expands `config.root` into `config.merged`, inside `config.dir`.
/// ```rust,no_run
/// use shader_cat::Config;
///
/// let expansion = shader_cat::cat(&Config::new("shaders")).unwrap();
/// println!("Inlined {} files", expansion.included.len());
/// ```
pub fn cat(config: &Config) -> Result<Expansion> {
    cat_with_store(&mut config.store(), config)
}

pub fn cat_with_store<S: SourceStore + ?Sized>(
    store: &mut S,
    config: &Config,
) -> Result<Expansion> {
    config.validate()?;

    let expansion = expand(store, &config.root)?;
    store.write_lines(&config.merged, &expansion.lines)?;

    info!(
        "Merged {root} and {count} included files into {merged}",
        root = config.root,
        count = expansion.included.len(),
        merged = config.merged
    );

    Ok(expansion)
}

/// Splits `config.merged` back into `config.root` and every file it included.
pub fn uncat(config: &Config) -> Result<Collapse> {
    uncat_with_store(&mut config.store(), config)
}

pub fn uncat_with_store<S: SourceStore + ?Sized>(
    store: &mut S,
    config: &Config,
) -> Result<Collapse> {
    config.validate()?;

    let lines = store.read_lines(&config.merged)?;
    let collapse = collapse(lines, &config.root)?;

    for (name, lines) in &collapse.files {
        store.write_lines(name, lines)?;
    }

    info!(
        "Split {merged} into {count} files",
        merged = config.merged,
        count = collapse.files.len()
    );

    Ok(collapse)
}

/// Tells whether `config.merged` matches what `cat` would write right now.
pub fn check(config: &Config) -> Result<CheckStatus> {
    check_with_store(&config.store(), config)
}

pub fn check_with_store<S: SourceStore + ?Sized>(
    store: &S,
    config: &Config,
) -> Result<CheckStatus> {
    config.validate()?;

    check::check(store, &config.root, &config.merged)
}
