//! Mapping file loading
//!
//! Reads the TOML mapping file and compiles it into a taxonomy snapshot.
//! At startup a missing or broken file degrades to the built-in default
//! mappings with a warning, so the service always comes up serving a
//! valid taxonomy. An explicit reload is stricter: failures propagate to
//! the caller and the previous snapshot keeps serving.

use crate::error::Result;
use std::path::Path;
use titlecat_core::{Taxonomy, TaxonomySpec};
use tracing::{info, warn};

/// Load and validate a mapping file
pub fn load_taxonomy_file(path: &Path) -> Result<Taxonomy> {
    let text = std::fs::read_to_string(path)?;
    let spec: TaxonomySpec = toml::from_str(&text)?;
    Ok(Taxonomy::from_spec(spec)?)
}

/// Load the mapping file, falling back to built-in defaults
pub fn load_or_default(path: Option<&Path>) -> Taxonomy {
    let Some(path) = path else {
        info!("no mapping file configured, using built-in default mappings");
        return Taxonomy::default_mappings();
    };
    match load_taxonomy_file(path) {
        Ok(taxonomy) => {
            info!(
                path = %path.display(),
                version = %taxonomy.version(),
                "mapping file loaded"
            );
            taxonomy
        }
        Err(error) => {
            warn!(
                path = %path.display(),
                %error,
                "failed to load mapping file, using built-in default mappings"
            );
            Taxonomy::default_mappings()
        }
    }
}
