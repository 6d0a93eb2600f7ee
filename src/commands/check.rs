use anyhow::{Context, Result};

use crate::assembly::is_sem_ver_compatible;

/// Check whether `actual` satisfies `minimum` and print the verdict.
pub fn check(minimum: &str, actual: &str) -> Result<bool> {
    let compatible = is_sem_ver_compatible(minimum, actual)
        .with_context(|| format!("Cannot compare '{}' with '{}'", minimum, actual))?;

    if compatible {
        println!("compatible: {} satisfies {}", actual, minimum);
    } else {
        println!("incompatible: {} does not satisfy {}", actual, minimum);
    }
    Ok(compatible)
}
