//! Dotted expression to access chain translation.
//!
//! Turns `Items[0].Name` into the chain an accessor translator would
//! produce: indexed members become steps declared on their collection type,
//! plain members become steps declared on the current type.

use anyhow::{bail, Result};
use fieldrules_core::model::ModelCatalog;
use fieldrules_core::path::AccessChain;

/// Translate `expression` rooted at `root_type`.
///
/// Translation stops after the first member the catalog does not know; that
/// step is still emitted so path resolution reports the miss.
pub fn translate(catalog: &ModelCatalog, root_type: &str, expression: &str) -> Result<AccessChain> {
    let mut chain = AccessChain::new();
    let mut current = root_type.to_string();

    for part in expression.split('.') {
        let (name, indexed) = split_index(part)?;

        let Some(prop) = catalog.property(&current, name) else {
            tracing::debug!(type_name = %current, member = name, "Unknown member in expression");
            chain = chain.property(&current, name);
            break;
        };

        match (catalog.element_type(&prop.value_type), indexed) {
            (Some(element), true) => {
                chain = chain.element(name, &prop.value_type);
                current = element.to_string();
            }
            (None, true) => bail!("'{name}' on {current} is not a collection and cannot be indexed"),
            (_, false) => {
                chain = chain.property(&current, name);
                current = prop.value_type.clone();
            }
        }
    }

    Ok(chain)
}

/// Split `Items[0]` into `("Items", true)`. The brackets may hold only a
/// numeric index or nothing.
fn split_index(part: &str) -> Result<(&str, bool)> {
    let Some(open) = part.find('[') else {
        if part.is_empty() || part.contains(']') {
            bail!("malformed member '{part}'");
        }
        return Ok((part, false));
    };
    let index = part[open + 1..].strip_suffix(']');
    match index {
        Some(index) if open > 0 && index.chars().all(|c| c.is_ascii_digit()) => {
            Ok((&part[..open], true))
        }
        _ => bail!("malformed indexed member '{part}'"),
    }
}
