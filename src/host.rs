//! Batch adapter: one component per input item, with per-item error envelopes.

use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{DEFAULT_COMPONENT_NAME, SvgrError, TransformOptions, transform};

/// One SVG to convert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemInput {
    pub svg_code: String,
    /// Overrides `options.componentName` when set and not blank.
    pub component_name: Option<String>,
    pub options: TransformOptions,
}

/// The result for one item, paired with its input position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResult {
    pub json: ItemOutput,
    pub paired_item: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItemOutput {
    #[serde(rename_all = "camelCase")]
    Generated {
        react_code: String,
        svg_code: String,
        component_name: String,
        options: TransformOptions,
    },
    Failed {
        error: String,
    },
}

/// Convert every item in order. Without `continue_on_fail` the first failure
/// aborts the run; with it, failures become [`ItemOutput::Failed`] entries.
pub fn run_items(
    items: &[ItemInput],
    continue_on_fail: bool,
) -> Result<Vec<ItemResult>, SvgrError> {
    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let json = match run_item(index, item) {
            Ok(json) => json,
            Err(err) if continue_on_fail => {
                warn!(item = index, error = %err, "item failed, continuing");
                ItemOutput::Failed {
                    error: err.to_string(),
                }
            }
            Err(err) => return Err(err),
        };
        results.push(ItemResult {
            json,
            paired_item: index,
        });
    }
    Ok(results)
}

fn run_item(index: usize, item: &ItemInput) -> Result<ItemOutput, SvgrError> {
    if item.svg_code.trim().is_empty() {
        return Err(SvgrError::EmptyInput { item_index: index });
    }
    let options = resolve_options(item);
    debug!(item = index, component = %options.component_name, "generating component");

    let react_code = panic::catch_unwind(AssertUnwindSafe(|| transform(&item.svg_code, &options)))
        .map_err(|payload| SvgrError::Item {
            item_index: index,
            message: panic_message(payload.as_ref()),
        })?;

    Ok(ItemOutput::Generated {
        react_code,
        svg_code: item.svg_code.clone(),
        component_name: options.component_name.clone(),
        options,
    })
}

/// The options an item actually runs with: its component name applied and
/// blank replacement and prop entries dropped.
pub fn resolve_options(item: &ItemInput) -> TransformOptions {
    let mut options = item.options.clone();
    if let Some(name) = item.component_name.as_deref().map(str::trim)
        && !name.is_empty()
    {
        options.component_name = name.to_string();
    }
    if options.component_name.trim().is_empty() {
        options.component_name = DEFAULT_COMPONENT_NAME.to_string();
    }
    options
        .replace_attr_values
        .retain(|r| !r.from.trim().is_empty() && !r.to.trim().is_empty());
    options
        .svg_props
        .retain(|p| !p.name.trim().is_empty() && !p.value.trim().is_empty());
    options
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "code generation panicked".to_string()
    }
}
