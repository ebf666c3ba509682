//! JSON-Patch diff and apply over decision maps.

use serde_json::Value;

use crate::error::{ChooseeError, Result};
use crate::models::decision::DecisionObject;
use crate::models::patch::PatchOperation;

/// JSON pointer for a top-level key.
pub fn pointer(key: &str) -> String {
    format!("/{}", key.replace('~', "~0").replace('/', "~1"))
}

fn unescape(path: &str) -> Result<String> {
    let token = path
        .strip_prefix('/')
        .ok_or_else(|| ChooseeError::InvalidPatch(format!("path {:?} is not a pointer", path)))?;
    if token.contains('/') {
        return Err(ChooseeError::InvalidPatch(format!(
            "path {:?} is nested",
            path
        )));
    }
    Ok(token.replace("~1", "/").replace("~0", "~"))
}

/// Operations turning `from` into `to`: removals first, then additions and
/// replacements, each in key order.
pub fn diff(from: &DecisionObject, to: &DecisionObject) -> Vec<PatchOperation> {
    let removals = from
        .keys()
        .filter(|key| !to.contains_key(*key))
        .map(|key| PatchOperation::Remove { path: pointer(key) });

    let changes = to.iter().filter_map(|(key, value)| match from.get(key) {
        None => Some(PatchOperation::Add {
            path: pointer(key),
            value: Value::Bool(*value),
        }),
        Some(previous) if previous != value => Some(PatchOperation::Replace {
            path: pointer(key),
            value: Value::Bool(*value),
        }),
        Some(_) => None,
    });

    removals.chain(changes).collect()
}

pub fn apply_patch(doc: &DecisionObject, operations: &[PatchOperation]) -> Result<DecisionObject> {
    let mut patched = doc.clone();
    for operation in operations {
        let key = unescape(operation.path())?;
        match operation {
            PatchOperation::Add { value, .. } => {
                patched.insert(key, as_decision(value)?);
            }
            PatchOperation::Replace { value, .. } => {
                let slot = patched.get_mut(&key).ok_or_else(|| {
                    ChooseeError::InvalidPatch(format!("cannot replace missing {:?}", key))
                })?;
                *slot = as_decision(value)?;
            }
            PatchOperation::Remove { .. } => {
                patched.remove(&key).ok_or_else(|| {
                    ChooseeError::InvalidPatch(format!("cannot remove missing {:?}", key))
                })?;
            }
        }
    }
    Ok(patched)
}

fn as_decision(value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| ChooseeError::InvalidPatch(format!("{} is not a decision", value)))
}
