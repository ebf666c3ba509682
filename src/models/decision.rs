use std::collections::BTreeMap;

/// Restaurant name to like (`true`) or dislike (`false`).
pub type DecisionObject = BTreeMap<String, bool>;
