//! Conditional-visibility evaluation over named context trees
//!
//! Visibility predicates are dotted paths whose first segment picks a named
//! context (the host platform object, the current user, the world, the module
//! manifest, the module constants, or the module's own configuration) through
//! a configurable mapping table. The remaining path is walked key by key and
//! the leaf is coerced to a boolean the way the host's scripting runtime
//! would coerce it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Named context trees a predicate path can resolve against
#[derive(Debug, Clone, Default)]
pub struct ContextSet {
    /// Host platform global object
    pub platform: Value,
    /// Current user object
    pub user: Value,
    /// Current world object
    pub world: Value,
    /// Module manifest
    pub manifest: Value,
    /// Module constants tree
    pub constants: Value,
    /// The module's own configuration
    pub module_config: Value,
}

impl ContextSet {
    fn tree(&self, target: ContextTarget) -> &Value {
        match target {
            ContextTarget::Platform => &self.platform,
            ContextTarget::User => &self.user,
            ContextTarget::World => &self.world,
            ContextTarget::Manifest => &self.manifest,
            ContextTarget::Constants => &self.constants,
            ContextTarget::ModuleConfig => &self.module_config,
        }
    }
}

/// Which context tree a path prefix selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextTarget {
    Platform,
    User,
    World,
    Manifest,
    Constants,
    ModuleConfig,
}

/// How the matched path is rewritten before walking the context tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathRewrite {
    /// Drop the prefix segment and walk the remainder
    StripPrefix,
    /// Walk the full path, prefix included
    KeepFull,
}

/// One prefix entry of the mapping table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRule {
    pub target: ContextTarget,
    pub rewrite: PathRewrite,
}

/// Prefix -> context rule table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextMapping {
    rules: HashMap<String, ContextRule>,
}

impl ContextMapping {
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Backward-compatible default prefixes
    pub fn standard() -> Self {
        let mut mapping = Self::empty();
        mapping.insert("game", ContextTarget::Platform, PathRewrite::StripPrefix);
        mapping.insert("user", ContextTarget::User, PathRewrite::StripPrefix);
        mapping.insert("world", ContextTarget::World, PathRewrite::StripPrefix);
        mapping.insert("manifest", ContextTarget::Manifest, PathRewrite::StripPrefix);
        mapping.insert("constants", ContextTarget::Constants, PathRewrite::StripPrefix);
        mapping.insert("setting", ContextTarget::ModuleConfig, PathRewrite::StripPrefix);
        mapping
    }

    pub fn insert(&mut self, prefix: impl Into<String>, target: ContextTarget, rewrite: PathRewrite) {
        self.rules.insert(prefix.into(), ContextRule { target, rewrite });
    }

    fn rule(&self, prefix: &str) -> Option<&ContextRule> {
        self.rules.get(prefix)
    }
}

impl Default for ContextMapping {
    fn default() -> Self {
        Self::standard()
    }
}

/// Boolean coercion matching the host scripting runtime
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn evaluate_path(path: &str, contexts: &ContextSet, mapping: &ContextMapping) -> bool {
    let mut segments = path.split('.');
    let prefix = match segments.next() {
        Some(p) if !p.is_empty() => p,
        _ => return false,
    };
    let rule = match mapping.rule(prefix) {
        Some(rule) => rule,
        None => {
            tracing::debug!(prefix, path, "visibility path uses an unmapped context prefix");
            return false;
        }
    };

    let mut current = contexts.tree(rule.target);
    let walked: Vec<&str> = match rule.rewrite {
        PathRewrite::StripPrefix => segments.collect(),
        PathRewrite::KeepFull => path.split('.').collect(),
    };
    for segment in walked {
        current = match current.get(segment) {
            Some(next) => next,
            None => return false,
        };
    }
    truthy(current)
}

fn group_paths(value: &Value, contexts: &ContextSet, mapping: &ContextMapping) -> Vec<bool> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(path) => evaluate_path(path, contexts, mapping),
                _ => false,
            })
            .collect(),
        _ => vec![false],
    }
}

/// Evaluate a visibility predicate expression
///
/// - absent / null expression is true (no condition);
/// - a string is a dotted path resolved through the mapping table;
/// - `{or: [paths]}` is true iff any path is true;
/// - `{and: [paths]}` is true iff all paths are true;
/// - with BOTH groups present, the result is the logical AND of the two
///   group results (both must pass) - this mirrors the authored behavior
///   and is not ordinary or/and precedence;
/// - any other shape is false.
pub fn evaluate(expr: Option<&Value>, contexts: &ContextSet, mapping: &ContextMapping) -> bool {
    let expr = match expr {
        None => return true,
        Some(Value::Null) => return true,
        Some(e) => e,
    };

    match expr {
        Value::String(path) => evaluate_path(path, contexts, mapping),
        Value::Object(obj) => {
            let or_group = obj
                .get("or")
                .map(|v| group_paths(v, contexts, mapping).iter().any(|b| *b));
            let and_group = obj
                .get("and")
                .map(|v| group_paths(v, contexts, mapping).iter().all(|b| *b));
            match (or_group, and_group) {
                (Some(or), Some(and)) => or && and,
                (Some(or), None) => or,
                (None, Some(and)) => and,
                (None, None) => false,
            }
        }
        _ => false,
    }
}

/// Decide whether a setting should be exposed
///
/// Hidden when `show_only_if` is present and false, or when `dont_show_if`
/// is present and true.
pub fn should_show(
    show_only_if: Option<&Value>,
    dont_show_if: Option<&Value>,
    contexts: &ContextSet,
    mapping: &ContextMapping,
) -> bool {
    if show_only_if.is_some() && !evaluate(show_only_if, contexts, mapping) {
        return false;
    }
    if dont_show_if.is_some() && evaluate(dont_show_if, contexts, mapping) {
        return false;
    }
    true
}
