//! Capability template expansion.
//!
//! A capability template is a dot-separated sequence of segments. Each segment
//! is either literal text, the `$profile` marker (dropped, it contributes no
//! component), or `$name`, substituted from a value context. Substitution of a
//! list value yields one candidate per element, and the expanded capabilities
//! are the cartesian product of the per-segment candidates joined with `.`:
//!
//! ```rust
//! use featurescript::capability::{CapabilityTemplate, ValueContext};
//! use featurescript::models::ConfigValue;
//!
//! let mut context = ValueContext::new();
//! context.insert("name".to_string(), ConfigValue::list(["a", "b"]));
//!
//! let template = CapabilityTemplate::parse("$profile.org.cap.$name").unwrap();
//! let caps = template.expand(&context).unwrap();
//! assert_eq!(caps.into_iter().collect::<Vec<_>>(), vec!["org.cap.a", "org.cap.b"]);
//! ```
//!
//! A template whose parameter is missing from the context expands to `None`:
//! the capability is not applicable to that feature. This is not an error.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::models::ConfigValue;

/// Template segment dropped during expansion.
pub const PROFILE_SEGMENT: &str = "$profile";

/// Values available for substitution, keyed by parameter name.
pub type ValueContext = BTreeMap<String, ConfigValue>;

/// One non-dropped segment of a capability template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSegment {
    /// Literal text, always exactly one candidate
    Literal(String),
    /// Parameter substituted from the value context
    Param(String),
}

impl TemplateSegment {
    /// Candidate values for this segment, `None` when the parameter is missing.
    fn candidates(&self, context: &ValueContext) -> Option<Vec<String>> {
        match self {
            Self::Literal(text) => Some(vec![text.clone()]),
            Self::Param(name) => match context.get(name)? {
                ConfigValue::Scalar(value) => Some(vec![value.clone()]),
                ConfigValue::List(items) => Some(items.clone()),
                ConfigValue::Mapping(_) | ConfigValue::Absent => None,
            },
        }
    }
}

/// A parsed capability template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityTemplate {
    raw: String,
    segments: Vec<TemplateSegment>,
}

impl CapabilityTemplate {
    /// Parse a dotted template.
    ///
    /// Returns a description of the problem for empty segments, a bare `$`,
    /// or a template made only of `$profile` markers.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut segments = Vec::new();
        for segment in raw.split('.') {
            if segment.is_empty() {
                return Err(format!("capability template '{raw}' has an empty segment"));
            }
            if segment == PROFILE_SEGMENT {
                continue;
            }
            match segment.strip_prefix('$') {
                Some("") => {
                    return Err(format!("capability template '{raw}' has a bare '$' segment"));
                }
                Some(name) => segments.push(TemplateSegment::Param(name.to_string())),
                None => segments.push(TemplateSegment::Literal(segment.to_string())),
            }
        }
        if segments.is_empty() {
            return Err(format!("capability template '{raw}' has no segments"));
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The template text as declared.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Segments remaining after dropping `$profile`.
    pub fn segments(&self) -> &[TemplateSegment] {
        &self.segments
    }

    /// Expand against `context`.
    pub fn expand(&self, context: &ValueContext) -> Option<BTreeSet<String>> {
        let candidates =
            self.segments.iter().map(|s| s.candidates(context)).collect::<Option<Vec<_>>>()?;
        Some(cartesian_product(&candidates).into_iter().map(|parts| parts.join(".")).collect())
    }
}

impl fmt::Display for CapabilityTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Expand a raw template, treating unparsable templates as not applicable.
pub fn expand(template: &str, context: &ValueContext) -> Option<BTreeSet<String>> {
    CapabilityTemplate::parse(template).ok()?.expand(context)
}

/// All combinations picking one item from each set, in set order.
///
/// An empty input yields a single empty combination; any empty set yields none.
pub fn cartesian_product<T: Clone>(sets: &[Vec<T>]) -> Vec<Vec<T>> {
    sets.iter().fold(vec![Vec::new()], |acc, set| {
        acc.iter()
            .flat_map(|prefix| {
                set.iter().map(move |item| {
                    let mut combination = prefix.clone();
                    combination.push(item.clone());
                    combination
                })
            })
            .collect()
    })
}
