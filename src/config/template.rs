//! Name rendering.
//!
//! Archive names are produced from a handlebars template and a [`BuildContext`],
//! then passed through the archive group's [`Replacer`]. Release titles use the
//! same helpers with a [`ReleaseContext`].

use crate::error::{ConfigError, Result};
use handlebars::{Handlebars, handlebars_helper, no_escape};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Values available to archive name templates
#[derive(Debug, Clone, Serialize)]
pub struct BuildContext {
    /// Project name
    pub project: String,
    /// Release tag
    pub tag: String,
    /// Target operating system
    pub goos: String,
    /// Target architecture
    pub goarch: String,
}

/// Values available to release title templates
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseContext {
    /// Project name
    pub project: String,
    /// Release tag
    pub tag: String,
}

handlebars_helper!(trim_prefix: |prefix: str, value: str| {
    value.strip_prefix(prefix).unwrap_or(value).to_string()
});

handlebars_helper!(trim_suffix: |suffix: str, value: str| {
    value.strip_suffix(suffix).unwrap_or(value).to_string()
});

handlebars_helper!(upper: |value: str| value.to_uppercase());

handlebars_helper!(lower: |value: str| value.to_lowercase());

fn registry() -> &'static Handlebars<'static> {
    static REGISTRY: OnceLock<Handlebars<'static>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut hb = Handlebars::new();
        hb.set_strict_mode(true);
        hb.register_escape_fn(no_escape);
        hb.register_helper("trim_prefix", Box::new(trim_prefix));
        hb.register_helper("trim_suffix", Box::new(trim_suffix));
        hb.register_helper("upper", Box::new(upper));
        hb.register_helper("lower", Box::new(lower));
        hb
    })
}

impl BuildContext {
    /// Placeholder values used to check templates at load time
    pub fn sample() -> Self {
        Self {
            project: "project".to_string(),
            tag: "v0.0.0".to_string(),
            goos: "linux".to_string(),
            goarch: "amd64".to_string(),
        }
    }
}

impl ReleaseContext {
    /// Placeholder values used to check templates at load time
    pub fn sample() -> Self {
        Self {
            project: "project".to_string(),
            tag: "v0.0.0".to_string(),
        }
    }
}

/// Check that `template` parses and renders against `sample`.
///
/// Rendering runs in strict mode, so unknown variables are rejected here
/// rather than when the first archive is named.
pub fn validate_template<T: Serialize>(
    template: &str,
    sample: &T,
) -> std::result::Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidTemplate {
        template: template.to_string(),
        reason,
    };
    handlebars::Template::compile(template).map_err(|e| invalid(e.to_string()))?;
    registry()
        .render_template(template, sample)
        .map(|_| ())
        .map_err(|e| invalid(e.to_string()))
}

/// Render a name template (archive names, release titles)
pub fn render_name<T: Serialize>(template: &str, ctx: &T) -> Result<String> {
    Ok(registry().render_template(template, ctx)?)
}

/// Literal string replacement applied to rendered archive names.
///
/// Replacement happens in one left-to-right pass without re-scanning replaced
/// text. At each position the longest matching key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacer {
    pairs: Vec<(String, String)>,
}

impl Replacer {
    /// Build a replacer from a `from -> to` map; empty keys are ignored
    pub fn new(replacements: &BTreeMap<String, String>) -> Self {
        let mut pairs: Vec<(String, String)> = replacements
            .iter()
            .filter(|(from, _)| !from.is_empty())
            .map(|(from, to)| (from.clone(), to.clone()))
            .collect();
        pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { pairs }
    }

    /// Whether no replacements are configured
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Apply all replacements to `input`
    pub fn replace(&self, input: &str) -> String {
        if self.pairs.is_empty() {
            return input.to_string();
        }

        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        'scan: while let Some(ch) = rest.chars().next() {
            for (from, to) in &self.pairs {
                if let Some(tail) = rest.strip_prefix(from.as_str()) {
                    out.push_str(to);
                    rest = tail;
                    continue 'scan;
                }
            }
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }

        out
    }
}
