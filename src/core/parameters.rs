//! Per-channel parameters with optional overrides
//!
//! A [`ChannelParameterSet`] stores only the values a configuration source
//! actually set. Resolution walks the override chain (channel, then global
//! defaults, then the hard-coded system defaults) and always yields a fully
//! populated [`ResolvedParameters`].

use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};

/// Output template used when no level of the chain sets one
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "[{Timestamp:%H:%M:%S} {Level:u3}] {Message:lj}";

/// Appended when the event carries a logged type or member name
pub const TYPE_CONTEXT_FRAGMENT: &str = "{SourceContext}{MemberName}";

/// Appended when source path information is requested
pub const SOURCE_PATH_FRAGMENT: &str = "{SourceCodeInformation}";

/// Line terminator token understood by the output renderer
pub const NEW_LINE_TOKEN: &str = "{NewLine}";

/// Settings shared by every channel kind; each field is independently unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelParameterSet {
    #[serde(rename = "MinimumLevel", alias = "minimumLevel", skip_serializing_if = "Option::is_none")]
    pub minimum_level: Option<LogLevel>,

    #[serde(rename = "OutputTemplate", alias = "outputTemplate", skip_serializing_if = "Option::is_none")]
    pub output_template: Option<String>,

    #[serde(rename = "IncludeSourcePath", alias = "includeSourcePath", skip_serializing_if = "Option::is_none")]
    pub include_source_path: Option<bool>,

    #[serde(rename = "SourceRootPath", alias = "sourceRootPath", skip_serializing_if = "Option::is_none")]
    pub source_root_path: Option<String>,

    #[serde(rename = "MultiLineEvents", alias = "multiLineEvents", skip_serializing_if = "Option::is_none")]
    pub multi_line_events: Option<bool>,

    #[serde(rename = "RequireNewLine", alias = "requireNewLine", skip_serializing_if = "Option::is_none")]
    pub require_new_line: Option<bool>,
}

/// Names one field of a [`ChannelParameterSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterField {
    MinimumLevel,
    OutputTemplate,
    IncludeSourcePath,
    SourceRootPath,
    MultiLineEvents,
    RequireNewLine,
}

/// A single field assignment for [`ChannelParameterSet::with_override`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterOverride {
    MinimumLevel(LogLevel),
    OutputTemplate(String),
    IncludeSourcePath(bool),
    SourceRootPath(String),
    MultiLineEvents(bool),
    RequireNewLine(bool),
}

impl ParameterOverride {
    pub fn field(&self) -> ParameterField {
        match self {
            ParameterOverride::MinimumLevel(_) => ParameterField::MinimumLevel,
            ParameterOverride::OutputTemplate(_) => ParameterField::OutputTemplate,
            ParameterOverride::IncludeSourcePath(_) => ParameterField::IncludeSourcePath,
            ParameterOverride::SourceRootPath(_) => ParameterField::SourceRootPath,
            ParameterOverride::MultiLineEvents(_) => ParameterField::MultiLineEvents,
            ParameterOverride::RequireNewLine(_) => ParameterField::RequireNewLine,
        }
    }
}

impl ChannelParameterSet {
    /// Create a parameter set with every field unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with exactly one field overridden
    #[must_use = "with_override returns a new parameter set"]
    pub fn with_override(&self, value: ParameterOverride) -> Self {
        let mut updated = self.clone();
        match value {
            ParameterOverride::MinimumLevel(level) => updated.minimum_level = Some(level),
            ParameterOverride::OutputTemplate(template) => updated.output_template = Some(template),
            ParameterOverride::IncludeSourcePath(flag) => updated.include_source_path = Some(flag),
            ParameterOverride::SourceRootPath(path) => updated.source_root_path = Some(path),
            ParameterOverride::MultiLineEvents(flag) => updated.multi_line_events = Some(flag),
            ParameterOverride::RequireNewLine(flag) => updated.require_new_line = Some(flag),
        }
        updated
    }

    /// Return a copy with one field unset again, so it falls back to the parent
    #[must_use = "without returns a new parameter set"]
    pub fn without(&self, field: ParameterField) -> Self {
        let mut updated = self.clone();
        match field {
            ParameterField::MinimumLevel => updated.minimum_level = None,
            ParameterField::OutputTemplate => updated.output_template = None,
            ParameterField::IncludeSourcePath => updated.include_source_path = None,
            ParameterField::SourceRootPath => updated.source_root_path = None,
            ParameterField::MultiLineEvents => updated.multi_line_events = None,
            ParameterField::RequireNewLine => updated.require_new_line = None,
        }
        updated
    }

    /// Whether the given field carries an override
    pub fn is_set(&self, field: ParameterField) -> bool {
        match field {
            ParameterField::MinimumLevel => self.minimum_level.is_some(),
            ParameterField::OutputTemplate => self.output_template.is_some(),
            ParameterField::IncludeSourcePath => self.include_source_path.is_some(),
            ParameterField::SourceRootPath => self.source_root_path.is_some(),
            ParameterField::MultiLineEvents => self.multi_line_events.is_some(),
            ParameterField::RequireNewLine => self.require_new_line.is_some(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Resolve every field against an already resolved parent
    pub fn resolve(&self, parent: &ResolvedParameters) -> ResolvedParameters {
        ResolvedParameters {
            minimum_level: self.minimum_level.unwrap_or(parent.minimum_level),
            output_template: self
                .output_template
                .clone()
                .unwrap_or_else(|| parent.output_template.clone()),
            include_source_path: self.include_source_path.unwrap_or(parent.include_source_path),
            source_root_path: self
                .source_root_path
                .clone()
                .or_else(|| parent.source_root_path.clone()),
            multi_line_events: self.multi_line_events.unwrap_or(parent.multi_line_events),
            require_new_line: self.require_new_line.unwrap_or(parent.require_new_line),
        }
    }

    /// Resolve an override chain ordered innermost first, ending at the system defaults
    pub fn resolve_chain(chain: &[&ChannelParameterSet]) -> ResolvedParameters {
        chain
            .iter()
            .rev()
            .fold(ResolvedParameters::default(), |parent, set| set.resolve(&parent))
    }

    /// Layer this set over `base` without resolving; fields set here win
    #[must_use = "merged_over returns a new parameter set"]
    pub fn merged_over(&self, base: &ChannelParameterSet) -> ChannelParameterSet {
        ChannelParameterSet {
            minimum_level: self.minimum_level.or(base.minimum_level),
            output_template: self
                .output_template
                .clone()
                .or_else(|| base.output_template.clone()),
            include_source_path: self.include_source_path.or(base.include_source_path),
            source_root_path: self
                .source_root_path
                .clone()
                .or_else(|| base.source_root_path.clone()),
            multi_line_events: self.multi_line_events.or(base.multi_line_events),
            require_new_line: self.require_new_line.or(base.require_new_line),
        }
    }
}

/// A parameter set with every field concretely determined
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedParameters {
    pub minimum_level: LogLevel,
    pub output_template: String,
    pub include_source_path: bool,
    pub source_root_path: Option<String>,
    pub multi_line_events: bool,
    pub require_new_line: bool,
}

impl Default for ResolvedParameters {
    fn default() -> Self {
        Self {
            minimum_level: LogLevel::Verbose,
            output_template: DEFAULT_OUTPUT_TEMPLATE.to_string(),
            include_source_path: false,
            source_root_path: None,
            multi_line_events: false,
            require_new_line: false,
        }
    }
}

impl ResolvedParameters {
    /// Output template with enrichment fragments appended
    ///
    /// Fragment order is fixed: base template, type context, source path,
    /// trailing new line. Multi-line events put each enrichment fragment on
    /// its own line; otherwise fragments are separated by a space.
    pub fn enriched_template(&self, include_type_context: bool) -> String {
        let separator = if self.multi_line_events { NEW_LINE_TOKEN } else { " " };
        let mut template = self.output_template.clone();

        if include_type_context {
            template.push_str(separator);
            template.push_str(TYPE_CONTEXT_FRAGMENT);
        }
        if self.include_source_path {
            template.push_str(separator);
            template.push_str(SOURCE_PATH_FRAGMENT);
        }
        if self.require_new_line {
            template.push_str(NEW_LINE_TOKEN);
        }

        template
    }
}
