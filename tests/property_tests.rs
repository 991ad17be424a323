//! Property-based tests for rust_channel_logger using proptest

use proptest::prelude::*;
use rust_channel_logger::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Verbose),
        Just(LogLevel::Debug),
        Just(LogLevel::Information),
        Just(LogLevel::Warning),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

/// A parameter set with each field independently set or unset
fn any_parameter_set() -> impl Strategy<Value = ChannelParameterSet> {
    (
        proptest::option::of(any_level()),
        proptest::option::of("[a-z{} ]{0,12}"),
        proptest::option::of(any::<bool>()),
        proptest::option::of("/[a-z]{1,6}"),
        proptest::option::of(any::<bool>()),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(level, template, source, root, multi, newline)| {
            let mut set = ChannelParameterSet::new();
            if let Some(level) = level {
                set = set.with_override(ParameterOverride::MinimumLevel(level));
            }
            if let Some(template) = template {
                set = set.with_override(ParameterOverride::OutputTemplate(template));
            }
            if let Some(source) = source {
                set = set.with_override(ParameterOverride::IncludeSourcePath(source));
            }
            if let Some(root) = root {
                set = set.with_override(ParameterOverride::SourceRootPath(root));
            }
            if let Some(multi) = multi {
                set = set.with_override(ParameterOverride::MultiLineEvents(multi));
            }
            if let Some(newline) = newline {
                set = set.with_override(ParameterOverride::RequireNewLine(newline));
            }
            set
        })
}

// ============================================================================
// Override resolution
// ============================================================================

proptest! {
    /// A set field wins over the parent, an unset field takes the parent's value
    #[test]
    fn test_child_fields_override_parent(child in any_parameter_set(), parent in any_parameter_set()) {
        let parent_resolved = parent.resolve(&ResolvedParameters::default());
        let resolved = child.resolve(&parent_resolved);

        prop_assert_eq!(
            resolved.minimum_level,
            child.minimum_level.unwrap_or(parent_resolved.minimum_level)
        );
        prop_assert_eq!(
            &resolved.output_template,
            child.output_template.as_ref().unwrap_or(&parent_resolved.output_template)
        );
        prop_assert_eq!(
            resolved.include_source_path,
            child.include_source_path.unwrap_or(parent_resolved.include_source_path)
        );
        prop_assert_eq!(
            resolved.source_root_path,
            child.source_root_path.clone().or(parent_resolved.source_root_path.clone())
        );
        prop_assert_eq!(
            resolved.multi_line_events,
            child.multi_line_events.unwrap_or(parent_resolved.multi_line_events)
        );
        prop_assert_eq!(
            resolved.require_new_line,
            child.require_new_line.unwrap_or(parent_resolved.require_new_line)
        );
    }

    /// Resolving through a chain equals resolving step by step
    #[test]
    fn test_chain_matches_stepwise_resolution(
        channel in any_parameter_set(),
        global in any_parameter_set(),
    ) {
        let stepwise = channel.resolve(&global.resolve(&ResolvedParameters::default()));
        let chained = ChannelParameterSet::resolve_chain(&[&channel, &global]);
        prop_assert_eq!(stepwise, chained);
    }

    /// Overriding one field leaves every other field untouched
    #[test]
    fn test_with_override_changes_one_field(base in any_parameter_set(), level in any_level()) {
        let updated = base.with_override(ParameterOverride::MinimumLevel(level));

        prop_assert_eq!(updated.minimum_level, Some(level));
        prop_assert_eq!(&updated.output_template, &base.output_template);
        prop_assert_eq!(updated.include_source_path, base.include_source_path);
        prop_assert_eq!(&updated.source_root_path, &base.source_root_path);
        prop_assert_eq!(updated.multi_line_events, base.multi_line_events);
        prop_assert_eq!(updated.require_new_line, base.require_new_line);
    }

    /// Effective minimum level is the lowest channel level
    #[test]
    fn test_effective_minimum_level_is_lowest(levels in proptest::collection::vec(any_level(), 0..8)) {
        let configuration = LoggerConfiguration::default();
        for level in &levels {
            let settings = ChannelKind::Debug.default_settings().with_parameters(
                ChannelParameterSet::new().with_override(ParameterOverride::MinimumLevel(*level)),
            );
            configuration.add_channel(ChannelConfig::new("Debug", settings, true));
        }

        let expected = levels.iter().copied().min().unwrap_or(LogLevel::Verbose);
        prop_assert_eq!(configuration.effective_minimum_level(), expected);
    }
}

// ============================================================================
// Buffering and replay
// ============================================================================

proptest! {
    /// The SMS flag marks exactly the entries appended right after a request
    #[test]
    fn test_sms_flag_marks_only_next_entry(requests in proptest::collection::vec(any::<bool>(), 0..40)) {
        let buffer = EntryBuffer::new();
        for (i, request) in requests.iter().enumerate() {
            if *request {
                buffer.send_next_to_sms();
            }
            buffer.append(LogLevel::Information, format!("entry {i}"), CallSite::default(), ());
        }

        let flags: Vec<bool> = buffer.entries().iter().map(|e| e.send_to_sms).collect();
        prop_assert_eq!(flags, requests);
    }

    /// Replay writes every entry once, in append order, then leaves the buffer empty
    #[test]
    fn test_replay_preserves_order(templates in proptest::collection::vec("[a-z]{1,8}", 0..30)) {
        let cache = CachedLogger::new();
        for template in &templates {
            cache.information(template, ());
        }

        let sink = CachedLogger::new();
        prop_assert_eq!(cache.replay_into(&sink).unwrap(), templates.len());
        prop_assert!(cache.buffer().is_empty());

        let replayed: Vec<String> = sink.buffer().entries().into_iter().map(|e| e.template).collect();
        prop_assert_eq!(replayed, templates);
    }
}

// ============================================================================
// LogLevel
// ============================================================================

proptest! {
    /// LogLevel string conversions roundtrip
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);

        let lower: LogLevel = level.to_str().to_lowercase().parse().unwrap();
        prop_assert_eq!(level, lower);
    }
}
