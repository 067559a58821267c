//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Key/value parity reporting
//! - Correlation key presence at any pair position
//! - Suggested-fix edit scripts (ordering, disjointness, import idempotence)

use crate::edits::{apply_edits, validate_edits};
use crate::engine::Analyzer;
use crate::fix::TRACE_IMPORT_PATH;
use crate::policy::{EffectiveConfig, PolicyTable};
use crate::registry::RuleRegistry;
use crate::test_support::{BuiltSource, SourceBuilder};
use proptest::prelude::*;
use tracecheck_types::{Diagnostic, ids};

// ============================================================================
// Strategies
// ============================================================================

/// A single call argument as written in source.
fn arb_arg() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-zA-Z0-9]{0,8}".prop_map(|k| format!("\"{k}\"")),
        "[a-z][a-zA-Z0-9]{0,6}",
        ("[a-z]{1,4}", "[A-Z][a-z]{0,5}").prop_map(|(x, sel)| format!("{x}.{sel}")),
        "[a-z]{1,4}".prop_map(|f| format!("{f}()")),
    ]
}

fn arb_args(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_arg(), 0..=max)
}

/// Ways a file can already import the trace package.
fn arb_trace_import() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(format!("\"{TRACE_IMPORT_PATH}\"")),
        Just(format!("oteltrace \"{TRACE_IMPORT_PATH}\"")),
        Just(format!("\"example.com/app/vendor/{TRACE_IMPORT_PATH}\"")),
    ]
}

fn build(receiver: &str, args: &[String], imports: &[String], leading_stmts: usize) -> BuiltSource {
    let mut builder = SourceBuilder::new();
    for import in imports {
        builder = builder.import_line(import);
    }
    for i in 0..leading_stmts {
        builder = builder.body_stmt(&format!("x{i} := {i}"), &[]);
    }
    builder
        .body_call(&format!("{receiver}.WithValues({})", args.join(", ")))
        .build()
}

fn evaluate(src: &BuiltSource, cfg: EffectiveConfig) -> Vec<Diagnostic> {
    Analyzer::new(RuleRegistry::builtin(), PolicyTable::default(), cfg)
        .evaluate_file(&src.file)
        .diagnostics
}

fn count(diags: &[Diagnostic], code: &str) -> usize {
    diags.iter().filter(|d| d.code == code).count()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Exactly one parity diagnostic for an odd argument count, none otherwise.
    #[test]
    fn parity_matches_argument_count(args in arb_args(9)) {
        let src = build("x", &args, &[], 0);
        let diags = evaluate(&src, EffectiveConfig::default());
        let expected = usize::from(args.len() % 2 == 1);
        prop_assert_eq!(count(&diags, ids::CODE_ODD_KEY_VALUES), expected);
        prop_assert_eq!(count(&diags, ids::CODE_MISSING_TRACE_ID), 0);
    }

    /// A literal `traceId` key anywhere in the pairs satisfies the correlation check.
    #[test]
    fn trace_id_key_is_found_at_any_pair(pairs in 0usize..5, at in 0usize..5) {
        let at = at.min(pairs);
        let mut args = Vec::new();
        for i in 0..=pairs {
            if i == at {
                args.push("\"traceId\"".to_string());
            } else {
                args.push(format!("\"k{i}\""));
            }
            args.push(format!("v{i}"));
        }
        let src = build("zapr.NewLogger(z)", &args, &[], 0);
        let diags = evaluate(&src, EffectiveConfig::default());
        prop_assert_eq!(count(&diags, ids::CODE_MISSING_TRACE_ID), 0);
    }

    /// Fix edits are sorted, disjoint and apply to the source.
    #[test]
    fn fix_edits_are_well_formed(
        args in arb_args(7),
        import_other in any::<bool>(),
        leading in 0usize..3,
    ) {
        let imports: Vec<String> = if import_other {
            vec!["\"context\"".to_string()]
        } else {
            Vec::new()
        };
        let src = build("zapr.NewLogger(z)", &args, &imports, leading);
        let fix = src.fix(&EffectiveConfig::default()).expect("fix");

        prop_assert!(validate_edits(&fix.edits).is_ok());
        prop_assert_eq!(fix.edits.len(), 3);
        for pair in fix.edits.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
            prop_assert!(pair[0].end <= pair[1].start);
        }

        let fixed = apply_edits(&src.text, &fix.edits).expect("apply");
        prop_assert!(fixed.contains("span.SpanContext().TraceID().String()"));
        for arg in &args {
            prop_assert!(fixed.contains(arg.as_str()));
        }
    }

    /// An existing trace import, in any form, suppresses the import edit.
    #[test]
    fn import_is_never_added_twice(import in arb_trace_import(), args in arb_args(4)) {
        let imports = vec!["\"context\"".to_string(), import];
        let src = build("zapr.NewLogger(z)", &args, &imports, 1);
        let fix = src.fix(&EffectiveConfig::default()).expect("fix");
        prop_assert_eq!(fix.edits.len(), 2);
        prop_assert!(fix.edits.iter().all(|e| !e.new_text.contains(TRACE_IMPORT_PATH)));
    }
}
