use super::validate;
use crate::engine::Analyzer;
use crate::model::Type;
use crate::policy::{EffectiveConfig, Policy, PolicyTable};
use crate::registry::RuleRegistry;
use crate::test_support::{BuiltSource, SourceBuilder, any_slice, logr_with_values};
use tracecheck_types::{Diagnostic, ids};

fn run(src: &BuiltSource, cfg: &EffectiveConfig) -> Vec<Diagnostic> {
    Analyzer::new(RuleRegistry::builtin(), PolicyTable::default(), cfg.clone())
        .evaluate_file(&src.file)
        .diagnostics
}

fn codes(diags: &[Diagnostic]) -> Vec<&str> {
    diags.iter().map(|d| d.code.as_str()).collect()
}

#[test]
fn odd_pairs_on_plain_receiver_report_parity_only() {
    let src = SourceBuilder::new()
        .body_call("x.WithValues(\"traceId\", \"v\", \"key\")")
        .build();
    let diags = run(&src, &EffectiveConfig::default());

    assert_eq!(codes(&diags), vec![ids::CODE_ODD_KEY_VALUES]);
    let d = &diags[0];
    assert_eq!(
        d.message,
        "odd number of arguments passed as key-value pairs for logging"
    );
    assert!(d.suggested_fix.is_none());

    let args = &src.site().call.args;
    assert_eq!(d.location.start, args[0].span.start);
    assert_eq!(d.location.end, Some(args[2].span.end));
    assert!(d.fingerprint.is_some());
}

#[test]
fn constructor_derived_call_without_trace_id_gets_a_fix() {
    let src = SourceBuilder::zapr_event_call();
    let diags = run(&src, &EffectiveConfig::default());

    assert_eq!(codes(&diags), vec![ids::CODE_MISSING_TRACE_ID]);
    let d = &diags[0];
    assert_eq!(d.message, "missing traceId in logging keys");
    assert_eq!(d.location.start, src.site().expr.span.start);
    assert_eq!(d.location.end, None);

    let fix = d.suggested_fix.as_ref().expect("fix");
    let args_edit = fix
        .edits
        .iter()
        .find(|e| e.start == src.site().call.args[0].span.start)
        .expect("argument edit");
    assert_eq!(
        args_edit.new_text,
        "\"eventType\", e, \"traceId\", span.SpanContext().TraceID().String(), \"spanId\", span.SpanContext().SpanID().String(), \"deliverID\", d"
    );
}

#[test]
fn present_trace_id_satisfies_the_check() {
    let src = SourceBuilder::new()
        .body_call("zapr.NewLogger(z).WithValues(\"eventType\", e, \"traceId\", someVal)")
        .build();
    assert!(run(&src, &EffectiveConfig::default()).is_empty());
}

#[test]
fn trace_id_in_value_position_does_not_count() {
    let src = SourceBuilder::new()
        .body_call("zapr.NewLogger(z).WithValues(\"k\", \"traceId\")")
        .build();
    assert_eq!(
        codes(&run(&src, &EffectiveConfig::default())),
        vec![ids::CODE_MISSING_TRACE_ID]
    );
}

#[test]
fn calls_without_a_resolved_callee_are_skipped() {
    let src = SourceBuilder::new()
        .body_call("fn(\"odd\")")
        .callee(None)
        .build();
    assert!(run(&src, &EffectiveConfig::default()).is_empty());
}

#[test]
fn field_access_key_is_flagged_when_string_keys_are_required() {
    let src = SourceBuilder::new()
        .body_call("x.WithValues(cfg.KeyName, v)")
        .build();
    let cfg = EffectiveConfig {
        require_string_key: true,
        ..EffectiveConfig::default()
    };
    let diags = run(&src, &cfg);

    assert_eq!(codes(&diags), vec![ids::CODE_NON_CONSTANT_KEY]);
    assert_eq!(
        diags[0].message,
        "logging keys are expected to be inlined constant strings, please replace \"cfg.KeyName\" provided with string"
    );
    assert!(diags[0].suggested_fix.is_none());
}

#[test]
fn non_ascii_and_constant_keys() {
    let mut src = SourceBuilder::new()
        .body_call("x.WithValues(\"ключ\", v, myKey, w)")
        .build();
    // `myKey` resolves to a string constant.
    if let Some(crate::model::Decl::Func(f)) = src.file.decls.first_mut()
        && let Some(body) = f.body.as_mut()
        && let Some(crate::model::ExprKind::Call(call)) =
            body.stmts[0].exprs.get_mut(0).map(|e| &mut e.node)
    {
        call.args[2].const_value = Some("my_key".to_string());
    }
    let cfg = EffectiveConfig {
        require_string_key: true,
        ..EffectiveConfig::default()
    };
    let diags = run(&src, &cfg);
    assert_eq!(codes(&diags), vec![ids::CODE_NON_ASCII_KEY]);
    assert!(diags[0].message.contains("\"ключ\""));
}

#[test]
fn printf_check_reports_once_over_all_arguments() {
    let src = SourceBuilder::new()
        .body_call("x.WithValues(\"msg\", \"user %s\", \"n\", \"%d\")")
        .build();
    let cfg = EffectiveConfig {
        no_printf_like: true,
        ..EffectiveConfig::default()
    };
    let diags = run(&src, &cfg);
    assert_eq!(codes(&diags), vec![ids::CODE_PRINTF_SPECIFIER]);
    assert_eq!(
        diags[0].message,
        "logging message should not use format specifier \"%s\""
    );
}

#[test]
fn printf_check_covers_fixed_parameters() {
    // Info(msg string, keysAndValues ...interface{})
    let mut info = logr_with_values();
    info.name = "InfoWithValues".to_string();
    info.signature.params = vec![
        Type::Basic {
            name: "string".to_string(),
        },
        any_slice(),
    ];
    let src = SourceBuilder::new()
        .callee(Some(info))
        .body_call("x.InfoWithValues(\"hello %v\", \"k\", v)")
        .build();
    let cfg = EffectiveConfig {
        no_printf_like: true,
        ..EffectiveConfig::default()
    };
    let site = src.site();
    let diags = validate(&site, Policy::General, &cfg);
    assert_eq!(codes(&diags), vec![ids::CODE_PRINTF_SPECIFIER]);
    assert_eq!(diags[0].location.start, site.call.args[0].span.start);
}

#[test]
fn non_interface_tail_produces_nothing() {
    let mut strings = logr_with_values();
    strings.signature.params = vec![Type::Slice {
        elem: Box::new(Type::Basic {
            name: "string".to_string(),
        }),
    }];
    let src = SourceBuilder::new()
        .callee(Some(strings))
        .body_call("zapr.NewLogger(z).WithValues(\"odd\")")
        .build();
    let cfg = EffectiveConfig {
        require_string_key: true,
        no_printf_like: true,
        ..EffectiveConfig::default()
    };
    assert!(validate(&src.site(), Policy::General, &cfg).is_empty());
}

#[test]
fn ident_constructors_and_custom_names_are_recognized() {
    let src = SourceBuilder::new()
        .body_call("Build().WithValues(\"k\", v)")
        .build();
    assert!(run(&src, &EffectiveConfig::default()).is_empty());

    let cfg = EffectiveConfig {
        logger_constructors: vec!["Build".to_string()],
        ..EffectiveConfig::default()
    };
    assert_eq!(codes(&run(&src, &cfg)), vec![ids::CODE_MISSING_TRACE_ID]);
}
