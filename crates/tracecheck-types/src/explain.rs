//! Explain registry for diagnostic codes.
//!
//! Maps the category and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a category or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after code examples.
    pub examples: ExamplePair,
}

/// Before and after code examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Code that would trigger a diagnostic.
    pub before: &'static str,
    /// Code that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by category or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::CATEGORY_LOGGING => Some(explain_logging()),

        ids::CODE_ODD_KEY_VALUES => Some(explain_odd_key_values()),
        ids::CODE_MISSING_TRACE_ID => Some(explain_missing_trace_id()),
        ids::CODE_NON_CONSTANT_KEY => Some(explain_non_constant_key()),
        ids::CODE_NON_ASCII_KEY => Some(explain_non_ascii_key()),
        ids::CODE_PRINTF_SPECIFIER => Some(explain_printf_specifier()),

        _ => None,
    }
}

/// List all known categories.
pub fn all_categories() -> &'static [&'static str] {
    &[ids::CATEGORY_LOGGING]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_ODD_KEY_VALUES,
        ids::CODE_MISSING_TRACE_ID,
        ids::CODE_NON_CONSTANT_KEY,
        ids::CODE_NON_ASCII_KEY,
        ids::CODE_PRINTF_SPECIFIER,
    ]
}

/// Codes emitted under `category`, in catalog order. Empty for unknown categories.
pub fn codes_in_category(category: &str) -> &'static [&'static str] {
    match category {
        ids::CATEGORY_LOGGING => all_codes(),
        _ => &[],
    }
}

/// Category a code is reported under.
pub fn category_of(code: &str) -> Option<&'static str> {
    all_categories()
        .iter()
        .copied()
        .find(|category| codes_in_category(category).contains(&code))
}

fn explain_logging() -> Explanation {
    Explanation {
        title: "Structured Logging Key/Value Checks",
        description: "\
Inspects calls into structured logging libraries (logr, klog, zap, slog, go-kit log and any
custom rules) that accept a variadic list of alternating keys and values.

Field-accumulating calls (`WithValues`) are checked for an even number of key/value
arguments. Loggers built straight from a constructor (`zapr.NewLogger(...).WithValues(...)`)
must also carry the trace correlation key so log lines can be joined with distributed traces.",
        remediation: "\
See the individual codes:
- odd_key_values
- missing_trace_id
- non_constant_key
- non_ascii_key
- printf_specifier",
        examples: ExamplePair {
            before: r#"log := zapr.NewLogger(zap.L()).WithValues("eventType", eventType, "id")"#,
            after: r#"span := trace.SpanFromContext(ctx)
log := zapr.NewLogger(zap.L()).WithValues("eventType", eventType,
	"traceId", span.SpanContext().TraceID().String(),
	"spanId", span.SpanContext().SpanID().String())"#,
        },
    }
}

fn explain_odd_key_values() -> Explanation {
    Explanation {
        title: "Odd Number of Key/Value Arguments",
        description: "\
The variadic tail of a structured logging call is read as alternating keys and values.
An odd count means one key has no value (or one value has no key). Most libraries then
log a placeholder such as `!BADKEY` or silently drop the field.

No automatic fix is offered: only the author knows which value is missing.",
        remediation: "\
Add the missing value, or remove the stray key.",
        examples: ExamplePair {
            before: r#"log = log.WithValues("traceId", traceID, "key")"#,
            after: r#"log = log.WithValues("traceId", traceID, "key", value)"#,
        },
    }
}

fn explain_missing_trace_id() -> Explanation {
    Explanation {
        title: "Missing Trace Correlation Key",
        description: "\
A logger created directly from a logger constructor attaches its fields without the
`traceId` key. Without it, log records cannot be correlated with the distributed trace
that produced them.

The suggested fix:
- declares `span := trace.SpanFromContext(ctx)` at the top of the enclosing function
- adds `\"traceId\"` and `\"spanId\"` pairs derived from that span
- imports `go.opentelemetry.io/otel/trace` when the file does not import it yet",
        remediation: "\
Apply the suggested fix, or attach the trace identifier yourself:

    \"traceId\", span.SpanContext().TraceID().String()",
        examples: ExamplePair {
            before: r#"func Handle(ctx context.Context, id string) {
	log := zapr.NewLogger(zap.L()).WithValues("deliveryID", id)
}"#,
            after: r#"func Handle(ctx context.Context, id string) {
	span := trace.SpanFromContext(ctx)
	log := zapr.NewLogger(zap.L()).WithValues("deliveryID", id, "traceId", span.SpanContext().TraceID().String(), "spanId", span.SpanContext().SpanID().String())
}"#,
        },
    }
}

fn explain_non_constant_key() -> Explanation {
    Explanation {
        title: "Logging Key Is Not a Constant String",
        description: "\
Enabled by `require_string_key`. Every key must be an inlined string literal or a string
constant. Keys read from variables, struct fields or function results are reported;
their value is not resolved.",
        remediation: "\
Replace the expression with a string literal (or a `const`).",
        examples: ExamplePair {
            before: r#"log.WithValues(cfg.KeyName, value)"#,
            after: r#"log.WithValues("keyName", value)"#,
        },
    }
}

fn explain_non_ascii_key() -> Explanation {
    Explanation {
        title: "Logging Key Contains Non-ASCII Characters",
        description: "\
Enabled by `require_string_key`. Keys are expected to be plain ASCII identifiers so log
pipelines and query languages can address them without quoting.",
        remediation: "\
Rename the key using ASCII characters only.",
        examples: ExamplePair {
            before: r#"log.WithValues("clé", value)"#,
            after: r#"log.WithValues("key", value)"#,
        },
    }
}

fn explain_printf_specifier() -> Explanation {
    Explanation {
        title: "Printf-Style Specifier in Structured Logging Call",
        description: "\
Enabled by `no_printf_like`. Structured loggers do not interpolate format verbs; a `%s`
or `%d` in a message or value usually means a value should have been passed as a field.",
        remediation: "\
Move the interpolated value into a key/value pair. `%%` is an escaped percent sign and is
not reported.",
        examples: ExamplePair {
            before: r#"log.Info("user %s logged in", "user", name)"#,
            after: r#"log.Info("user logged in", "user", name)"#,
        },
    }
}
