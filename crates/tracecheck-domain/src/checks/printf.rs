use super::utils::diagnostic;
use crate::classify::CallSite;
use crate::model::Expr;
use tracecheck_types::{Diagnostic, ids};

const FLAGS: &[char] = &['+', '-', '#', ' ', '0'];
const VERBS: &str = "vTtbcdoOqxXUeEfFgGspw";

/// Report the first constant string argument carrying a printf verb. One diagnostic per call.
pub fn run(site: &CallSite<'_>, args: &[Expr]) -> Vec<Diagnostic> {
    for arg in args {
        let Some(value) = arg.constant_string() else {
            continue;
        };
        if let Some(spec) = find_printf_specifier(&value) {
            return vec![diagnostic(
                site,
                ids::CODE_PRINTF_SPECIFIER,
                format!("logging message should not use format specifier {spec:?}"),
                arg.span.start,
                Some(arg.span.end),
            )];
        }
    }
    Vec::new()
}

/// First printf-style specifier in `s` (`%s`, `%-08.3f`, `%[1]d`, `%*d`), as written.
/// `%%` is an escaped percent sign.
pub fn find_printf_specifier(s: &str) -> Option<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '%' {
            i += 1;
            continue;
        }
        let start = i;
        i += 1;
        if chars.get(i) == Some(&'%') {
            i += 1;
            continue;
        }

        while chars.get(i).is_some_and(|c| FLAGS.contains(c)) {
            i += 1;
        }
        i = skip_arg_index(&chars, i);
        i = skip_number(&chars, i);
        if chars.get(i) == Some(&'.') {
            i += 1;
            i = skip_arg_index(&chars, i);
            i = skip_number(&chars, i);
        }
        i = skip_arg_index(&chars, i);

        if let Some(c) = chars.get(i)
            && VERBS.contains(*c)
        {
            return Some(chars[start..=i].iter().collect());
        }
    }
    None
}

/// `[n]` explicit argument index.
fn skip_arg_index(chars: &[char], i: usize) -> usize {
    if chars.get(i) != Some(&'[') {
        return i;
    }
    let mut j = i + 1;
    while chars.get(j).is_some_and(char::is_ascii_digit) {
        j += 1;
    }
    if chars.get(j) == Some(&']') { j + 1 } else { i }
}

/// Width or precision: digits or `*`.
fn skip_number(chars: &[char], i: usize) -> usize {
    if chars.get(i) == Some(&'*') {
        return i + 1;
    }
    let mut j = i;
    while chars.get(j).is_some_and(char::is_ascii_digit) {
        j += 1;
    }
    j
}
