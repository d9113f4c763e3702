//! Composite format strings.
//!
//! Placeholders have the form `{index[,alignment][:format]}`; `{{` and `}}`
//! are literal braces. Numeric arguments honour the standard specifiers
//! `G`, `D`, `N`, `F`, `X` and `E` (each with an optional precision) using
//! the separators of the supplied [`Culture`]. Unknown specifiers fall back
//! to the default rendering.
//!
//! Alignment magnitude must be below [`MAX_ALIGNMENT`] and precision at most
//! [`MAX_PRECISION`]; larger values are rejected with
//! [`FormatError::SpecifierOutOfRange`] before anything is rendered.

use std::fmt::Write as _;

use thiserror::Error;

use super::FormatArg;
use super::culture::Culture;

/// A malformed composite format string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    /// `{` without a matching `}`.
    #[error("unclosed brace at position {position}")]
    UnclosedBrace {
        /// Byte offset of the opening brace.
        position: usize,
    },

    /// A lone `}` outside a placeholder.
    #[error("unexpected closing brace at position {position}")]
    UnexpectedClosingBrace {
        /// Byte offset of the brace.
        position: usize,
    },

    /// Placeholder index is not a non-negative integer.
    #[error("invalid placeholder index {text:?}")]
    InvalidIndex {
        /// The index text as written.
        text: String,
    },

    /// Placeholder index has no matching argument.
    #[error("placeholder index {index} out of range for {count} arguments")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of arguments supplied.
        count: usize,
    },

    /// Alignment component is not an integer.
    #[error("invalid alignment {text:?}")]
    InvalidAlignment {
        /// The alignment text as written.
        text: String,
    },

    /// Alignment or precision beyond the supported limit.
    #[error("{what} {text:?} exceeds the limit of {limit}")]
    SpecifierOutOfRange {
        /// `"alignment"` or `"precision"`.
        what: &'static str,
        /// The value as written.
        text: String,
        /// Largest accepted magnitude.
        limit: usize,
    },
}

/// Alignment magnitudes must stay below this.
pub const MAX_ALIGNMENT: usize = 1_000_000;

/// Largest precision accepted after a specifier letter.
pub const MAX_PRECISION: usize = 999;

/// Signature of a composite formatting routine.
pub type FormatFn = fn(&Culture, &str, &[FormatArg]) -> Result<String, FormatError>;

/// Format `format` against `args` using `culture`.
pub fn format_string(
    culture: &Culture,
    format: &str,
    args: &[FormatArg],
) -> Result<String, FormatError> {
    let mut out = String::with_capacity(format.len() + args.len() * 8);
    let mut chars = format.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if chars.next_if(|&(_, next)| next == '{').is_some() {
                    out.push('{');
                    continue;
                }
                let mut end = None;
                for (i, inner) in chars.by_ref() {
                    match inner {
                        '}' => {
                            end = Some(i);
                            break;
                        }
                        '{' => return Err(FormatError::UnclosedBrace { position: pos }),
                        _ => {}
                    }
                }
                let end = end.ok_or(FormatError::UnclosedBrace { position: pos })?;
                write_placeholder(&mut out, culture, &format[pos + 1..end], args)?;
            }
            '}' => {
                if chars.next_if(|&(_, next)| next == '}').is_none() {
                    return Err(FormatError::UnexpectedClosingBrace { position: pos });
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

fn write_placeholder(
    out: &mut String,
    culture: &Culture,
    hole: &str,
    args: &[FormatArg],
) -> Result<(), FormatError> {
    let (head, spec) = match hole.split_once(':') {
        Some((head, spec)) => (head, Some(spec)),
        None => (hole, None),
    };
    let (index_text, alignment_text) = match head.split_once(',') {
        Some((index, alignment)) => (index, Some(alignment)),
        None => (head, None),
    };

    let index: usize = index_text
        .trim()
        .parse()
        .map_err(|_| FormatError::InvalidIndex {
            text: index_text.to_string(),
        })?;
    let arg = args.get(index).ok_or(FormatError::IndexOutOfRange {
        index,
        count: args.len(),
    })?;
    let alignment: i32 = match alignment_text {
        Some(text) => text
            .trim()
            .parse()
            .map_err(|_| FormatError::InvalidAlignment {
                text: text.to_string(),
            })?,
        None => 0,
    };
    if alignment.unsigned_abs() as usize >= MAX_ALIGNMENT {
        return Err(FormatError::SpecifierOutOfRange {
            what: "alignment",
            text: alignment.to_string(),
            limit: MAX_ALIGNMENT - 1,
        });
    }

    let spec = parse_spec(spec.map(str::trim))?;
    let rendered = render(arg, spec, culture);
    pad(out, &rendered, alignment);
    Ok(())
}

fn pad(out: &mut String, text: &str, alignment: i32) {
    let width = alignment.unsigned_abs() as usize;
    let len = text.chars().count();
    let fill = width.saturating_sub(len);
    if alignment > 0 {
        out.extend(std::iter::repeat_n(' ', fill));
        out.push_str(text);
    } else {
        out.push_str(text);
        out.extend(std::iter::repeat_n(' ', fill));
    }
}

// ── Argument rendering ──────────────────────────────────────────────────────

/// A parsed standard format specifier such as `N2`.
#[derive(Clone, Copy)]
struct Spec {
    letter: char,
    precision: Option<usize>,
}

/// `Ok(None)` for custom or empty specifiers, which render as default.
fn parse_spec(spec: Option<&str>) -> Result<Option<Spec>, FormatError> {
    let Some(spec) = spec.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let mut chars = spec.chars();
    let Some(letter) = chars.next().filter(char::is_ascii_alphabetic) else {
        return Ok(None);
    };
    let rest = chars.as_str();
    if rest.is_empty() {
        return Ok(Some(Spec {
            letter,
            precision: None,
        }));
    }
    if !rest.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    match rest.parse::<usize>() {
        Ok(precision) if precision <= MAX_PRECISION => Ok(Some(Spec {
            letter,
            precision: Some(precision),
        })),
        _ => Err(FormatError::SpecifierOutOfRange {
            what: "precision",
            text: rest.to_string(),
            limit: MAX_PRECISION,
        }),
    }
}

fn render(arg: &FormatArg, spec: Option<Spec>, culture: &Culture) -> String {
    match arg {
        FormatArg::Null => String::new(),
        FormatArg::Bool(true) => "True".to_string(),
        FormatArg::Bool(false) => "False".to_string(),
        FormatArg::Char(c) => c.to_string(),
        FormatArg::Str(s) => s.clone(),
        FormatArg::Int(v) => render_integer(*v < 0, v.unsigned_abs(), i64_bits(*v), spec, culture),
        FormatArg::UInt(v) => render_integer(false, *v, *v, spec, culture),
        FormatArg::Float(v) => render_float(*v, spec, culture),
    }
}

fn i64_bits(v: i64) -> u64 {
    u64::from_ne_bytes(v.to_ne_bytes())
}

fn render_integer(
    negative: bool,
    magnitude: u64,
    bits: u64,
    spec: Option<Spec>,
    culture: &Culture,
) -> String {
    let sign = if negative { culture.negative_sign() } else { "" };
    let Some(spec) = spec else {
        return format!("{sign}{magnitude}");
    };
    match spec.letter {
        'D' | 'd' => {
            let width = spec.precision.unwrap_or(0);
            format!("{sign}{magnitude:0width$}")
        }
        'N' | 'n' => {
            let decimals = spec.precision.unwrap_or(2);
            let grouped = group_digits(&magnitude.to_string(), culture.group_separator());
            format!("{sign}{grouped}{}", zero_fraction(decimals, culture))
        }
        'F' | 'f' => {
            let decimals = spec.precision.unwrap_or(2);
            format!("{sign}{magnitude}{}", zero_fraction(decimals, culture))
        }
        'X' => {
            let width = spec.precision.unwrap_or(0);
            format!("{:0width$X}", hex_value(negative, bits))
        }
        'x' => {
            let width = spec.precision.unwrap_or(0);
            format!("{:0width$x}", hex_value(negative, bits))
        }
        'E' | 'e' => {
            #[allow(clippy::cast_precision_loss)]
            let value = magnitude as f64;
            let value = if negative { -value } else { value };
            render_scientific(value, spec.letter, spec.precision.unwrap_or(6), culture)
        }
        _ => format!("{sign}{magnitude}"),
    }
}

fn hex_value(negative: bool, bits: u64) -> u64 {
    // Negative values render as 32-bit two's complement when they fit.
    match i32::try_from(u64_to_i64(bits)) {
        Ok(small) if negative => u64::from(u32::from_ne_bytes(small.to_ne_bytes())),
        _ => bits,
    }
}

fn u64_to_i64(bits: u64) -> i64 {
    i64::from_ne_bytes(bits.to_ne_bytes())
}

fn zero_fraction(decimals: usize, culture: &Culture) -> String {
    if decimals == 0 {
        String::new()
    } else {
        format!("{}{}", culture.decimal_separator(), "0".repeat(decimals))
    }
}

fn render_float(value: f64, spec: Option<Spec>, culture: &Culture) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "Infinity".to_string()
        } else {
            format!("{}Infinity", culture.negative_sign())
        };
    }

    let sign = if value < 0.0 { culture.negative_sign() } else { "" };
    let magnitude = value.abs();

    match spec {
        Some(Spec {
            letter: 'N' | 'n',
            precision,
        }) => {
            let fixed = format!("{magnitude:.*}", precision.unwrap_or(2));
            let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
            let grouped = group_digits(int_part, culture.group_separator());
            join_number(sign, &grouped, frac_part, culture)
        }
        Some(Spec {
            letter: 'F' | 'f',
            precision,
        }) => {
            let fixed = format!("{magnitude:.*}", precision.unwrap_or(2));
            let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
            join_number(sign, int_part, frac_part, culture)
        }
        Some(Spec {
            letter: letter @ ('E' | 'e'),
            precision,
        }) => render_scientific(value, letter, precision.unwrap_or(6), culture),
        _ => {
            let plain = magnitude.to_string();
            let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), ""));
            join_number(sign, int_part, frac_part, culture)
        }
    }
}

fn render_scientific(value: f64, letter: char, decimals: usize, culture: &Culture) -> String {
    let sign = if value < 0.0 { culture.negative_sign() } else { "" };
    let formatted = format!("{:.*e}", decimals, value.abs());
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let (exp_sign, exp_digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    let mut out = join_number(sign, int_part, frac_part, culture);
    let _ = write!(out, "{letter}{exp_sign}{exp_digits:0>3}");
    out
}

fn join_number(sign: &str, int_part: &str, frac_part: &str, culture: &Culture) -> String {
    if frac_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}{}{frac_part}", culture.decimal_separator())
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn fmt(format: &str, args: &[FormatArg]) -> String {
        format_string(&Culture::invariant(), format, args).unwrap()
    }

    fn fmt_in(culture: &str, format: &str, args: &[FormatArg]) -> String {
        format_string(&Culture::resolve(culture), format, args).unwrap()
    }

    #[test]
    fn positional_substitution() {
        let out = fmt(
            "Project \"{0}\" built target {1} ({0})",
            &["a.proj".into(), "Build".into()],
        );
        assert_eq!(out, "Project \"a.proj\" built target Build (a.proj)");
    }

    #[test]
    fn escaped_braces() {
        assert_eq!(fmt("{{{0}}}", &[FormatArg::Int(5)]), "{5}");
        assert_eq!(fmt("no holes {{}}", &[FormatArg::Int(5)]), "no holes {}");
    }

    #[test]
    fn alignment_pads() {
        assert_eq!(fmt("[{0,5}]", &["ab".into()]), "[   ab]");
        assert_eq!(fmt("[{0,-5}]", &["ab".into()]), "[ab   ]");
        assert_eq!(fmt("[{0,1}]", &["abc".into()]), "[abc]");
    }

    #[test]
    fn scalar_defaults() {
        let args = [
            FormatArg::Bool(true),
            FormatArg::Bool(false),
            FormatArg::Null,
            FormatArg::Char('x'),
            FormatArg::Int(-42),
            FormatArg::UInt(7),
        ];
        assert_eq!(fmt("{0}|{1}|{2}|{3}|{4}|{5}", &args), "True|False||x|-42|7");
    }

    #[test]
    fn integer_specifiers() {
        let n = [FormatArg::Int(1_234_567)];
        assert_eq!(fmt("{0:N0}", &n), "1,234,567");
        assert_eq!(fmt("{0:N}", &n), "1,234,567.00");
        assert_eq!(fmt("{0:F1}", &n), "1234567.0");
        assert_eq!(fmt("{0:D9}", &n), "001234567");
        assert_eq!(fmt("{0:X}", &[FormatArg::Int(255)]), "FF");
        assert_eq!(fmt("{0:x4}", &[FormatArg::Int(255)]), "00ff");
        assert_eq!(fmt("{0:D4}", &[FormatArg::Int(-12)]), "-0012");
    }

    #[test]
    fn negative_hex_is_twos_complement() {
        assert_eq!(fmt("{0:X}", &[FormatArg::Int(-1)]), "FFFFFFFF");
    }

    #[test]
    fn float_specifiers() {
        let v = [FormatArg::Float(1234.5678)];
        assert_eq!(fmt("{0}", &v), "1234.5678");
        assert_eq!(fmt("{0:F2}", &v), "1234.57");
        assert_eq!(fmt("{0:N1}", &v), "1,234.6");
        assert_eq!(fmt("{0:E2}", &v), "1.23E+003");
        assert_eq!(fmt("{0:e3}", &[FormatArg::Float(0.000_125)]), "1.250e-004");
        assert_eq!(fmt("{0}", &[FormatArg::Float(3.0)]), "3");
        assert_eq!(fmt("{0}", &[FormatArg::Float(-0.5)]), "-0.5");
    }

    #[test]
    fn non_finite_floats() {
        assert_eq!(fmt("{0}", &[FormatArg::Float(f64::NAN)]), "NaN");
        assert_eq!(fmt("{0}", &[FormatArg::Float(f64::INFINITY)]), "Infinity");
        assert_eq!(
            fmt("{0}", &[FormatArg::Float(f64::NEG_INFINITY)]),
            "-Infinity"
        );
    }

    #[test]
    fn culture_separators_apply() {
        let v = [FormatArg::Float(1234.5)];
        insta::assert_snapshot!(fmt_in("de-DE", "{0:N2}", &v), @"1.234,50");
        insta::assert_snapshot!(fmt_in("en-US", "{0:N2}", &v), @"1,234.50");
        insta::assert_snapshot!(fmt_in("de-DE", "{0}", &v), @"1234,5");
    }

    #[test]
    fn unknown_specifier_falls_back() {
        assert_eq!(fmt("{0:0.00}", &[FormatArg::Int(5)]), "5");
        assert_eq!(fmt("{0:Q}", &[FormatArg::Float(1.5)]), "1.5");
        assert_eq!(fmt("{0:N2}", &["text".into()]), "text");
    }

    #[test]
    fn unclosed_brace() {
        let err = format_string(&Culture::invariant(), "abc {0", &[FormatArg::Int(1)]);
        assert_matches!(err, Err(FormatError::UnclosedBrace { position: 4 }));
    }

    #[test]
    fn lone_closing_brace() {
        let err = format_string(&Culture::invariant(), "a } b", &[]);
        assert_matches!(err, Err(FormatError::UnexpectedClosingBrace { position: 2 }));
    }

    #[test]
    fn bad_index() {
        let err = format_string(&Culture::invariant(), "{x}", &[FormatArg::Int(1)]);
        assert_matches!(err, Err(FormatError::InvalidIndex { .. }));
    }

    #[test]
    fn index_out_of_range() {
        let err = format_string(&Culture::invariant(), "{0} {2}", &["a".into(), "b".into()]);
        assert_matches!(
            err,
            Err(FormatError::IndexOutOfRange { index: 2, count: 2 })
        );
    }

    #[test]
    fn bad_alignment() {
        let err = format_string(&Culture::invariant(), "{0,wide}", &["a".into()]);
        assert_matches!(err, Err(FormatError::InvalidAlignment { .. }));
    }

    #[test]
    fn precision_above_limit_is_rejected() {
        for (format, arg) in [
            ("{0:D70000}", FormatArg::Int(1)),
            ("{0:F70000}", FormatArg::Float(1.5)),
            ("{0:N99999999999999999}", FormatArg::Float(1.5)),
            ("{0:E1000}", FormatArg::Float(1.5)),
            ("{0:X1000}", FormatArg::Int(1)),
            ("{0:N99999999999999999999999}", FormatArg::Int(1)),
        ] {
            let err = format_string(&Culture::invariant(), format, &[arg]);
            assert_matches!(
                err,
                Err(FormatError::SpecifierOutOfRange { what: "precision", .. }),
                "{format}"
            );
        }
    }

    #[test]
    fn precision_at_limit_renders() {
        let out = fmt("{0:D999}", &[FormatArg::Int(7)]);
        assert_eq!(out.len(), MAX_PRECISION);
        assert!(out.ends_with("07"));
        let out = fmt("{0:F999}", &[FormatArg::Float(0.5)]);
        assert_eq!(out.len(), 2 + MAX_PRECISION);
    }

    #[test]
    fn alignment_above_limit_is_rejected() {
        for format in ["{0,1000000}", "{0,-1000000}", "{0,2000000000}"] {
            let err = format_string(&Culture::invariant(), format, &["a".into()]);
            assert_matches!(
                err,
                Err(FormatError::SpecifierOutOfRange { what: "alignment", limit: 999_999, .. }),
                "{format}"
            );
        }
        assert_eq!(fmt("{0,999999}", &["a".into()]).len(), 999_999);
    }

    #[test]
    fn out_of_range_display() {
        let err = format_string(&Culture::invariant(), "{0:N5000}", &[FormatArg::Int(1)]);
        assert_eq!(
            err.unwrap_err().to_string(),
            "precision \"5000\" exceeds the limit of 999"
        );
    }

    #[test]
    fn grouping_edges() {
        assert_eq!(group_digits("1", ","), "1");
        assert_eq!(group_digits("123", ","), "123");
        assert_eq!(group_digits("1234", ","), "1,234");
        assert_eq!(group_digits("123456", "."), "123.456");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn brace_free_text_is_unchanged(text in "[^{}]{0,64}") {
                let out = format_string(&Culture::invariant(), &text, &[FormatArg::Int(1)]).unwrap();
                prop_assert_eq!(out, text);
            }

            #[test]
            fn integer_default_matches_display(v in any::<i64>()) {
                let out = format_string(&Culture::invariant(), "{0}", &[FormatArg::Int(v)]).unwrap();
                prop_assert_eq!(out, v.to_string());
            }
        }
    }
}
