//! `printf`-style formatting of a single value into a text template
//!
//! Supported conversions: `%d`, `%x`, `%s` and `%f`, with optional `-`
//! (left align), `0` (zero pad), width and `.precision`; `%%` is a literal
//! percent sign. The value is consumed by the first conversion, later
//! conversions are kept as written.

use crate::ecs::AttributeValue;

#[derive(Debug, Default, PartialEq)]
struct FormatSpec {
    left: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
}

impl FormatSpec {
    fn parse(raw: &str) -> Self {
        let left = raw.starts_with('-');
        let raw = raw.trim_start_matches('-');
        let zero = raw.starts_with('0');
        let (width, precision) = match raw.split_once('.') {
            Some((w, p)) => (w, p.parse().ok()),
            None => (raw, None),
        };
        Self { left, zero, width: width.parse().unwrap_or(0), precision }
    }

    fn pad(&self, body: String) -> String {
        let len = body.chars().count();
        if len >= self.width {
            return body;
        }
        let fill = self.width - len;
        if self.left {
            format!("{body}{}", " ".repeat(fill))
        } else if self.zero {
            match body.strip_prefix('-') {
                Some(digits) => format!("-{}{digits}", "0".repeat(fill)),
                None => format!("{}{body}", "0".repeat(fill)),
            }
        } else {
            format!("{}{body}", " ".repeat(fill))
        }
    }
}

/// Format `value` into `template`
pub fn format_value(template: &str, value: &AttributeValue) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut chars = template.chars().peekable();
    let mut consumed = false;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }
        let mut raw = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_ascii_digit() || next == '.' || next == '-' {
                raw.push(next);
                chars.next();
            } else {
                break;
            }
        }
        let Some(conversion) = chars.next() else {
            out.push('%');
            out.push_str(&raw);
            break;
        };
        let body = if consumed { None } else { convert(conversion, &FormatSpec::parse(&raw), value) };
        match body {
            Some(body) => {
                consumed = true;
                out.push_str(&body);
            }
            None => {
                out.push('%');
                out.push_str(&raw);
                out.push(conversion);
            }
        }
    }
    out
}

fn convert(conversion: char, spec: &FormatSpec, value: &AttributeValue) -> Option<String> {
    let body = match conversion {
        'd' => as_int(value).map_or_else(|| value.to_string(), |i| i.to_string()),
        'x' => as_int(value).map_or_else(|| value.to_string(), |i| format!("{i:x}")),
        'f' => {
            let precision = spec.precision.unwrap_or(6);
            as_float(value).map_or_else(|| value.to_string(), |f| format!("{f:.precision$}"))
        }
        's' => {
            let text = value.to_string();
            match spec.precision {
                Some(max) => text.chars().take(max).collect(),
                None => text,
            }
        }
        _ => return None,
    };
    Some(spec.pad(body))
}

fn as_int(value: &AttributeValue) -> Option<i64> {
    match value {
        AttributeValue::Int(i) => Some(*i),
        AttributeValue::Float(f) => Some(f.trunc() as i64),
        AttributeValue::Text(t) => t.trim().parse().ok(),
        AttributeValue::Bool(_) => None,
    }
}

fn as_float(value: &AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Int(i) => Some(*i as f64),
        AttributeValue::Float(f) => Some(*f),
        AttributeValue::Text(t) => t.trim().parse().ok(),
        AttributeValue::Bool(_) => None,
    }
}
