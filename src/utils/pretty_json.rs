use serde_json::{Number, Value};

const INDENT: &str = "  ";
/// Integers beyond this magnitude lose precision as IEEE doubles.
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Two-space indented JSON with numbers written the way a browser prints
/// them: `12.0` becomes `12`, `1e21` becomes `1e+21`.
pub fn to_pretty_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(n)),
        Value::String(s) => write_string(out, s),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                write_value(out, item, depth + 1);
            }
            newline(out, depth);
            out.push(']');
        }
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                write_string(out, key);
                out.push_str(": ");
                write_value(out, item, depth + 1);
            }
            newline(out, depth);
            out.push('}');
        }
    }
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_string(out: &mut String, s: &str) {
    // serde_json escapes the same set of characters a browser does.
    match serde_json::to_string(s) {
        Ok(quoted) => out.push_str(&quoted),
        Err(_) => out.push_str("\"\""),
    }
}

fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_u64().filter(|i| *i <= MAX_SAFE_INTEGER) {
        return i.to_string();
    }
    if let Some(i) = n.as_i64().filter(|i| i.unsigned_abs() <= MAX_SAFE_INTEGER) {
        return i.to_string();
    }
    n.as_f64().map(format_f64).unwrap_or_else(|| n.to_string())
}

/// ECMAScript `Number.prototype.toString` for finite doubles.
fn format_f64(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    if x < 0.0 {
        return format!("-{}", format_f64(-x));
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.25e-7".
    let sci = format!("{x:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };
    let k = digits.len() as i32;
    let n = exp + 1;

    if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat(-n as usize))
    } else {
        let e = n - 1;
        let sign = if e >= 0 { '+' } else { '-' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{sign}{}", e.abs())
        } else {
            format!("{first}.{rest}e{sign}{}", e.abs())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn whole_floats_print_as_integers() {
        let value: Value = serde_json::from_str(r#"{"average_sentence_length": 12.0}"#).unwrap();

        assert_eq!(
            to_pretty_string(&value),
            "{\n  \"average_sentence_length\": 12\n}"
        );
    }

    #[test]
    fn numbers_follow_browser_formatting() {
        assert_eq!(format_f64(1e21), "1e+21");
        assert_eq!(format_f64(1e20), "100000000000000000000");
        assert_eq!(format_f64(1.5e-7), "1.5e-7");
        assert_eq!(format_f64(0.000001), "0.000001");
        assert_eq!(format_f64(123.456), "123.456");
        assert_eq!(format_f64(-0.5), "-0.5");
        assert_eq!(format_f64(2.5e25), "2.5e+25");
        assert_eq!(format_f64(-0.0), "0");
    }

    #[test]
    fn integers_pass_through() {
        assert_eq!(to_pretty_string(&json!(42)), "42");
        assert_eq!(to_pretty_string(&json!(-7)), "-7");
    }

    #[test]
    fn integers_beyond_double_precision_round() {
        assert_eq!(
            to_pretty_string(&json!(12345678901234567890u64)),
            "12345678901234567000"
        );
    }

    #[test]
    fn nested_layout_matches_two_space_indent() {
        let value = json!({
            "entities": [{"text": "Rust", "label": "LANG"}],
            "keywords": [],
            "meta": {},
            "ok": true,
            "missing": null
        });

        assert_eq!(
            to_pretty_string(&value),
            "{\n  \"entities\": [\n    {\n      \"text\": \"Rust\",\n      \"label\": \"LANG\"\n    }\n  ],\n  \"keywords\": [],\n  \"meta\": {},\n  \"ok\": true,\n  \"missing\": null\n}"
        );
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(to_pretty_string(&json!("a\"b\n")), "\"a\\\"b\\n\"");
    }
}
