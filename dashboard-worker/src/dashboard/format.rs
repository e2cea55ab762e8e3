//! Number and text formatting for the page

/// `$1,234.56`, `-$12.00`
pub fn usd(value: f64) -> String {
    usd_with(value, 2)
}

/// Dollar amount with `decimals` places and thousands separators
pub fn usd_with(value: f64, decimals: usize) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${}", grouped(value.abs(), decimals))
}

/// Signed percentage, `+1.25%` / `-0.40%`
pub fn signed_percent(value: f64) -> String {
    format!("{value:+.2}%")
}

/// Plain percentage, `1.25%`
pub fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Quantity without trailing zeros, up to 8 decimals
pub fn quantity(value: f64) -> String {
    let text = format!("{value:.8}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-" { "0".to_string() } else { text.to_string() }
}

/// Optional number, `-` when missing
pub fn optional(value: Option<f64>, render: impl Fn(f64) -> String) -> String {
    value.map_or_else(|| "-".to_string(), render)
}

/// CSS class for a signed amount
pub fn pnl_class(value: f64) -> &'static str {
    if value > 0.0 {
        "positive"
    } else if value < 0.0 {
        "negative"
    } else {
        "neutral"
    }
}

fn grouped(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Escape text for HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd() {
        assert_eq!(usd(0.0), "$0.00");
        assert_eq!(usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(usd(999.999), "$1,000.00");
        assert_eq!(usd(-12.0), "-$12.00");
        assert_eq!(usd_with(0.000_021_31, 4), "$0.0000");
        assert_eq!(usd_with(123.456_78, 4), "$123.4568");
    }

    #[test]
    fn test_percentages() {
        assert_eq!(signed_percent(1.234), "+1.23%");
        assert_eq!(signed_percent(-0.4), "-0.40%");
        assert_eq!(signed_percent(0.0), "+0.00%");
        assert_eq!(percent(12.5), "12.50%");
    }

    #[test]
    fn test_quantity() {
        assert_eq!(quantity(2.0), "2");
        assert_eq!(quantity(0.012_5), "0.0125");
        assert_eq!(quantity(0.0), "0");
        assert_eq!(quantity(1_200.5), "1200.5");
    }

    #[test]
    fn test_optional_and_class() {
        assert_eq!(optional(None, usd), "-");
        assert_eq!(optional(Some(5.0), usd), "$5.00");
        assert_eq!(pnl_class(1.0), "positive");
        assert_eq!(pnl_class(-1.0), "negative");
        assert_eq!(pnl_class(0.0), "neutral");
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"
        );
    }
}
