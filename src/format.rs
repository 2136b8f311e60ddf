//! Display formatting for counts and shares.

/// `15759` -> `"15,759"`.
pub fn format_number(value: u64) -> String {
	let digits = value.to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, ch) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			out.push(',');
		}
		out.push(ch);
	}
	out
}

/// A 0..1 share as a percentage with one decimal: `0.406` -> `"40.6%"`.
pub fn format_percent(share: f64) -> String {
	if !share.is_finite() {
		return "n/a".to_string();
	}
	format!("{:.1}%", share * 100.0)
}
