/// File-name slug for a sector: lowercase ASCII alphanumerics joined by single
/// hyphens, with no leading or trailing hyphen.
///
/// `"Healthcare & Social Assistance"` becomes `"healthcare-social-assistance"`.
pub fn slugify(text: &str) -> String {
	let mut slug = String::with_capacity(text.len());
	let mut pending_hyphen = false;

	for ch in text.chars().flat_map(char::to_lowercase) {
		if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
			if pending_hyphen && !slug.is_empty() {
				slug.push('-');
			}
			pending_hyphen = false;
			slug.push(ch);
		} else {
			pending_hyphen = true;
		}
	}
	slug
}
