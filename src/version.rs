/* src/version.rs */

//!
//! Tolerant ordering over dotted numeric version strings.
//!
//! Version advisories arrive from the outside world and are not trusted to
//! be well formed. Parsing therefore never fails: a malformed string yields
//! an *invalid* version, which orders strictly below every valid version
//! and compares equal to every other invalid one. This keeps malformed
//! advisories inert, since they can never outrank a cached document.

use std::cmp::Ordering;

/// A parsed dotted numeric version, e.g. `"1.0.2"` or `"v2.1"`.
///
/// One leading non-digit marker byte (commonly `v`) is ignored. A version
/// is valid only if every dot-separated component is a non-empty sequence
/// of ASCII digits that fits in a `u64`.
#[derive(Debug, Clone)]
pub struct Version {
	components: Vec<u64>,
	valid: bool,
}

impl Version {
	/// Parses a version string. Never fails; see [`Version::is_valid`].
	pub fn parse(input: &str) -> Self {
		let rest = match input.chars().next() {
			Some(c) if !c.is_ascii_digit() => &input[c.len_utf8()..],
			_ => input,
		};

		let mut components = Vec::new();
		for part in rest.split('.') {
			if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
				return Self::invalid();
			}
			match part.parse::<u64>() {
				Ok(n) => components.push(n),
				Err(_) => return Self::invalid(),
			}
		}

		if components.is_empty() {
			return Self::invalid();
		}

		Self {
			components,
			valid: true,
		}
	}

	/// Compares two version strings in one call.
	pub fn compare(a: &str, b: &str) -> Ordering {
		Self::parse(a).cmp(&Self::parse(b))
	}

	/// Returns true if the input parsed as a well-formed version.
	pub fn is_valid(&self) -> bool {
		self.valid
	}

	fn invalid() -> Self {
		Self {
			components: Vec::new(),
			valid: false,
		}
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> Ordering {
		match (self.valid, other.valid) {
			(false, false) => Ordering::Equal,
			(false, true) => Ordering::Less,
			(true, false) => Ordering::Greater,
			(true, true) => {
				let len = self.components.len().max(other.components.len());
				for i in 0..len {
					// Missing trailing components count as zero, so "1.0" == "1.0.0".
					let ours = self.components.get(i).copied().unwrap_or(0);
					let theirs = other.components.get(i).copied().unwrap_or(0);
					match ours.cmp(&theirs) {
						Ordering::Equal => continue,
						unequal => return unequal,
					}
				}
				Ordering::Equal
			}
		}
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

// All invalid versions are indistinguishable, so equality must follow the
// ordering rather than the parsed contents.
impl PartialEq for Version {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Version {}

impl std::fmt::Display for Version {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if !self.valid {
			return write!(f, "<invalid>");
		}
		for (i, component) in self.components.iter().enumerate() {
			if i > 0 {
				write!(f, ".")?;
			}
			write!(f, "{}", component)?;
		}
		Ok(())
	}
}
