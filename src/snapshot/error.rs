/* src/snapshot/error.rs */

#[derive(Debug, Clone, thiserror::Error)]
pub enum SnapshotError {
	/// The envelope is not syntactically valid JSON.
	#[error("invalid envelope: {0}")]
	Parse(String),

	/// The envelope parsed, but is not a JSON object.
	#[error("envelope is not a JSON object")]
	NotAnObject,

	/// The envelope carries no version field.
	#[error("envelope is missing a version")]
	MissingVersion,
}
