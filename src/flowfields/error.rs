//! Errors raised while constructing a grid, its fields or the crowd settings. Once constructed every
//! per-step operation is total and never produces an error
//!

use std::fmt;

/// Invalid configuration discovered at construction or load time
#[derive(Debug)]
pub enum ConfigurationError {
	/// A grid needs at least one column and one row
	InvalidGridSize {
		/// Requested number of columns
		width: usize,
		/// Requested number of rows
		height: usize,
	},
	/// The world size of a cell must be finite and positive
	InvalidCellDiameter(f32),
	/// Congestion damping divides speed so must be finite and at least `1.0`
	InvalidCongestionDamping(f32),
	/// The base speed range must be finite, non-negative and `min <= max`
	InvalidSpeedRange {
		/// Lower bound of the range
		min: f32,
		/// Upper bound of the range
		max: f32,
	},
	/// The interval between goal changes must be finite and positive
	InvalidGoalInterval(f32),
	/// A loaded field does not match the dimensions of the grid
	FieldShape {
		/// `(columns, rows)` of the grid
		expected: (usize, usize),
		/// `(columns, rows)` found in the source
		found: (usize, usize),
	},
	/// A cost value could not be read as an 8-bit cost or was `0`
	InvalidCost {
		/// Column of the offending value
		column: usize,
		/// Row of the offending value
		row: usize,
		/// The raw text that failed to parse
		value: String,
	},
	/// Reading a file from disk failed
	Io(std::io::Error),
	/// Deserializing a `ron` file failed
	#[cfg(feature = "ron")]
	Ron(ron::error::SpannedError),
	/// Reading a CSV record failed
	#[cfg(feature = "csv")]
	Csv(csv::Error),
	/// Opening a heightmap image failed
	#[cfg(feature = "heightmap")]
	Heightmap(String),
}

impl fmt::Display for ConfigurationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigurationError::InvalidGridSize { width, height } => write!(
				f,
				"Grid dimensions `({}, {})` are invalid, a grid needs at least one column and one row",
				width, height
			),
			ConfigurationError::InvalidCellDiameter(d) => {
				write!(f, "Cell diameter {} is invalid, it must be finite and greater than 0", d)
			}
			ConfigurationError::InvalidCongestionDamping(d) => write!(
				f,
				"Congestion damping {} is invalid, it must be finite and at least 1.0",
				d
			),
			ConfigurationError::InvalidSpeedRange { min, max } => write!(
				f,
				"Base speed range `({}, {})` is invalid, bounds must be finite, non-negative and min <= max",
				min, max
			),
			ConfigurationError::InvalidGoalInterval(i) => write!(
				f,
				"Goal interval {} is invalid, it must be finite and greater than 0",
				i
			),
			ConfigurationError::FieldShape { expected, found } => write!(
				f,
				"Field has dimensions {:?} but the grid expects {:?}",
				found, expected
			),
			ConfigurationError::InvalidCost { column, row, value } => write!(
				f,
				"Cost `{}` at column {}, row {} is not a value in 1-255",
				value, column, row
			),
			ConfigurationError::Io(e) => write!(f, "Failed reading file: {}", e),
			#[cfg(feature = "ron")]
			ConfigurationError::Ron(e) => write!(f, "Failed deserializing ron: {}", e),
			#[cfg(feature = "csv")]
			ConfigurationError::Csv(e) => write!(f, "Failed reading csv: {}", e),
			#[cfg(feature = "heightmap")]
			ConfigurationError::Heightmap(e) => write!(f, "Failed opening heightmap: {}", e),
		}
	}
}

impl std::error::Error for ConfigurationError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			ConfigurationError::Io(e) => Some(e),
			#[cfg(feature = "ron")]
			ConfigurationError::Ron(e) => Some(e),
			#[cfg(feature = "csv")]
			ConfigurationError::Csv(e) => Some(e),
			_ => None,
		}
	}
}

impl From<std::io::Error> for ConfigurationError {
	fn from(e: std::io::Error) -> Self {
		ConfigurationError::Io(e)
	}
}

#[cfg(feature = "ron")]
impl From<ron::error::SpannedError> for ConfigurationError {
	fn from(e: ron::error::SpannedError) -> Self {
		ConfigurationError::Ron(e)
	}
}

#[cfg(feature = "csv")]
impl From<csv::Error> for ConfigurationError {
	fn from(e: csv::Error) -> Self {
		ConfigurationError::Csv(e)
	}
}
