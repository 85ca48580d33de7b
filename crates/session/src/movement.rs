use crate::error::SessionError;

/// Number of displacement components (x, y, z).
pub const DISPLACEMENT_AXES: usize = 3;

/// How a mass move of the checked elements is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveSettings {
	/// Copy the elements and move the copies, leaving the originals.
	pub copy_and_shift: bool,
	displacement: [i32; DISPLACEMENT_AXES],
}

impl MoveSettings {
	pub fn displacement(&self) -> [i32; DISPLACEMENT_AXES] {
		self.displacement
	}

	/// Sets the displacement from host-supplied components.
	///
	/// # Errors
	///
	/// [`SessionError::MalformedInput`] unless exactly three components are
	/// given; the previous displacement is kept.
	pub fn set_displacement(&mut self, components: &[i32]) -> Result<(), SessionError> {
		self.displacement = components.try_into().map_err(|_| SessionError::MalformedInput {
			expected: DISPLACEMENT_AXES,
			actual: components.len(),
		})?;
		Ok(())
	}

	/// Returns true if applying these settings would do nothing.
	pub fn is_noop(&self) -> bool {
		!self.copy_and_shift && self.displacement == [0; DISPLACEMENT_AXES]
	}
}
