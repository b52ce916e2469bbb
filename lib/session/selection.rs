use crate::chess::Square;
use test_strategy::Arbitrary;

/// The squares currently selected on the board.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash, Arbitrary)]
pub enum Selection {
    /// No square is selected.
    #[default]
    Empty,

    /// A [`Square`] is selected along with the destinations reachable from it.
    Selected(Square, Vec<Square>),
}

impl Selection {
    /// The selected [`Square`], if any.
    pub fn square(&self) -> Option<Square> {
        match self {
            Selection::Empty => None,
            Selection::Selected(s, _) => Some(*s),
        }
    }

    /// The destinations reachable from the selected [`Square`].
    pub fn destinations(&self) -> &[Square] {
        match self {
            Selection::Empty => &[],
            Selection::Selected(_, ds) => ds,
        }
    }
}
