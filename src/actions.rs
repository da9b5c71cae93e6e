//! User and host actions.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Printable character typed into the query.
    Char(char),
    Backspace,
    ClearQuery,

    PaletteShow,
    PaletteHide,
    PaletteUp,
    PaletteDown,
    PaletteSelect,
}
