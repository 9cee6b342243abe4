//! Domain types and models

mod card;
mod sheet;

pub use card::{Card, TypeGroup, ManaColor, group_by_type};
pub use sheet::{
    CardImage, SheetSlot, SlotSide, PaperPreset, SheetConfig,
    CARD_WIDTH_MM, CARD_HEIGHT_MM, SHEET_COLS, SHEET_ROWS, CARDS_PER_PAGE,
};
