//! Packing list renderer
//!
//! Lays a grouped decklist out on a card-sized canvas. Every vertical
//! measurement is a base size multiplied by one of eleven scale steps
//! (1.0x to 2.0x); the largest step whose projected height still clears the
//! footer wins. Content that does not fit even at 1.0x is cut off and
//! reported through [`PackingOutcome::overflow`].

use tracing::debug;

use crate::domain::TypeGroup;
use super::fonts::{FontFace, FontSpec};
use super::surface::{hex, Rect, Surface, TextAlign, TextStyle};
use super::symbols::{parse_mana_cost, SymbolMap};
use super::text::truncate_text;
use super::{BORDER, CARD_HEIGHT, CARD_WIDTH};

/// Highest step on the scale ladder (step n means 1.0 + n * 0.1)
pub const MAX_SIZE_OFFSET: u32 = 10;

// Unscaled layout, in pixels
const CONTENT_PAD: f32 = 28.0;
const TITLE_SIZE: f32 = 34.0;
const TITLE_BASELINE: f32 = 52.0;
const TITLE_RULE_GAP: f32 = 16.0;
const FIRST_GROUP_GAP: f32 = 36.0;
const FOOTER_MARGIN: f32 = 40.0;
const CELL_PAD: f32 = 14.0;
const NAME_SYM_GAP: f32 = 6.0;

// Base sizes, multiplied by the chosen scale
const BASE_ROW_H: f32 = 30.0;
const BASE_BODY_SIZE: f32 = 22.0;
const BASE_HEADING_SIZE: f32 = 28.0;
const BASE_HEADING_GAP: f32 = 10.0;
const BASE_UNDERLINE_GAP: f32 = 22.0;
const BASE_GROUP_GAP: f32 = 12.0;
const BASE_ROW_PAD: f32 = 8.0;
const BASE_SYM_PAD: f32 = 3.0;
const BASE_SYM_SIZE: f32 = 18.0;

const COLOR_TITLE: u32 = 0x222222;
const COLOR_RULE: u32 = 0x333333;
const COLOR_HEADING: u32 = 0xe83411;
const COLOR_TEXT: u32 = 0x43484f;
const COLOR_ROW_EVEN: u32 = 0xecf1f6;
const COLOR_ROW_ODD: u32 = 0xffffff;

/// Lowest y a row or heading may start at
const FOOTER_ZONE: f32 = CARD_HEIGHT as f32 - BORDER - FOOTER_MARGIN;

/// Result of a packing list render
#[must_use = "callers must surface the overflow flag"]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackingOutcome {
    /// Some content did not fit and was left off the card
    pub overflow: bool,
    /// Chosen ladder step, 0..=10
    pub size_offset: u32,
}

impl PackingOutcome {
    pub fn scale(&self) -> f32 {
        scale_for_offset(self.size_offset)
    }
}

/// Options for a packing list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackingOptions {
    pub show_title: bool,
}

impl Default for PackingOptions {
    fn default() -> Self {
        PackingOptions { show_title: true }
    }
}

pub fn scale_for_offset(offset: u32) -> f32 {
    1.0 + offset as f32 * 0.1
}

/// Base size scaled and rounded to whole pixels
fn scaled(base: f32, scale: f32) -> f32 {
    (base * scale).round()
}

/// Pixel sizes for one ladder step
#[derive(Debug, Clone, Copy)]
struct Metrics {
    row_h: f32,
    body_size: f32,
    heading_size: f32,
    sym_size: f32,
    heading_gap: f32,
    underline_gap: f32,
    group_gap: f32,
    row_pad: f32,
    sym_pad: f32,
    first_gap: f32,
}

impl Metrics {
    fn at(scale: f32) -> Self {
        Metrics {
            row_h: scaled(BASE_ROW_H, scale),
            body_size: scaled(BASE_BODY_SIZE, scale),
            heading_size: scaled(BASE_HEADING_SIZE, scale),
            sym_size: scaled(BASE_SYM_SIZE, scale),
            heading_gap: scaled(BASE_HEADING_GAP, scale),
            underline_gap: scaled(BASE_UNDERLINE_GAP, scale),
            group_gap: scaled(BASE_GROUP_GAP, scale),
            row_pad: scaled(BASE_ROW_PAD, scale),
            sym_pad: scaled(BASE_SYM_PAD, scale),
            first_gap: scaled(FIRST_GROUP_GAP, scale),
        }
    }

    fn group_overhead(&self) -> f32 {
        self.heading_gap + self.underline_gap + self.group_gap
    }
}

/// Y of the first content line before the first-group gap
fn header_offset(show_title: bool) -> f32 {
    if show_title {
        BORDER + TITLE_BASELINE + TITLE_RULE_GAP
    } else {
        BORDER + CONTENT_PAD
    }
}

/// Pick the largest ladder step at which every group and row fits
///
/// Falls back to step 0 when nothing fits; the render then overflows.
pub fn best_size_offset(groups: &[TypeGroup], options: PackingOptions) -> u32 {
    let total_groups = groups.len() as f32;
    let total_cards: usize = groups.iter().map(|g| g.cards.len()).sum();
    let fixed_y = header_offset(options.show_title);

    for offset in (0..=MAX_SIZE_OFFSET).rev() {
        let m = Metrics::at(scale_for_offset(offset));
        let projected = fixed_y + m.first_gap + total_groups * m.group_overhead() + total_cards as f32 * m.row_h;
        if projected <= FOOTER_ZONE {
            return offset;
        }
    }
    0
}

/// Draw the packing list for `groups` onto `surface`
///
/// `symbols` must already hold the icons for every mana cost in `groups`;
/// keys that are missing or `None` are skipped. Stops at the footer and
/// keeps whatever was already drawn.
pub fn render_packing_list<S: Surface + ?Sized>(
    surface: &mut S,
    groups: &[TypeGroup],
    title: &str,
    symbols: &SymbolMap,
    options: PackingOptions,
) -> PackingOutcome {
    let size_offset = best_size_offset(groups, options);
    let m = Metrics::at(scale_for_offset(size_offset));

    let card_w = CARD_WIDTH as f32;
    let card_h = CARD_HEIGHT as f32;
    let inner_w = card_w - BORDER * 2.0;
    let margin_x = BORDER + CONTENT_PAD;
    let max_x = card_w - BORDER - CONTENT_PAD;

    surface.fill_rect(Rect::new(0.0, 0.0, card_w, card_h), hex(0x000000));
    surface.fill_rect(Rect::new(BORDER, BORDER, inner_w, card_h - BORDER * 2.0), hex(0xffffff));

    let mut y;
    if options.show_title {
        y = BORDER + TITLE_BASELINE;
        let font = FontSpec::new(FontFace::HeadingBold, TITLE_SIZE);
        let title = truncate_text(surface, &title.to_uppercase(), font, inner_w - CONTENT_PAD * 2.0);
        surface.draw_text(
            &title,
            card_w / 2.0,
            y,
            TextStyle::new(font, hex(COLOR_TITLE)).align(TextAlign::Center),
        );
        y += TITLE_RULE_GAP;
        surface.draw_line((margin_x, y), (max_x, y), 2.0, hex(COLOR_RULE));
        y += m.first_gap;
    } else {
        y = BORDER + CONTENT_PAD + m.first_gap;
    }

    let mut overflow = false;
    'groups: for group in groups {
        if y > FOOTER_ZONE {
            overflow = true;
            break;
        }

        let heading_font = FontSpec::new(FontFace::HeadingBold, m.heading_size);
        let heading = format!("{} ({})", group.type_name.to_uppercase(), group.total_qty());
        surface.draw_text(&heading, margin_x, y, TextStyle::new(heading_font, hex(COLOR_HEADING)));
        y += m.heading_gap;

        surface.draw_line((margin_x, y), (max_x, y), 1.0, hex(COLOR_HEADING));
        y += m.underline_gap;

        for (row_index, card) in group.cards.iter().enumerate() {
            if y > FOOTER_ZONE {
                overflow = true;
                break 'groups;
            }

            let row_bg = if row_index % 2 == 0 { COLOR_ROW_EVEN } else { COLOR_ROW_ODD };
            surface.fill_rect(
                Rect::new(margin_x, y - m.row_h + m.row_pad, max_x - margin_x, m.row_h),
                hex(row_bg),
            );

            let costs = parse_mana_cost(&card.mana_cost);
            let symbols_w = if costs.is_empty() {
                0.0
            } else {
                costs.len() as f32 * (m.sym_size + m.sym_pad) - m.sym_pad
            };

            let qty_font = FontSpec::new(FontFace::BodyBold, m.body_size);
            let qty = format!("{} ", card.qty);
            surface.draw_text(&qty, margin_x + CELL_PAD, y, text_style(qty_font));
            let qty_w = surface.measure_text_width(&qty, qty_font);

            let name_font = FontSpec::new(FontFace::Body, m.body_size);
            let name_x = margin_x + CELL_PAD + qty_w;
            let sym_gap = if symbols_w > 0.0 { NAME_SYM_GAP } else { 0.0 };
            let name_max_w = max_x - CELL_PAD - name_x - symbols_w - sym_gap;
            let name = truncate_text(surface, &card.name, name_font, name_max_w);
            surface.draw_text(&name, name_x, y, text_style(name_font));

            let mut sym_x = max_x - CELL_PAD - symbols_w;
            for key in &costs {
                if let Some(Some(icon)) = symbols.get(key) {
                    let (iw, ih) = icon.dimensions();
                    surface.draw_image(
                        icon,
                        Rect::new(0.0, 0.0, iw as f32, ih as f32),
                        Rect::new(sym_x, y - m.sym_size + m.sym_pad, m.sym_size, m.sym_size),
                    );
                }
                sym_x += m.sym_size + m.sym_pad;
            }

            y += m.row_h;
        }

        y += m.group_gap;
    }

    debug!(
        groups = groups.len(),
        size_offset = size_offset,
        overflow = overflow,
        "Rendered packing list"
    );

    PackingOutcome { overflow, size_offset }
}

fn text_style(font: FontSpec) -> TextStyle {
    TextStyle::new(font, hex(COLOR_TEXT))
}
