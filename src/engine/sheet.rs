//! Print sheet layout
//!
//! Rendered card images are queued as front/back slots and laid out on a
//! 3x3 grid of 63 x 88 mm cells per page. Double-sided output interleaves
//! front and back pages, with back pages mirrored left to right so a
//! long-edge flip lines each back up behind its front.

use image::RgbaImage;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{
    CardImage, PaperPreset, SheetConfig, SheetSlot, SlotSide, CARDS_PER_PAGE, CARD_HEIGHT_MM, CARD_WIDTH_MM,
    SHEET_COLS, SHEET_ROWS,
};
use super::document::{DocumentError, DocumentSurface, PdfSurface};

pub const SINGLE_SIDED_FILE_NAME: &str = "jumpstart-sheet.pdf";
pub const DOUBLE_SIDED_FILE_NAME: &str = "jumpstart-sheet-double.pdf";
pub const ALIGNMENT_FILE_NAME: &str = "alignment-test.pdf";

const MARK_LEN: f32 = 5.0;
const MARK_GAP: f32 = 1.5;
const MARK_GRAY: u8 = 180;
const MARK_WIDTH: f32 = 0.2;

const ALIGNMENT_STROKE: f32 = 0.5;
const ALIGNMENT_LABEL_PT: f32 = 18.0;

/// Sheet rendering errors
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("The sheet has no images to print")]
    Empty,
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
    #[error("Sheet render task failed: {0}")]
    Task(String),
}

/// What a sheet render produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SheetSummary {
    pub pages: usize,
    pub images_placed: usize,
    /// Images that failed to decode and were left blank
    pub images_skipped: usize,
}

/// Ordered front/back slots for one print session
#[derive(Debug, Clone, Default)]
pub struct SheetQueue {
    slots: Vec<SheetSlot>,
    next_id: u64,
}

impl SheetQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slot; a slot with neither side is not added
    pub fn add_slot(&mut self, front: Option<CardImage>, back: Option<CardImage>) -> Option<u64> {
        if front.is_none() && back.is_none() {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.slots.push(SheetSlot { id, front, back });
        Some(id)
    }

    /// Swap two slot sides, then drop slots left empty
    ///
    /// Returns false, changing nothing, when either slot is unknown or the
    /// source and target are the same side of the same slot.
    pub fn move_card(&mut self, from_id: u64, from_side: SlotSide, to_id: u64, to_side: SlotSide) -> bool {
        if from_id == to_id && from_side == to_side {
            return false;
        }
        let (Some(from), Some(to)) = (self.index_of(from_id), self.index_of(to_id)) else {
            return false;
        };

        if from == to {
            let slot = &mut self.slots[from];
            std::mem::swap(&mut slot.front, &mut slot.back);
        } else {
            let moving = self.slots[from].side_mut(from_side).take();
            let displaced = std::mem::replace(self.slots[to].side_mut(to_side), moving);
            *self.slots[from].side_mut(from_side) = displaced;
        }

        debug!(from_id, ?from_side, to_id, ?to_side, "Moved card");
        self.prune();
        true
    }

    /// Detach one side into a new slot at the end, as that slot's front
    pub fn move_to_new_slot(&mut self, from_id: u64, side: SlotSide) -> Option<u64> {
        let index = self.index_of(from_id)?;
        let image = self.slots[index].side_mut(side).take()?;
        let id = self.add_slot(Some(image), None);
        self.prune();
        id
    }

    pub fn remove_slot(&mut self, id: u64) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.id != id);
        self.slots.len() != before
    }

    /// Remove every slot; ids keep counting up
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn slots(&self) -> &[SheetSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of images across both sides
    pub fn image_count(&self) -> usize {
        self.slots
            .iter()
            .map(|s| s.front.is_some() as usize + s.back.is_some() as usize)
            .sum()
    }

    fn index_of(&self, id: u64) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    fn prune(&mut self) {
        self.slots.retain(|s| !s.is_empty());
    }
}

/// Page grid placement in millimeters from the page's top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_x: f32,
    pub margin_y: f32,
}

impl GridLayout {
    /// Grid block centered on the page
    pub fn for_paper(paper: PaperPreset) -> Self {
        let (page_width, page_height) = paper.dimensions_mm();
        GridLayout {
            page_width,
            page_height,
            margin_x: (page_width - SHEET_COLS as f32 * CARD_WIDTH_MM) / 2.0,
            margin_y: (page_height - SHEET_ROWS as f32 * CARD_HEIGHT_MM) / 2.0,
        }
    }

    /// Same grid shifted down by `offset_mm`
    pub fn offset_y(self, offset_mm: f32) -> Self {
        GridLayout {
            margin_y: self.margin_y + offset_mm,
            ..self
        }
    }

    /// Top-left of grid position `index` (0..9, row-major)
    pub fn cell(&self, index: usize) -> (f32, f32) {
        let col = index % SHEET_COLS;
        let row = index / SHEET_COLS;
        self.at(col, row)
    }

    /// Top-left of grid position `index` with its column reflected
    pub fn mirrored_cell(&self, index: usize) -> (f32, f32) {
        let col = mirrored_col(index % SHEET_COLS);
        let row = index / SHEET_COLS;
        self.at(col, row)
    }

    fn at(&self, col: usize, row: usize) -> (f32, f32) {
        (
            self.margin_x + col as f32 * CARD_WIDTH_MM,
            self.margin_y + row as f32 * CARD_HEIGHT_MM,
        )
    }

    fn grid_right(&self) -> f32 {
        self.margin_x + SHEET_COLS as f32 * CARD_WIDTH_MM
    }

    fn grid_bottom(&self) -> f32 {
        self.margin_y + SHEET_ROWS as f32 * CARD_HEIGHT_MM
    }
}

/// Column a back image sits in, behind front column `col`
pub fn mirrored_col(col: usize) -> usize {
    SHEET_COLS - 1 - col
}

/// Output file name for a sheet render
pub fn sheet_file_name(config: &SheetConfig) -> &'static str {
    if config.duplex {
        DOUBLE_SIDED_FILE_NAME
    } else {
        SINGLE_SIDED_FILE_NAME
    }
}

/// Short ticks just outside the grid at every grid line
pub fn draw_crop_marks<D: DocumentSurface + ?Sized>(doc: &mut D, layout: &GridLayout) -> Result<(), DocumentError> {
    let top = layout.margin_y;
    let bottom = layout.grid_bottom();
    let left = layout.margin_x;
    let right = layout.grid_right();

    for col in 0..=SHEET_COLS {
        let x = left + col as f32 * CARD_WIDTH_MM;
        doc.draw_line((x, top - MARK_GAP), (x, top - MARK_GAP - MARK_LEN), MARK_WIDTH, MARK_GRAY)?;
        doc.draw_line((x, bottom + MARK_GAP), (x, bottom + MARK_GAP + MARK_LEN), MARK_WIDTH, MARK_GRAY)?;
    }
    for row in 0..=SHEET_ROWS {
        let y = top + row as f32 * CARD_HEIGHT_MM;
        doc.draw_line((left - MARK_GAP, y), (left - MARK_GAP - MARK_LEN, y), MARK_WIDTH, MARK_GRAY)?;
        doc.draw_line((right + MARK_GAP, y), (right + MARK_GAP + MARK_LEN, y), MARK_WIDTH, MARK_GRAY)?;
    }
    Ok(())
}

fn decode(card: &CardImage) -> Option<RgbaImage> {
    match image::load_from_memory(&card.raster) {
        Ok(img) => Some(img.to_rgba8()),
        Err(e) => {
            warn!(label = %card.label, error = %e, "Could not decode sheet image, leaving blank");
            None
        }
    }
}

fn place<D: DocumentSurface + ?Sized>(
    doc: &mut D,
    card: &CardImage,
    (x, y): (f32, f32),
    summary: &mut SheetSummary,
) -> Result<(), DocumentError> {
    match decode(card) {
        Some(img) => {
            doc.place_image(&img, x, y, CARD_WIDTH_MM, CARD_HEIGHT_MM)?;
            summary.images_placed += 1;
        }
        None => summary.images_skipped += 1,
    }
    Ok(())
}

/// Every image in order, fronts before backs within a slot, nine per page
pub fn render_single_sided<D: DocumentSurface + ?Sized>(
    doc: &mut D,
    slots: &[SheetSlot],
    config: &SheetConfig,
) -> Result<SheetSummary, SheetError> {
    let images: Vec<&CardImage> = slots
        .iter()
        .flat_map(|s| s.front.iter().chain(s.back.iter()))
        .collect();
    if images.is_empty() {
        return Err(SheetError::Empty);
    }

    let layout = GridLayout::for_paper(config.paper);
    let mut summary = SheetSummary::default();
    let last = images.len() - 1;

    for (i, card) in images.iter().enumerate() {
        let pos = i % CARDS_PER_PAGE;
        if pos == 0 {
            doc.add_page(layout.page_width, layout.page_height)?;
        }
        place(doc, card, layout.cell(pos), &mut summary)?;
        if config.crop_marks && (pos == CARDS_PER_PAGE - 1 || i == last) {
            draw_crop_marks(doc, &layout)?;
        }
    }

    summary.pages = doc.page_count();
    Ok(summary)
}

/// A front page then a mirrored back page for every nine slots
pub fn render_double_sided<D: DocumentSurface + ?Sized>(
    doc: &mut D,
    slots: &[SheetSlot],
    config: &SheetConfig,
) -> Result<SheetSummary, SheetError> {
    if slots.iter().all(SheetSlot::is_empty) {
        return Err(SheetError::Empty);
    }

    let front_layout = GridLayout::for_paper(config.paper);
    let back_layout = front_layout.offset_y(config.back_offset_mm);
    let mut summary = SheetSummary::default();

    for batch in slots.chunks(CARDS_PER_PAGE) {
        doc.add_page(front_layout.page_width, front_layout.page_height)?;
        for (i, slot) in batch.iter().enumerate() {
            if let Some(front) = &slot.front {
                place(doc, front, front_layout.cell(i), &mut summary)?;
            }
        }
        if config.crop_marks {
            draw_crop_marks(doc, &front_layout)?;
        }

        doc.add_page(back_layout.page_width, back_layout.page_height)?;
        for (i, slot) in batch.iter().enumerate() {
            if let Some(back) = &slot.back {
                place(doc, back, back_layout.mirrored_cell(i), &mut summary)?;
            }
        }
        if config.crop_marks {
            draw_crop_marks(doc, &back_layout)?;
        }
    }

    summary.pages = doc.page_count();
    Ok(summary)
}

/// Numbered outlines on a front page and its mirrored back page
pub fn render_alignment_test<D: DocumentSurface + ?Sized>(
    doc: &mut D,
    config: &SheetConfig,
) -> Result<SheetSummary, SheetError> {
    let front_layout = GridLayout::for_paper(config.paper);
    let back_layout = front_layout.offset_y(config.back_offset_mm);

    for (layout, suffix, mirrored) in [(front_layout, "FRONT", false), (back_layout, "BACK", true)] {
        doc.add_page(layout.page_width, layout.page_height)?;
        for i in 0..CARDS_PER_PAGE {
            let (x, y) = if mirrored { layout.mirrored_cell(i) } else { layout.cell(i) };
            doc.stroke_rect(x, y, CARD_WIDTH_MM, CARD_HEIGHT_MM, ALIGNMENT_STROKE)?;
            doc.draw_label(
                &format!("{} {}", i + 1, suffix),
                x + CARD_WIDTH_MM / 2.0,
                y + CARD_HEIGHT_MM / 2.0,
                ALIGNMENT_LABEL_PT,
            )?;
        }
        if config.crop_marks {
            draw_crop_marks(doc, &layout)?;
        }
    }

    Ok(SheetSummary {
        pages: doc.page_count(),
        ..SheetSummary::default()
    })
}

/// A finished PDF
#[derive(Debug, Clone)]
pub struct SheetPdf {
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
    pub summary: SheetSummary,
}

/// Render `slots` to a PDF, single or double sided per `config`
pub fn render_sheet_pdf(slots: &[SheetSlot], config: &SheetConfig) -> Result<SheetPdf, SheetError> {
    let file_name = sheet_file_name(config);
    let mut pdf = PdfSurface::new(file_name.trim_end_matches(".pdf"));
    let summary = if config.duplex {
        render_double_sided(&mut pdf, slots, config)?
    } else {
        render_single_sided(&mut pdf, slots, config)?
    };
    let bytes = pdf.finish()?;

    info!(
        file = file_name,
        paper = config.paper.label(),
        pages = summary.pages,
        placed = summary.images_placed,
        skipped = summary.images_skipped,
        bytes = bytes.len(),
        "Sheet PDF generated"
    );

    Ok(SheetPdf { file_name, bytes, summary })
}

/// Render the duplex alignment test page pair to a PDF
pub fn render_alignment_pdf(config: &SheetConfig) -> Result<SheetPdf, SheetError> {
    let mut pdf = PdfSurface::new("alignment-test");
    let summary = render_alignment_test(&mut pdf, config)?;
    let bytes = pdf.finish()?;

    info!(
        paper = config.paper.label(),
        back_offset_mm = config.back_offset_mm,
        bytes = bytes.len(),
        "Alignment test PDF generated"
    );

    Ok(SheetPdf {
        file_name: ALIGNMENT_FILE_NAME,
        bytes,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::document::testing::{DocOp, RecordingDocument};
    use crate::engine::encode_png;
    use image::Rgba;

    /// 1x1 PNG whose red channel identifies it
    fn card(tag: u8) -> CardImage {
        let img = RgbaImage::from_pixel(1, 1, Rgba([tag, 0, 0, 255]));
        CardImage::new(encode_png(&img).unwrap(), format!("card {}", tag))
    }

    fn queue_with(n: u8, backs: bool) -> SheetQueue {
        let mut q = SheetQueue::new();
        for i in 0..n {
            let back = if backs { Some(card(100 + i)) } else { None };
            q.add_slot(Some(card(i)), back);
        }
        q
    }

    fn tags(slot: &SheetSlot) -> (Option<u8>, Option<u8>) {
        let tag = |c: &CardImage| {
            image::load_from_memory(&c.raster).unwrap().to_rgba8().get_pixel(0, 0).0[0]
        };
        (slot.front.as_ref().map(tag), slot.back.as_ref().map(tag))
    }

    #[test]
    fn test_add_slot_ids_and_empty_rejected() {
        let mut q = SheetQueue::new();
        assert_eq!(q.add_slot(Some(card(1)), None), Some(0));
        assert_eq!(q.add_slot(None, None), None);
        assert_eq!(q.add_slot(None, Some(card(2))), Some(1));
        q.clear();
        assert_eq!(q.add_slot(Some(card(3)), None), Some(2));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_move_card_swaps_sides() {
        let mut q = queue_with(2, false);
        assert!(q.move_card(0, SlotSide::Front, 1, SlotSide::Back));
        // slot 0 is now empty and pruned
        assert_eq!(q.len(), 1);
        assert_eq!(tags(&q.slots()[0]), (Some(1), Some(0)));
    }

    #[test]
    fn test_move_card_within_slot() {
        let mut q = queue_with(1, true);
        assert!(q.move_card(0, SlotSide::Front, 0, SlotSide::Back));
        assert_eq!(tags(&q.slots()[0]), (Some(100), Some(0)));
    }

    #[test]
    fn test_move_card_noops() {
        let mut q = queue_with(2, false);
        assert!(!q.move_card(0, SlotSide::Front, 0, SlotSide::Front));
        assert!(!q.move_card(0, SlotSide::Front, 42, SlotSide::Back));
        assert_eq!(q.len(), 2);
        assert_eq!(q.image_count(), 2);
    }

    #[test]
    fn test_move_to_new_slot() {
        let mut q = queue_with(2, true);
        let id = q.move_to_new_slot(0, SlotSide::Back).unwrap();
        assert_eq!(id, 2);
        assert_eq!(q.len(), 3);
        assert_eq!(tags(&q.slots()[2]), (Some(100), None));
        assert_eq!(tags(&q.slots()[0]), (Some(0), None));

        // detaching the last image of a slot prunes it
        let mut q = queue_with(1, false);
        q.move_to_new_slot(0, SlotSide::Front).unwrap();
        assert_eq!(q.len(), 1);
        assert_eq!(q.slots()[0].id, 1);
        assert_eq!(q.move_to_new_slot(1, SlotSide::Back), None);
    }

    #[test]
    fn test_remove_slot() {
        let mut q = queue_with(3, false);
        assert!(q.remove_slot(1));
        assert!(!q.remove_slot(1));
        assert_eq!(q.slots().iter().map(|s| s.id).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_grid_centered_on_letter() {
        let layout = GridLayout::for_paper(PaperPreset::Letter);
        assert!((layout.margin_x - (215.9 - 189.0) / 2.0).abs() < 1e-4);
        assert!((layout.margin_y - (279.4 - 264.0) / 2.0).abs() < 1e-4);
        assert_eq!(layout.cell(4), (layout.margin_x + 63.0, layout.margin_y + 88.0));
    }

    #[test]
    fn test_mirrored_columns() {
        assert_eq!(mirrored_col(0), 2);
        assert_eq!(mirrored_col(2), 0);
        assert_eq!(mirrored_col(4 % 3), 1);
        let layout = GridLayout::for_paper(PaperPreset::A4);
        assert_eq!(layout.mirrored_cell(0), layout.cell(2));
        assert_eq!(layout.mirrored_cell(2), layout.cell(0));
        assert_eq!(layout.mirrored_cell(4), layout.cell(4));
        assert_eq!(layout.mirrored_cell(6), layout.cell(8));
    }

    #[test]
    fn test_single_sided_ten_slots_paginates_9_9_2() {
        let q = queue_with(10, true);
        let mut doc = RecordingDocument::new();
        let summary = render_single_sided(&mut doc, q.slots(), &SheetConfig::default()).unwrap();
        assert_eq!(summary.pages, 3);
        assert_eq!(summary.images_placed, 20);

        let pages = doc.image_tags();
        assert_eq!(pages.iter().map(Vec::len).collect::<Vec<_>>(), vec![9, 9, 2]);
        // fronts precede backs within a slot
        assert_eq!(&pages[0][..4], &[0, 100, 1, 101]);
        assert_eq!(pages[2], vec![9, 109]);
    }

    #[test]
    fn test_single_sided_crop_marks_per_page() {
        let q = queue_with(10, false);
        let config = SheetConfig { crop_marks: true, ..SheetConfig::default() };
        let mut doc = RecordingDocument::new();
        render_single_sided(&mut doc, q.slots(), &config).unwrap();
        for page in doc.pages() {
            let lines = page.iter().filter(|op| matches!(op, DocOp::Line { .. })).count();
            assert_eq!(lines, 16);
        }
    }

    #[test]
    fn test_double_sided_mirrors_and_offsets_backs() {
        let q = queue_with(5, true);
        let config = SheetConfig {
            duplex: true,
            back_offset_mm: 1.5,
            ..SheetConfig::default()
        };
        let mut doc = RecordingDocument::new();
        let summary = render_double_sided(&mut doc, q.slots(), &config).unwrap();
        assert_eq!(summary.pages, 2);

        let layout = GridLayout::for_paper(PaperPreset::Letter);
        let pages = doc.pages();
        let position = |ops: &[DocOp], tag: u8| {
            ops.iter()
                .find_map(|op| match op {
                    DocOp::Image { x, y, tag: t, .. } if *t == tag => Some((*x, *y)),
                    _ => None,
                })
                .unwrap()
        };

        assert_eq!(position(&pages[0], 0), layout.cell(0));
        let (bx, by) = position(&pages[1], 100);
        assert_eq!(bx, layout.cell(2).0);
        assert!((by - (layout.cell(0).1 + 1.5)).abs() < 1e-4);
        assert_eq!(position(&pages[1], 102).0, layout.cell(0).0);
        assert_eq!(position(&pages[1], 104).0, layout.cell(4).0);
    }

    #[test]
    fn test_double_sided_batches_of_nine() {
        let q = queue_with(10, false);
        let config = SheetConfig { duplex: true, ..SheetConfig::default() };
        let mut doc = RecordingDocument::new();
        let summary = render_double_sided(&mut doc, q.slots(), &config).unwrap();
        assert_eq!(summary.pages, 4);
        assert_eq!(doc.image_tags().iter().map(Vec::len).collect::<Vec<_>>(), vec![9, 0, 1, 0]);
    }

    #[test]
    fn test_empty_sheet_is_error() {
        let mut doc = RecordingDocument::new();
        assert!(matches!(
            render_single_sided(&mut doc, &[], &SheetConfig::default()),
            Err(SheetError::Empty)
        ));
        let duplex = SheetConfig { duplex: true, ..SheetConfig::default() };
        assert!(matches!(render_double_sided(&mut doc, &[], &duplex), Err(SheetError::Empty)));
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_undecodable_image_left_blank() {
        let mut q = SheetQueue::new();
        q.add_slot(Some(CardImage::new(vec![0u8, 1, 2], "broken")), None);
        q.add_slot(Some(card(7)), None);
        let mut doc = RecordingDocument::new();
        let summary = render_single_sided(&mut doc, q.slots(), &SheetConfig::default()).unwrap();
        assert_eq!(summary.images_placed, 1);
        assert_eq!(summary.images_skipped, 1);
        // the good image keeps its own grid position
        let layout = GridLayout::for_paper(PaperPreset::Letter);
        assert!(doc.ops.contains(&DocOp::Image {
            x: layout.cell(1).0,
            y: layout.cell(1).1,
            w: CARD_WIDTH_MM,
            h: CARD_HEIGHT_MM,
            tag: 7,
        }));
    }

    #[test]
    fn test_crop_mark_geometry() {
        let layout = GridLayout::for_paper(PaperPreset::Letter);
        let mut doc = RecordingDocument::new();
        doc.add_page(layout.page_width, layout.page_height).unwrap();
        draw_crop_marks(&mut doc, &layout).unwrap();
        let first = doc.ops.iter().find(|op| matches!(op, DocOp::Line { .. })).unwrap();
        assert_eq!(
            first,
            &DocOp::Line {
                from: (layout.margin_x, layout.margin_y - MARK_GAP),
                to: (layout.margin_x, layout.margin_y - MARK_GAP - MARK_LEN),
            }
        );
    }

    #[test]
    fn test_alignment_labels() {
        let mut doc = RecordingDocument::new();
        let config = SheetConfig { back_offset_mm: -1.0, ..SheetConfig::default() };
        let summary = render_alignment_test(&mut doc, &config).unwrap();
        assert_eq!(summary.pages, 2);

        let layout = GridLayout::for_paper(PaperPreset::Letter);
        let pages = doc.pages();
        assert!(pages[0].contains(&DocOp::Label {
            text: "1 FRONT".into(),
            cx: layout.cell(0).0 + CARD_WIDTH_MM / 2.0,
            cy: layout.cell(0).1 + CARD_HEIGHT_MM / 2.0,
            size_pt: 18.0,
        }));
        assert!(pages[0].contains(&DocOp::Rect {
            x: layout.cell(0).0,
            y: layout.cell(0).1,
            w: CARD_WIDTH_MM,
            h: CARD_HEIGHT_MM,
            width: 0.5,
        }));
        let back = layout.offset_y(-1.0);
        assert!(pages[1].contains(&DocOp::Label {
            text: "1 BACK".into(),
            cx: back.cell(2).0 + CARD_WIDTH_MM / 2.0,
            cy: back.cell(2).1 + CARD_HEIGHT_MM / 2.0,
            size_pt: 18.0,
        }));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(sheet_file_name(&SheetConfig::default()), "jumpstart-sheet.pdf");
        let duplex = SheetConfig { duplex: true, ..SheetConfig::default() };
        assert_eq!(sheet_file_name(&duplex), "jumpstart-sheet-double.pdf");
    }
}
