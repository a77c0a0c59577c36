//! Generation date and page numbers, drawn once the page count is final

use crate::assembler::PageAssembler;
use crate::date::DateTime;
use crate::errors::InvariantViolation;
use crate::font::BuiltinFont;
use crate::graphics::{Point, Rect, Rgb};
use crate::ops::Op;
use crate::options::PacketOptions;
use crate::page::PageHandle;

const FOOTER_GREY: f32 = 0.5;

/// `Page i of N`
pub fn page_label(page: PageHandle, total: usize) -> String {
    format!("Page {} of {}", page.number(), total)
}

/// `Generated on: MM/DD/YYYY`
pub fn generated_label(date: &DateTime) -> String {
    format!("Generated on: {}", date.short_date())
}

/// Footer of one page: the date on the left, the page number right aligned
pub fn footer_ops(options: &PacketOptions, media_box: Rect, page: PageHandle, total: usize, date: &DateTime) -> Vec<Op> {
    let font = BuiltinFont::Helvetica;
    let size = options.footer_font_size;
    let baseline = media_box.y + options.footer_baseline;

    let label = page_label(page, total);
    let label_x = media_box.right() - options.margin_left - font.text_width(&label, size);

    let mut ops = vec![
        Op::SaveGraphicsState,
        Op::SetFillColor { col: Rgb::grey(FOOTER_GREY) },
    ];
    ops.extend(Op::text_line(
        &generated_label(date),
        font,
        size,
        Point::new(media_box.x + options.margin_left, baseline),
    ));
    ops.extend(Op::text_line(&label, font, size, Point::new(label_x, baseline)));
    ops.push(Op::RestoreGraphicsState);
    ops
}

/// Stamps every page of the packet. Fails if the content pass is still
/// running or the footers were already drawn.
pub fn stamp_footers(assembler: &mut PageAssembler, date: &DateTime) -> Result<usize, InvariantViolation> {
    let options = assembler.options().clone();
    assembler.stamp_footers(|page, media_box, total| footer_ops(&options, media_box, page, total, date))?;
    Ok(assembler.page_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_flow::FlowEvent;
    use crate::units::Pt;

    fn date() -> DateTime {
        DateTime::new(2026, 10, 18, 0, 0, 0).unwrap()
    }

    fn texts(ops: &[Op]) -> Vec<&str> {
        ops.iter()
            .filter_map(|op| match op {
                Op::ShowText { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn labels() {
        assert_eq!(page_label(PageHandle(0), 3), "Page 1 of 3");
        assert_eq!(generated_label(&date()), "Generated on: 10/18/2026");
    }

    #[test]
    fn page_number_is_right_aligned() {
        let options = PacketOptions::default();
        let ops = footer_ops(&options, options.page_rect(), PageHandle(1), 2, &date());
        assert_eq!(texts(&ops), vec!["Generated on: 10/18/2026", "Page 2 of 2"]);
        let cursors: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                Op::SetTextCursor { pos } => Some(*pos),
                _ => None,
            })
            .collect();
        assert_eq!(cursors[0], Point::new(Pt(50.0), Pt(30.0)));
        let width = BuiltinFont::Helvetica.text_width("Page 2 of 2", Pt(10.0));
        assert_eq!(cursors[1].x + width, Pt(545.0));
        assert_eq!(ops.first(), Some(&Op::SaveGraphicsState));
        assert_eq!(ops.last(), Some(&Op::RestoreGraphicsState));
    }

    #[test]
    fn footer_follows_the_media_box() {
        let options = PacketOptions::default();
        let media_box = Rect { x: Pt(10.0), y: Pt(20.0), width: Pt(300.0), height: Pt(400.0) };
        let ops = footer_ops(&options, media_box, PageHandle(0), 1, &date());
        match &ops[4] {
            Op::SetTextCursor { pos } => assert_eq!(*pos, Point::new(Pt(60.0), Pt(50.0))),
            other => panic!("expected cursor, got {other:?}"),
        }
    }

    #[test]
    fn stamping_runs_exactly_once() {
        let mut asm = PageAssembler::new(&PacketOptions::default());
        for _ in 0..3 {
            asm.append_text_block(Vec::<FlowEvent>::new()).unwrap();
        }
        assert_eq!(stamp_footers(&mut asm, &date()), Err(InvariantViolation::StampingBeforeAssembly));
        asm.begin_backfill().unwrap();

        let before = asm.page_count();
        assert_eq!(stamp_footers(&mut asm, &date()).unwrap(), before);
        for (i, page) in asm.page_handles().enumerate() {
            let footer = asm.footer(page).unwrap();
            assert_eq!(texts(footer)[1], format!("Page {} of 3", i + 1));
        }
        assert_eq!(stamp_footers(&mut asm, &date()), Err(InvariantViolation::FooterAlreadyStamped));
        assert_eq!(asm.page_count(), before);
    }
}
