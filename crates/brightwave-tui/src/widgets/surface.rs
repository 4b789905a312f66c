//! Drawing helpers for content that moves: text at signed offsets and
//! off-screen buffers copied into the frame with clipping.

use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use unicode_width::UnicodeWidthChar;

/// Write `text` starting at signed column `x`, row `y` (relative to the
/// buffer's area), dropping everything outside it. Returns the column after
/// the last character.
pub fn put_str(buf: &mut Buffer, x: i32, y: i32, text: &str, style: Style) -> i32 {
    let area = buf.area;
    let mut col = x;
    for ch in text.chars() {
        let width = ch.width().unwrap_or(0) as i32;
        if width == 0 {
            continue;
        }
        if y >= 0 && y < area.height as i32 && col >= 0 && col + width <= area.width as i32 {
            let pos = (area.x + col as u16, area.y + y as u16);
            if let Some(cell) = buf.cell_mut(pos) {
                let mut tmp = [0u8; 4];
                cell.set_symbol(ch.encode_utf8(&mut tmp)).set_style(style);
            }
            if width == 2 {
                if let Some(cell) = buf.cell_mut((pos.0 + 1, pos.1)) {
                    cell.set_symbol("");
                }
            }
        }
        col += width;
    }
    col
}

/// Display width of `text` in columns
pub fn text_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Column at which `text` is centered within `width`
pub fn centered(text: &str, width: u16) -> i32 {
    (width as i32 - text_width(text) as i32) / 2
}

/// Copy `src` into `dst`'s `area`, shifted by (`dx`, `dy`) relative to the
/// top-left corner of `area`. Cells falling outside `area` are clipped.
pub fn blit(dst: &mut Buffer, area: Rect, src: &Buffer, dx: i32, dy: i32) {
    let src_area = src.area;
    for sy in 0..src_area.height {
        let ty = dy + sy as i32;
        if ty < 0 || ty >= area.height as i32 {
            continue;
        }
        for sx in 0..src_area.width {
            let tx = dx + sx as i32;
            if tx < 0 || tx >= area.width as i32 {
                continue;
            }
            let Some(cell) = src.cell((src_area.x + sx, src_area.y + sy)) else {
                continue;
            };
            if let Some(target) = dst.cell_mut((area.x + tx as u16, area.y + ty as u16)) {
                *target = cell.clone();
            }
        }
    }
}

/// A blank off-screen buffer filled with `style`
pub fn canvas(width: u16, height: u16, style: Style) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    buf.set_style(area, style);
    buf
}

/// Text of one buffer row, for tests and headless previews
pub fn row_text(buf: &Buffer, y: u16) -> String {
    let area = buf.area;
    (0..area.width)
        .filter_map(|x| buf.cell((area.x + x, area.y + y)))
        .map(|c| c.symbol())
        .collect()
}
