//! Backend-neutral page layout.
//!
//! A [`Document`] is a list of A4 pages holding positioned text runs and
//! ruled lines. Coordinates are millimetres measured from the top-left
//! corner. Text width is estimated with a fixed average glyph width, which
//! is close enough for Helvetica at the sizes used here.

/// A4 short edge in millimetres.
pub const A4_SHORT_MM: f32 = 210.0;
/// A4 long edge in millimetres.
pub const A4_LONG_MM: f32 = 297.0;

const MARGIN_MM: f32 = 14.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH_EM: f32 = 0.5;
const LINE_SPACING: f32 = 1.25;
const CELL_PAD_MM: f32 = 1.5;

pub const BODY_PT: f32 = 10.0;
pub const TABLE_PT: f32 = 8.0;
pub const HEADING_PT: f32 = 14.0;
pub const TITLE_PT: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Page `(width, height)` in millimetres.
    pub fn size_mm(&self) -> (f32, f32) {
        match self {
            Self::Portrait => (A4_SHORT_MM, A4_LONG_MM),
            Self::Landscape => (A4_LONG_MM, A4_SHORT_MM),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

/// One line of text. `y_mm` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x_mm: f32,
    pub y_mm: f32,
    pub size_pt: f32,
    pub font: Font,
    pub text: String,
}

/// A straight ruled line.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub from: (f32, f32),
    pub to: (f32, f32),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub runs: Vec<TextRun>,
    pub rules: Vec<Rule>,
}

impl Page {
    /// All text on the page, one run per line.
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub orientation: Orientation,
    pub pages: Vec<Page>,
}

impl Document {
    /// All text in the document, pages separated by a form feed.
    pub fn text(&self) -> String {
        self.pages
            .iter()
            .map(Page::text)
            .collect::<Vec<_>>()
            .join("\n\x0c\n")
    }
}

// ---------------------------------------------------------------------------
// Text measurement
// ---------------------------------------------------------------------------

fn line_height_mm(size_pt: f32) -> f32 {
    size_pt * PT_TO_MM * LINE_SPACING
}

/// Estimated rendered width of `text` in millimetres.
pub fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * PT_TO_MM * GLYPH_WIDTH_EM
}

/// Characters that fit in `width_mm` at `size_pt`. Never less than one.
fn chars_per_line(width_mm: f32, size_pt: f32) -> usize {
    let glyph = size_pt * PT_TO_MM * GLYPH_WIDTH_EM;
    ((width_mm / glyph).floor() as usize).max(1)
}

/// Greedy word wrap to at most `max_chars` per line.
///
/// Explicit newlines are kept. Words longer than a line are hard-split.
/// Empty input yields no lines.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();

            // Hard-split words that cannot fit on any line.
            while chars.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = chars.split_off(max_chars);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }

            let len = chars.len();
            if len == 0 {
                continue;
            }
            let needed = if current_len == 0 { len } else { current_len + 1 + len };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(chars);
            current_len += len;
        }

        if current_len > 0 {
            lines.push(current);
        }
    }
    lines
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// A table column: header text and share of the content width.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    pub weight: f32,
}

pub const fn col(title: &'static str, weight: f32) -> Column {
    Column { title, weight }
}

/// Flowing layout cursor that starts new pages as content overflows.
#[derive(Debug)]
pub struct LayoutBuilder {
    title: String,
    orientation: Orientation,
    width: f32,
    height: f32,
    pages: Vec<Page>,
    y: f32,
}

impl LayoutBuilder {
    pub fn new(title: impl Into<String>, orientation: Orientation) -> Self {
        let (width, height) = orientation.size_mm();
        Self {
            title: title.into(),
            orientation,
            width,
            height,
            pages: vec![Page::default()],
            y: MARGIN_MM,
        }
    }

    fn content_width(&self) -> f32 {
        self.width - 2.0 * MARGIN_MM
    }

    fn bottom(&self) -> f32 {
        self.height - MARGIN_MM
    }

    fn page(&mut self) -> &mut Page {
        // `pages` starts non-empty and only grows.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn push_run(&mut self, x_mm: f32, y_mm: f32, size_pt: f32, font: Font, text: String) {
        self.page().runs.push(TextRun {
            x_mm,
            y_mm,
            size_pt,
            font,
            text,
        });
    }

    fn push_rule(&mut self, from: (f32, f32), to: (f32, f32)) {
        self.page().rules.push(Rule { from, to });
    }

    /// Start a new page unless the current one is still empty.
    pub fn page_break(&mut self) {
        let current = &self.pages[self.pages.len() - 1];
        if current.runs.is_empty() && current.rules.is_empty() {
            return;
        }
        self.pages.push(Page::default());
        self.y = MARGIN_MM;
    }

    fn ensure_room(&mut self, height: f32) {
        if self.y + height > self.bottom() {
            self.page_break();
        }
    }

    pub fn space(&mut self, mm: f32) {
        self.y += mm;
    }

    /// Wrapped text at `indent` millimetres from the left margin.
    fn text_at(&mut self, indent: f32, text: &str, size_pt: f32, font: Font) {
        let line_h = line_height_mm(size_pt);
        let lines = wrap(text, chars_per_line(self.content_width() - indent, size_pt));
        for line in lines {
            self.ensure_room(line_h);
            self.y += line_h;
            let y = self.y;
            self.push_run(MARGIN_MM + indent, y, size_pt, font, line);
        }
    }

    pub fn paragraph(&mut self, text: &str) {
        self.text_at(0.0, text, BODY_PT, Font::Regular);
        self.space(1.5);
    }

    pub fn heading(&mut self, text: &str) {
        self.space(2.0);
        // Keep a heading together with at least two body lines.
        self.ensure_room(line_height_mm(HEADING_PT) + 2.0 * line_height_mm(BODY_PT));
        self.text_at(0.0, text, HEADING_PT, Font::Bold);
        self.space(1.0);
    }

    /// Bold line centred across the page.
    pub fn title(&mut self, text: &str, size_pt: f32) {
        let line_h = line_height_mm(size_pt);
        for line in wrap(text, chars_per_line(self.content_width(), size_pt)) {
            self.ensure_room(line_h);
            self.y += line_h;
            let x = ((self.width - text_width_mm(&line, size_pt)) / 2.0).max(MARGIN_MM);
            let y = self.y;
            self.push_run(x, y, size_pt, Font::Bold, line);
        }
        self.space(2.0);
    }

    /// `label: value` line with a bold label.
    pub fn field(&mut self, label: &str, value: &str) {
        let line_h = line_height_mm(BODY_PT);
        let label = format!("{label}:");
        let indent = text_width_mm(&label, BODY_PT) + 2.0;
        let lines = wrap(value, chars_per_line(self.content_width() - indent, BODY_PT));
        self.ensure_room(line_h);
        self.y += line_h;
        let y = self.y;
        self.push_run(MARGIN_MM, y, BODY_PT, Font::Bold, label);
        let mut lines = lines.into_iter();
        if let Some(first) = lines.next() {
            self.push_run(MARGIN_MM + indent, y, BODY_PT, Font::Regular, first);
        }
        for line in lines {
            self.ensure_room(line_h);
            self.y += line_h;
            let y = self.y;
            self.push_run(MARGIN_MM + indent, y, BODY_PT, Font::Regular, line);
        }
    }

    pub fn bullets<S: AsRef<str>>(&mut self, items: &[S]) {
        for item in items {
            self.marked_item("-", item.as_ref());
        }
        self.space(1.5);
    }

    pub fn numbered<S: AsRef<str>>(&mut self, items: &[S]) {
        for (i, item) in items.iter().enumerate() {
            self.marked_item(&format!("{}.", i + 1), item.as_ref());
        }
        self.space(1.5);
    }

    /// One list item: `marker` in the gutter, text wrapped beside it.
    pub fn marked_item(&mut self, marker: &str, text: &str) {
        let line_h = line_height_mm(BODY_PT);
        let indent = 7.0;
        let lines = wrap(text, chars_per_line(self.content_width() - indent, BODY_PT));
        for (i, line) in lines.into_iter().enumerate() {
            self.ensure_room(line_h);
            self.y += line_h;
            let y = self.y;
            if i == 0 {
                self.push_run(MARGIN_MM + 1.0, y, BODY_PT, Font::Regular, marker.to_string());
            }
            self.push_run(MARGIN_MM + indent, y, BODY_PT, Font::Regular, line);
        }
    }

    /// Indented text under a list item.
    pub fn indented(&mut self, text: &str) {
        self.text_at(7.0, text, BODY_PT, Font::Regular);
    }

    /// Horizontal rule across the content width.
    pub fn rule(&mut self) {
        self.ensure_room(2.0);
        self.y += 1.0;
        let y = self.y;
        let right = self.width - MARGIN_MM;
        self.push_rule((MARGIN_MM, y), (right, y));
        self.y += 1.0;
    }

    /// Grid table that paginates row by row and repeats its header.
    ///
    /// A row taller than the space left on a fresh page is split across
    /// pages.
    pub fn table(&mut self, columns: &[Column], rows: &[Vec<String>]) {
        if columns.is_empty() {
            return;
        }
        let total_weight: f32 = columns.iter().map(|c| c.weight).sum();
        let widths: Vec<f32> = columns
            .iter()
            .map(|c| self.content_width() * c.weight / total_weight)
            .collect();
        let line_h = line_height_mm(TABLE_PT);
        let header: Vec<Vec<String>> = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| wrap(c.title, chars_per_line(w - 2.0 * CELL_PAD_MM, TABLE_PT)))
            .collect();
        let header_h = row_height(&header, line_h);

        self.ensure_room(header_h + line_h + 2.0 * CELL_PAD_MM);
        self.draw_row(&widths, &header, 0, usize::MAX, Font::Bold, line_h);

        let fresh_capacity = self.lines_that_fit(MARGIN_MM + header_h, line_h).max(1);

        for row in rows {
            let cells: Vec<Vec<String>> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let text = row.get(i).map(String::as_str).unwrap_or("");
                    wrap(text, chars_per_line(w - 2.0 * CELL_PAD_MM, TABLE_PT))
                })
                .collect();
            let total_lines = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);

            let mut offset = 0;
            while offset < total_lines {
                let remaining = total_lines - offset;
                let available = self.lines_that_fit(self.y, line_h);
                if remaining > available && (available == 0 || remaining <= fresh_capacity) {
                    self.continue_table(&widths, &header, line_h);
                    continue;
                }
                let take = remaining.min(available);
                self.draw_row(&widths, &cells, offset, take, Font::Regular, line_h);
                offset += take;
                if offset < total_lines {
                    self.continue_table(&widths, &header, line_h);
                }
            }
        }
        self.space(3.0);
    }

    fn lines_that_fit(&self, top: f32, line_h: f32) -> usize {
        let room = self.bottom() - top - 2.0 * CELL_PAD_MM;
        if room <= 0.0 {
            0
        } else {
            (room / line_h).floor() as usize
        }
    }

    fn continue_table(&mut self, widths: &[f32], header: &[Vec<String>], line_h: f32) {
        self.pages.push(Page::default());
        self.y = MARGIN_MM;
        self.draw_row(widths, header, 0, usize::MAX, Font::Bold, line_h);
    }

    /// Draw lines `offset..offset + take` of each cell as one boxed row.
    fn draw_row(
        &mut self,
        widths: &[f32],
        cells: &[Vec<String>],
        offset: usize,
        take: usize,
        font: Font,
        line_h: f32,
    ) {
        let span = cells
            .iter()
            .map(|c| c.len().saturating_sub(offset).min(take))
            .max()
            .unwrap_or(0)
            .max(1);
        let height = span as f32 * line_h + 2.0 * CELL_PAD_MM;
        let top = self.y;
        let bottom = top + height;
        let left = MARGIN_MM;
        let right = MARGIN_MM + widths.iter().sum::<f32>();

        self.push_rule((left, top), (right, top));
        self.push_rule((left, bottom), (right, bottom));

        let mut x = left;
        self.push_rule((x, top), (x, bottom));
        for (width, cell) in widths.iter().zip(cells) {
            for (i, line) in cell.iter().skip(offset).take(span).enumerate() {
                let baseline = top + CELL_PAD_MM + (i + 1) as f32 * line_h - 0.8;
                self.push_run(x + CELL_PAD_MM, baseline, TABLE_PT, font, line.clone());
            }
            x += width;
            self.push_rule((x, top), (x, bottom));
        }
        self.y = bottom;
    }

    pub fn finish(self) -> Document {
        Document {
            title: self.title,
            orientation: self.orientation,
            pages: self.pages,
        }
    }
}

fn row_height(cells: &[Vec<String>], line_h: f32) -> f32 {
    let lines = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
    lines as f32 * line_h + 2.0 * CELL_PAD_MM
}
