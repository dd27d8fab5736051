use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("proposal text is empty; refusing to render a blank document")]
    EmptyDocument,
    #[error("character `{character}` (U+{codepoint:04X}) cannot be encoded in the document font")]
    Unencodable { character: char, codepoint: u32 },
    #[error("layout failure: {0}")]
    Layout(String),
    #[error("pdf assembly failed: {0}")]
    Assembly(#[from] lopdf::Error),
}

/// Fixed page geometry for proposal documents. All coordinates are PDF
/// points with the origin at the bottom-left corner of the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub origin_x: f32,
    pub first_baseline_y: f32,
    pub bottom_margin: f32,
    pub right_margin: f32,
    pub font_size: f32,
    pub leading: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        // US letter, Helvetica 12, first baseline at 730pt, 10pt left inset.
        Self {
            page_width: 612.0,
            page_height: 792.0,
            origin_x: 10.0,
            first_baseline_y: 730.0,
            bottom_margin: 40.0,
            right_margin: 10.0,
            font_size: 12.0,
            leading: 14.0,
        }
    }
}

// Average Helvetica glyph advance in em units, used for the wrap budget.
// Conservative on purpose: wrapping a little early beats clipping.
const AVERAGE_GLYPH_WIDTH_EM: f32 = 0.6;

impl PageLayout {
    /// Number of baselines that fit between the first baseline and the
    /// bottom margin, inclusive of the first.
    pub fn lines_per_page(&self) -> usize {
        if self.leading <= 0.0 || self.first_baseline_y <= self.bottom_margin {
            return 1;
        }
        ((self.first_baseline_y - self.bottom_margin) / self.leading) as usize + 1
    }

    /// Character budget for one line at the fixed font size.
    pub fn chars_per_line(&self) -> usize {
        let usable = self.page_width - self.origin_x - self.right_margin;
        let advance = self.font_size * AVERAGE_GLYPH_WIDTH_EM;
        if usable <= 0.0 || advance <= 0.0 {
            return 1;
        }
        ((usable / advance) as usize).max(1)
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.page_width <= 0.0 || self.page_height <= 0.0 {
            return Err(RenderError::Layout("page dimensions must be positive".to_string()));
        }
        if self.first_baseline_y >= self.page_height {
            return Err(RenderError::Layout(
                "first baseline must sit below the top page edge".to_string(),
            ));
        }
        if self.leading <= 0.0 || self.font_size <= 0.0 {
            return Err(RenderError::Layout(
                "font size and leading must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Renders plain text into a complete PDF byte stream.
///
/// The renderer owns no state beyond its layout; every call produces an
/// independent buffer that the caller owns and drops.
#[derive(Clone, Debug, Default)]
pub struct PdfRenderer {
    layout: PageLayout,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: PageLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Render `text` into a finished PDF document.
    ///
    /// Input lines are written in order, wrapped at the page width budget,
    /// and continued onto additional pages when a page fills up. Returns
    /// the document bytes on success; the buffer is freshly allocated per
    /// call and never cached.
    pub fn render(&self, text: &str) -> Result<Vec<u8>, RenderError> {
        self.layout.validate()?;

        if text.trim().is_empty() {
            return Err(RenderError::EmptyDocument);
        }

        let mut encoded_lines = Vec::new();
        for raw_line in text.lines() {
            let line = raw_line.trim_end_matches('\r');
            for wrapped in wrap_line(line, self.layout.chars_per_line()) {
                encoded_lines.push(encode_win_ansi(&wrapped)?);
            }
        }

        let pages = paginate(&encoded_lines, self.layout.lines_per_page());
        let buffer = self.assemble(&pages)?;

        debug!(
            pages = pages.len(),
            lines = encoded_lines.len(),
            bytes = buffer.len(),
            "proposal document rendered"
        );
        Ok(buffer)
    }

    fn assemble(&self, pages: &[Vec<Vec<u8>>]) -> Result<Vec<u8>, RenderError> {
        let layout = &self.layout;
        let mut doc = Document::with_version("1.7");

        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for page_lines in pages {
            let content = page_content(layout, page_lines);
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    Object::Real(layout.page_width),
                    Object::Real(layout.page_height),
                ],
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).map_err(lopdf::Error::from)?;
        Ok(buffer)
    }
}

/// One page's content stream: position at the text origin, then show each
/// line and advance by the leading.
fn page_content(layout: &PageLayout, lines: &[Vec<u8>]) -> Vec<u8> {
    let mut content = Vec::new();
    content.extend_from_slice(b"BT\n");
    content.extend_from_slice(format!("/F1 {} Tf\n", layout.font_size).as_bytes());
    content.extend_from_slice(format!("{} TL\n", layout.leading).as_bytes());
    content.extend_from_slice(
        format!("{} {} Td\n", layout.origin_x, layout.first_baseline_y).as_bytes(),
    );

    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            content.extend_from_slice(b"T*\n");
        }
        content.push(b'(');
        content.extend_from_slice(line);
        content.extend_from_slice(b") Tj\n");
    }

    content.extend_from_slice(b"ET\n");
    content
}

fn paginate(lines: &[Vec<u8>], lines_per_page: usize) -> Vec<Vec<Vec<u8>>> {
    let capacity = lines_per_page.max(1);
    let mut pages: Vec<Vec<Vec<u8>>> =
        lines.chunks(capacity).map(|chunk| chunk.to_vec()).collect();
    if pages.is_empty() {
        pages.push(Vec::new());
    }
    pages
}

/// Encode one line as a WinAnsi PDF string body, escaping the string
/// delimiters. Characters outside the WinAnsi repertoire are rejected
/// rather than silently substituted.
fn encode_win_ansi(line: &str) -> Result<Vec<u8>, RenderError> {
    let mut encoded = Vec::with_capacity(line.len());
    for character in line.chars() {
        let codepoint = character as u32;
        let byte = match character {
            '\t' => {
                // Tabs have no glyph; render as a single space.
                encoded.push(b' ');
                continue;
            }
            '(' | ')' | '\\' => {
                encoded.push(b'\\');
                codepoint as u8
            }
            _ if (0x20..=0x7E).contains(&codepoint) => codepoint as u8,
            _ if (0xA0..=0xFF).contains(&codepoint) => codepoint as u8,
            _ => match cp1252_byte(character) {
                Some(byte) => byte,
                None => return Err(RenderError::Unencodable { character, codepoint }),
            },
        };
        encoded.push(byte);
    }
    Ok(encoded)
}

/// WinAnsi (CP1252) assigns printable glyphs to 0x80..=0x9F where Latin-1
/// has control codes. Drafted prose leans on several of these (curly
/// quotes, dashes, ellipsis), so they map to their code-page byte.
fn cp1252_byte(character: char) -> Option<u8> {
    let byte = match character {
        '\u{20AC}' => 0x80, // euro sign
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85, // horizontal ellipsis
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91, // left single quotation mark
        '\u{2019}' => 0x92, // right single quotation mark
        '\u{201C}' => 0x93, // left double quotation mark
        '\u{201D}' => 0x94, // right double quotation mark
        '\u{2022}' => 0x95, // bullet
        '\u{2013}' => 0x96, // en dash
        '\u{2014}' => 0x97, // em dash
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99, // trade mark sign
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Split a line into pieces that fit the character budget, preferring
/// word boundaries and hard-splitting unbroken runs.
fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    if line.chars().count() <= max_chars {
        return vec![line.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if current_len == 0 {
            current.push_str(word);
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            pieces.push(std::mem::take(&mut current));
            current.push_str(word);
        }

        // An unbroken run longer than the budget gets hard-split.
        while current.chars().count() > max_chars {
            let split_at = current
                .char_indices()
                .nth(max_chars)
                .map(|(byte_index, _)| byte_index)
                .unwrap_or(current.len());
            let remainder = current.split_off(split_at);
            pieces.push(std::mem::take(&mut current));
            current = remainder;
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    if pieces.is_empty() {
        pieces.push(String::new());
    }
    pieces
}
