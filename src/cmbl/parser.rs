//! Pull parser turning a CMBL document into datasets.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use super::error::ParseError;
use super::models::{
    synthesize_header, CmblDocument, Column, Dataset, Precision, Samples, ValueWarning,
};

/// Input buffer size used by [`CmblReader::open`]
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

const DATA_SET: &[u8] = b"DataSet";
const DATA_SET_NAME: &[u8] = b"DataSetName";
const DATA_COLUMN: &[u8] = b"DataColumn";
const DATA_OBJECT_NAME: &[u8] = b"DataObjectName";
const DATA_OBJECT_SHORT_NAME: &[u8] = b"DataObjectShortName";
const COLUMN_UNITS: &[u8] = b"ColumnUnits";
const COLUMN_CELLS: &[u8] = b"ColumnCells";

/// Text-carrying child elements the parser reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    DataSetName,
    Name,
    ShortName,
    Units,
    Cells,
}

/// Character data of a field element, up to its first child element
#[derive(Debug)]
struct Capture {
    field: Field,
    depth: usize,
    text: String,
    sealed: bool,
}

#[derive(Debug, Default)]
struct ColumnFields {
    name: Option<String>,
    short_name: Option<String>,
    units: Option<String>,
    cells: Option<String>,
}

#[derive(Debug)]
struct DatasetBuilder {
    ordinal: usize,
    name: Option<String>,
    dataset: Dataset,
}

fn set_once(slot: &mut Option<String>, text: String) {
    if slot.is_none() {
        *slot = Some(text);
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}'
    )
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c, '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// A name without a colon
fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
}

/// An element or attribute name with at most one prefix
fn is_qname(name: &str) -> bool {
    match name.split_once(':') {
        Some((prefix, local)) => is_ncname(prefix) && is_ncname(local),
        None => is_ncname(name),
    }
}

/// Characters allowed anywhere in an XML 1.0 document
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

fn check_chars(text: &str, position: u64) -> Result<(), ParseError> {
    match text.chars().find(|&c| !is_xml_char(c)) {
        Some(c) => Err(ParseError::not_text(
            format!("invalid character U+{:04X}", u32::from(c)),
            position,
        )),
        None => Ok(()),
    }
}

/// Turn one `DataColumn` into a column, or `None` when it carries no usable samples.
///
/// `accepted` is the number of columns already accepted into the dataset.
fn build_column(
    fields: ColumnFields,
    accepted: usize,
    precision: Precision,
    warnings: &mut Vec<ValueWarning>,
) -> Option<Column> {
    let cells = match fields.cells {
        Some(cells) if !cells.is_empty() => cells,
        _ => return None,
    };

    let header = synthesize_header(
        fields.name.as_deref().unwrap_or_default().trim(),
        fields.short_name.as_deref().unwrap_or_default().trim(),
        fields.units.as_deref().unwrap_or_default().trim(),
        accepted + 1,
    );

    let mut samples = Samples::new(precision);
    for line in cells.split(is_line_break).map(str::trim) {
        if line.is_empty() {
            continue;
        }
        if let Err(e) = samples.push_parsed(line) {
            warn!(
                "Skipping non-numeric value '{}' in column '{}' ({})",
                line, header, e
            );
            warnings.push(ValueWarning {
                header: header.clone(),
                value: line.to_string(),
            });
        }
    }

    if samples.is_empty() {
        debug!("Dropping column '{}': no numeric samples", header);
        return None;
    }
    Some(Column { header, samples })
}

/// Streaming reader for text-encoded CMBL documents
pub struct CmblReader<R: BufRead> {
    reader: NsReader<R>,
    precision: Precision,
}

impl CmblReader<BufReader<File>> {
    /// Open a CMBL file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::with_capacity(
            DEFAULT_INPUT_BUFFER_SIZE,
            file,
        )))
    }
}

impl<'a> CmblReader<&'a [u8]> {
    /// Read a CMBL document held in memory
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<R: BufRead> CmblReader<R> {
    /// Create a reader over any buffered source. Samples default to 32-bit.
    pub fn new(reader: R) -> Self {
        let mut xml_reader = NsReader::from_reader(reader);
        let config = xml_reader.config_mut();
        config.check_end_names = true;
        config.check_comments = true;

        Self {
            reader: xml_reader,
            precision: Precision::default(),
        }
    }

    /// Set the precision samples are parsed at
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    /// Validate a start tag and return the name it is matched by.
    ///
    /// Unprefixed elements outside any default namespace keep their plain
    /// name; namespaced ones become `{uri}local` and never match a CMBL
    /// element.
    fn element_key(&self, e: &BytesStart<'_>) -> Result<Vec<u8>, ParseError> {
        let position = self.position();
        let decoder = self.reader.decoder();
        let qname = e.name();

        let name = decoder
            .decode(qname.as_ref())
            .map_err(|err| ParseError::not_text(err, position))?;
        if !is_qname(&name) {
            return Err(ParseError::not_text(
                format!("invalid element name '{}'", name),
                position,
            ));
        }

        // Checked iteration rejects duplicate, valueless and unquoted attributes.
        for attr in e.attributes() {
            let attr = attr.map_err(|err| ParseError::not_text(err, position))?;
            let key = decoder
                .decode(attr.key.as_ref())
                .map_err(|err| ParseError::not_text(err, position))?;
            if !is_qname(&key) {
                return Err(ParseError::not_text(
                    format!("invalid attribute name '{}'", key),
                    position,
                ));
            }
            if attr.key.as_namespace_binding().is_none() {
                if let (ResolveResult::Unknown(prefix), _) =
                    self.reader.resolve_attribute(attr.key)
                {
                    return Err(ParseError::not_text(
                        format!("unbound prefix '{}'", String::from_utf8_lossy(&prefix)),
                        position,
                    ));
                }
            }
            if attr.value.contains(&b'<') {
                return Err(ParseError::not_text(
                    format!("'<' in value of attribute '{}'", key),
                    position,
                ));
            }
            let value = attr
                .decode_and_unescape_value(decoder)
                .map_err(|err| ParseError::not_text(err, position))?;
            check_chars(&value, position)?;
        }

        match self.reader.resolve_element(qname) {
            (ResolveResult::Unbound, _) => Ok(qname.as_ref().to_vec()),
            (ResolveResult::Bound(ns), local) => {
                let mut key = Vec::with_capacity(ns.0.len() + local.as_ref().len() + 2);
                key.push(b'{');
                key.extend_from_slice(ns.0);
                key.push(b'}');
                key.extend_from_slice(local.as_ref());
                Ok(key)
            }
            (ResolveResult::Unknown(prefix), _) => Err(ParseError::not_text(
                format!("unbound prefix '{}'", String::from_utf8_lossy(&prefix)),
                position,
            )),
        }
    }

    /// Read the whole document.
    ///
    /// Fails only when the input is not well-formed XML; everything else
    /// degrades to warnings or dropped columns and datasets.
    pub fn read_document(mut self) -> Result<CmblDocument, ParseError> {
        let mut document = CmblDocument::default();
        let mut stack: Vec<Vec<u8>> = Vec::new();
        let mut seen_root = false;
        let mut encountered = 0usize;
        let mut dataset: Option<DatasetBuilder> = None;
        let mut column: Option<ColumnFields> = None;
        let mut capture: Option<Capture> = None;
        let mut at_start = true;
        let mut buf = Vec::new();

        loop {
            let event = self
                .reader
                .read_event_into(&mut buf)
                .map_err(|e| ParseError::not_text(e, self.reader.buffer_position() as u64))?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    let name = self.element_key(e)?;

                    if stack.is_empty() {
                        if seen_root {
                            return Err(ParseError::not_text(
                                "more than one root element",
                                self.position(),
                            ));
                        }
                        seen_root = true;
                    }

                    if let Some(ref mut c) = capture {
                        if stack.len() == c.depth {
                            c.sealed = true;
                        }
                    }

                    let parent_depth = stack.len();
                    match (parent_depth, name.as_slice()) {
                        (1, DATA_SET) => {
                            encountered += 1;
                            dataset = Some(DatasetBuilder {
                                ordinal: encountered,
                                name: None,
                                dataset: Dataset::new(String::new()),
                            });
                        }
                        (2, DATA_SET_NAME) if dataset.is_some() => {
                            capture = Some(Capture::new(Field::DataSetName, parent_depth + 1));
                        }
                        (2, DATA_COLUMN) if dataset.is_some() => {
                            column = Some(ColumnFields::default());
                        }
                        (3, field) if column.is_some() => {
                            let field = match field {
                                DATA_OBJECT_NAME => Some(Field::Name),
                                DATA_OBJECT_SHORT_NAME => Some(Field::ShortName),
                                COLUMN_UNITS => Some(Field::Units),
                                COLUMN_CELLS => Some(Field::Cells),
                                _ => None,
                            };
                            if let Some(field) = field {
                                capture = Some(Capture::new(field, parent_depth + 1));
                            }
                        }
                        _ => {}
                    }

                    if is_empty {
                        self.close_element(
                            parent_depth + 1,
                            &name,
                            &mut dataset,
                            &mut column,
                            &mut capture,
                            &mut document,
                        );
                    } else {
                        stack.push(name);
                    }
                }
                Event::End(_) => {
                    let depth = stack.len();
                    let name = stack.pop().unwrap_or_default();
                    self.close_element(
                        depth,
                        &name,
                        &mut dataset,
                        &mut column,
                        &mut capture,
                        &mut document,
                    );
                }
                Event::Text(ref t) => {
                    if t.windows(3).any(|w| w == b"]]>") {
                        return Err(ParseError::not_text(
                            "']]>' in character data",
                            self.position(),
                        ));
                    }
                    let text = t
                        .unescape()
                        .map_err(|e| ParseError::not_text(e, self.position()))?;
                    check_chars(&text, self.position())?;
                    if stack.is_empty() {
                        if !text.trim().is_empty() {
                            return Err(ParseError::not_text(
                                "text outside the root element",
                                self.position(),
                            ));
                        }
                    } else if let Some(ref mut c) = capture {
                        c.append(stack.len(), &text);
                    }
                }
                Event::CData(ref t) => {
                    if stack.is_empty() {
                        return Err(ParseError::not_text(
                            "CDATA outside the root element",
                            self.position(),
                        ));
                    }
                    let text = self
                        .reader
                        .decoder()
                        .decode(t)
                        .map_err(|e| ParseError::not_text(e, self.position()))?;
                    check_chars(&text, self.position())?;
                    if let Some(ref mut c) = capture {
                        c.append(stack.len(), &text);
                    }
                }
                Event::Eof => {
                    if let Some(open) = stack.last() {
                        return Err(ParseError::not_text(
                            format!(
                                "unexpected end of document inside <{}>",
                                String::from_utf8_lossy(open)
                            ),
                            self.position(),
                        ));
                    }
                    if !seen_root {
                        return Err(ParseError::not_text("no root element", self.position()));
                    }
                    break;
                }
                Event::Decl(_) if !at_start => {
                    return Err(ParseError::not_text(
                        "XML declaration not at the start of the document",
                        self.position(),
                    ));
                }
                Event::PI(ref p) if p.target().eq_ignore_ascii_case(b"xml") => {
                    return Err(ParseError::not_text(
                        "reserved processing instruction target 'xml'",
                        self.position(),
                    ));
                }
                Event::DocType(_) if seen_root => {
                    return Err(ParseError::not_text(
                        "DOCTYPE after the root element",
                        self.position(),
                    ));
                }
                Event::Comment(ref t) => {
                    let text = self
                        .reader
                        .decoder()
                        .decode(t)
                        .map_err(|e| ParseError::not_text(e, self.position()))?;
                    check_chars(&text, self.position())?;
                }
                _ => {}
            }
            at_start = false;
            buf.clear();
        }

        Ok(document)
    }

    /// Handle the end of the element at `depth` (1 is the root)
    fn close_element(
        &self,
        depth: usize,
        name: &[u8],
        dataset: &mut Option<DatasetBuilder>,
        column: &mut Option<ColumnFields>,
        capture: &mut Option<Capture>,
        document: &mut CmblDocument,
    ) {
        if capture.as_ref().is_some_and(|c| c.depth == depth) {
            if let Some(c) = capture.take() {
                match c.field {
                    Field::DataSetName => {
                        if let Some(builder) = dataset.as_mut() {
                            set_once(&mut builder.name, c.text);
                        }
                    }
                    Field::Name | Field::ShortName | Field::Units | Field::Cells => {
                        if let Some(fields) = column.as_mut() {
                            let slot = match c.field {
                                Field::Name => &mut fields.name,
                                Field::ShortName => &mut fields.short_name,
                                Field::Units => &mut fields.units,
                                _ => &mut fields.cells,
                            };
                            set_once(slot, c.text);
                        }
                    }
                }
            }
            return;
        }

        match (depth, name) {
            (3, DATA_COLUMN) => {
                if let (Some(fields), Some(builder)) = (column.take(), dataset.as_mut()) {
                    let accepted = builder.dataset.columns.len();
                    if let Some(col) =
                        build_column(fields, accepted, self.precision, &mut document.warnings)
                    {
                        builder.dataset.insert_column(col);
                    }
                }
            }
            (2, DATA_SET) => {
                if let Some(builder) = dataset.take() {
                    let name = builder
                        .name
                        .as_deref()
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Dataset_{}", builder.ordinal));

                    if builder.dataset.columns.is_empty() {
                        debug!("Dropping dataset '{}': no usable columns", name);
                    } else {
                        let mut retained = builder.dataset;
                        retained.name = name;
                        document.datasets.push(retained);
                    }
                }
            }
            _ => {}
        }
    }
}

impl Capture {
    fn new(field: Field, depth: usize) -> Self {
        Self {
            field,
            depth,
            text: String::new(),
            sealed: false,
        }
    }

    fn append(&mut self, current_depth: usize, text: &str) {
        if current_depth == self.depth && !self.sealed {
            self.text.push_str(text);
        }
    }
}

/// Parse a complete CMBL document held in memory.
///
/// # Example
///
/// ```
/// use cmbl2csv::cmbl::{parse, Precision};
///
/// let xml = br#"<Document>
///   <DataSet>
///     <DataSetName>Run 1</DataSetName>
///     <DataColumn>
///       <DataObjectName>Time</DataObjectName>
///       <ColumnCells>0
/// 0.5
/// 1.0</ColumnCells>
///     </DataColumn>
///   </DataSet>
/// </Document>"#;
///
/// let document = parse(xml, Precision::Double)?;
/// assert_eq!(document.datasets[0].name, "Run 1");
/// assert_eq!(document.datasets[0].columns[0].len(), 3);
/// # Ok::<(), cmbl2csv::cmbl::ParseError>(())
/// ```
pub fn parse(bytes: &[u8], precision: Precision) -> Result<CmblDocument, ParseError> {
    CmblReader::from_bytes(bytes)
        .with_precision(precision)
        .read_document()
}

/// Parse a CMBL file from disk
pub fn parse_file<P: AsRef<Path>>(path: P, precision: Precision) -> Result<CmblDocument, ParseError> {
    CmblReader::open(path)?
        .with_precision(precision)
        .read_document()
}
