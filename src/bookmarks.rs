//! PDF outline (bookmark) support built on top of `lopdf`.
//!
//! genpdf cannot write outlines, so the rendered bytes are reopened with `lopdf` and an
//! `/Outlines` tree is attached to the catalog.  Headings become top-level entries and
//! subheadings are nested below the heading that precedes them.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};

use crate::model::{BlockKind, OutlineEntry};

/// Errors that can occur while embedding bookmarks into a rendered PDF document.
#[derive(Debug)]
pub enum BookmarkError {
    /// The PDF bytes could not be parsed by `lopdf`.
    Parse(lopdf::Error),
    /// A required catalog entry was missing from the document trailer.
    MissingCatalog,
    /// The catalog object was not a dictionary, preventing outline injection.
    InvalidCatalog,
    /// A heading refers to a page that does not exist in the rendered document.
    MissingPage {
        /// Title of the heading.
        title: String,
        /// The requested (1-indexed) page number that could not be resolved.
        page_number: usize,
    },
}

impl From<lopdf::Error> for BookmarkError {
    fn from(err: lopdf::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for BookmarkError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.into())
    }
}

impl std::fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "Failed to parse PDF bytes: {err}"),
            Self::MissingCatalog => write!(f, "PDF catalog entry is missing"),
            Self::InvalidCatalog => write!(f, "PDF catalog entry is not a dictionary"),
            Self::MissingPage { title, page_number } => write!(
                f,
                "Heading {:?} refers to missing page {}",
                title, page_number
            ),
        }
    }
}

impl std::error::Error for BookmarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::MissingCatalog | Self::InvalidCatalog | Self::MissingPage { .. } => None,
        }
    }
}

/// Attaches an outline built from `entries` to the PDF in `pdf_bytes`.
///
/// The title entry is not bookmarked; headings form the top level, subheadings their children.
/// Every entry targets `/Dest [page /Fit]` of the page the heading was drawn on.
pub fn apply_outline(
    pdf_bytes: &[u8],
    entries: &[OutlineEntry],
) -> Result<Vec<u8>, BookmarkError> {
    let entries: Vec<&OutlineEntry> = entries
        .iter()
        .filter(|entry| entry.kind != BlockKind::Title)
        .collect();
    if entries.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let pages = document.get_pages();
    let nodes = collect_nodes(&mut document, &entries, &pages)?;

    let outlines_id = document.new_object_id();
    let top_level = link_nodes(outlines_id, &mut document, &nodes);
    let first_last = top_level
        .first()
        .zip(top_level.last())
        .map(|(&first, &last)| (nodes[first].object_id, nodes[last].object_id));
    insert_outlines_root(outlines_id, &mut document, first_last, nodes.len())?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

struct OutlineNode {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
    parent: Option<usize>,
}

fn collect_nodes(
    document: &mut Document,
    entries: &[&OutlineEntry],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<OutlineNode>, BookmarkError> {
    let mut nodes = Vec::with_capacity(entries.len());
    let mut current_heading = None;

    for entry in entries {
        let page_ref = u32::try_from(entry.page)
            .ok()
            .and_then(|page| pages.get(&page).copied())
            .ok_or_else(|| BookmarkError::MissingPage {
                title: entry.title.clone(),
                page_number: entry.page,
            })?;

        let parent = match entry.kind {
            BlockKind::SubHeading => current_heading,
            _ => None,
        };
        if entry.kind == BlockKind::Heading {
            current_heading = Some(nodes.len());
        }

        nodes.push(OutlineNode {
            object_id: document.new_object_id(),
            page_ref,
            title: entry.title.clone(),
            parent,
        });
    }

    Ok(nodes)
}

/// Writes one dictionary per node and returns the indices of the top-level nodes.
fn link_nodes(
    outlines_id: ObjectId,
    document: &mut Document,
    nodes: &[OutlineNode],
) -> Vec<usize> {
    let siblings_of = |parent: Option<usize>| -> Vec<usize> {
        (0..nodes.len())
            .filter(|index| nodes[*index].parent == parent)
            .collect()
    };

    let top_level = siblings_of(None);
    let mut groups = vec![(outlines_id, top_level.clone())];
    for index in 0..nodes.len() {
        let children = siblings_of(Some(index));
        if !children.is_empty() {
            groups.push((nodes[index].object_id, children));
        }
    }

    for (parent_id, members) in &groups {
        for (position, &index) in members.iter().enumerate() {
            let node = &nodes[index];
            let mut dictionary = Dictionary::new();
            dictionary.set("Title", text_string(&node.title));
            dictionary.set(
                "Dest",
                Object::Array(vec![
                    Object::Reference(node.page_ref),
                    Object::Name("Fit".into()),
                ]),
            );
            dictionary.set("Parent", Object::Reference(*parent_id));

            if position > 0 {
                let previous = nodes[members[position - 1]].object_id;
                dictionary.set("Prev", Object::Reference(previous));
            }
            if let Some(&next) = members.get(position + 1) {
                dictionary.set("Next", Object::Reference(nodes[next].object_id));
            }

            let children = siblings_of(Some(index));
            if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
                dictionary.set("First", Object::Reference(nodes[first].object_id));
                dictionary.set("Last", Object::Reference(nodes[last].object_id));
                dictionary.set("Count", Object::Integer(children.len() as i64));
            }

            document
                .objects
                .insert(node.object_id, Object::Dictionary(dictionary));
        }
    }

    top_level
}

/// Encodes `text` as a PDF text string.
///
/// ASCII stays a literal string; anything else is written as UTF-16BE behind the `FE FF` byte
/// order mark, since literal strings are read as PDFDocEncoding.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    first_last: Option<(ObjectId, ObjectId)>,
    total: usize,
) -> Result<(), BookmarkError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name("UseOutlines".into()));

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Outlines".into()));
    dictionary.set("Count", Object::Integer(total as i64));
    if let Some((first, last)) = first_last {
        dictionary.set("First", Object::Reference(first));
        dictionary.set("Last", Object::Reference(last));
    }
    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    Ok(())
}
