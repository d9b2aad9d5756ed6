use crate::error::{Result, SplitError};
use crate::page_range::PageGroup;
use lopdf::{Document, Object, ObjectId};

/// Page attributes a page may take from an ancestor `Pages` node.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards the parent walk against cyclic page trees.
const MAX_TREE_DEPTH: usize = 64;

pub struct PdfDocument {
    pub doc: Document,
    pages: Vec<ObjectId>,
}

impl PdfDocument {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc =
            Document::load_mem(bytes).map_err(|e| SplitError::UnreadableSource(e.to_string()))?;
        // get_pages is keyed by page number, so values come out in page order
        let pages = doc.get_pages().into_values().collect();
        Ok(PdfDocument { doc, pages })
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Page object IDs in page order
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.pages
    }

    /// Copy a run of pages into a new, standalone document.
    ///
    /// The clone's page tree is flattened to a single `Pages` node holding just
    /// the group, and everything no longer reachable is pruned. The source
    /// stays untouched and can be cut again.
    pub fn extract_group(&self, group: PageGroup) -> Result<Document> {
        let total = self.page_count();
        if group.start >= group.end || group.end > total {
            return Err(SplitError::Serialize(format!(
                "page group {} lies outside the document (1-{})",
                group, total
            )));
        }

        let root_id = self.page_tree_root()?;
        let kept = &self.pages[group.start as usize..group.end as usize];

        // Resolved against the source tree, before the clone is rewired
        let inherited: Vec<_> = kept
            .iter()
            .map(|&page_id| self.inherited_attributes(page_id))
            .collect();

        let mut new_doc = self.doc.clone();
        for (&page_id, attributes) in kept.iter().zip(inherited) {
            let page = new_doc
                .get_dictionary_mut(page_id)
                .map_err(|e| SplitError::Serialize(format!("page {:?}: {}", page_id, e)))?;
            for (key, value) in attributes {
                page.set(key, value);
            }
            page.set("Parent", Object::Reference(root_id));
        }

        let root = new_doc
            .get_dictionary_mut(root_id)
            .map_err(|e| SplitError::Serialize(format!("page tree root: {}", e)))?;
        root.set(
            "Kids",
            Object::Array(kept.iter().map(|id| Object::Reference(*id)).collect()),
        );
        root.set("Count", Object::Integer(kept.len() as i64));

        // Other pages, intermediate nodes and their resources are unreachable now
        new_doc.prune_objects();
        new_doc.compress();

        Ok(new_doc)
    }

    fn page_tree_root(&self) -> Result<ObjectId> {
        self.doc
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(|pages| pages.as_reference())
            .map_err(|e| SplitError::UnreadableSource(format!("no page tree: {}", e)))
    }

    /// Inheritable attributes the page lacks, taken from the nearest ancestor
    /// that defines them.
    fn inherited_attributes(&self, page_id: ObjectId) -> Vec<(&'static [u8], Object)> {
        let Ok(page) = self.doc.get_dictionary(page_id) else {
            return Vec::new();
        };

        let mut missing: Vec<&'static [u8]> = INHERITABLE
            .iter()
            .copied()
            .filter(|key| !page.has(key))
            .collect();
        let mut found = Vec::new();
        let mut parent = parent_of(page);

        for _ in 0..MAX_TREE_DEPTH {
            let Some(node_id) = parent else { break };
            if missing.is_empty() {
                break;
            }
            let Ok(node) = self.doc.get_dictionary(node_id) else {
                break;
            };

            missing.retain(|key| match node.get(key) {
                Ok(value) => {
                    found.push((*key, value.clone()));
                    false
                }
                Err(_) => true,
            });
            parent = parent_of(node);
        }

        found
    }

    pub fn to_bytes(doc: &mut Document) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| SplitError::Serialize(e.to_string()))?;
        Ok(buffer)
    }
}

fn parent_of(node: &lopdf::Dictionary) -> Option<ObjectId> {
    node.get(b"Parent")
        .and_then(|parent| parent.as_reference())
        .ok()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Dictionary, Stream, StringFormat};

    pub(crate) const PAGE_MARKER: &[u8] = b"PageNumber";

    /// Build an in-memory PDF whose pages carry their own 1-based number in
    /// both the content stream and a `PageNumber` dictionary entry.
    pub(crate) fn sample_pdf(num_pages: u32) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut page_ids = Vec::new();
        for i in 1..=num_pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            format!("Page {}", i).into_bytes(),
                            StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

            let page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(612),
                        Object::Integer(792),
                    ]),
                ),
                ("Contents", Object::Reference(content_id)),
                ("PageNumber", Object::Integer(i as i64)),
            ]);
            page_ids.push(doc.add_object(page));
        }

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(num_pages as i64)),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    /// Read back the `PageNumber` markers of every page, in page order.
    pub(crate) fn page_markers(bytes: &[u8]) -> Vec<i64> {
        let pdf = PdfDocument::from_bytes(bytes).unwrap();
        pdf.page_ids()
            .iter()
            .map(|&id| {
                pdf.doc
                    .get_dictionary(id)
                    .unwrap()
                    .get(PAGE_MARKER)
                    .unwrap()
                    .as_i64()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_page_count() {
        let pdf = PdfDocument::from_bytes(&sample_pdf(5)).unwrap();
        assert_eq!(pdf.page_count(), 5);
    }

    #[test]
    fn test_garbage_is_unreadable() {
        let err = PdfDocument::from_bytes(b"definitely not a pdf").err().unwrap();
        assert!(matches!(err, SplitError::UnreadableSource(_)));
    }

    #[test]
    fn test_extract_group_keeps_order() {
        let pdf = PdfDocument::from_bytes(&sample_pdf(6)).unwrap();
        let mut out = pdf.extract_group(PageGroup::nth(1, 3)).unwrap();
        let bytes = PdfDocument::to_bytes(&mut out).unwrap();
        assert_eq!(page_markers(&bytes), vec![4, 5, 6]);
    }

    #[test]
    fn test_extract_group_leaves_source_alone() {
        let pdf = PdfDocument::from_bytes(&sample_pdf(4)).unwrap();
        pdf.extract_group(PageGroup::nth(0, 2)).unwrap();
        assert_eq!(pdf.page_count(), 4);
    }

    #[test]
    fn test_extract_group_out_of_range() {
        let pdf = PdfDocument::from_bytes(&sample_pdf(4)).unwrap();
        let err = pdf.extract_group(PageGroup::nth(1, 3)).unwrap_err();
        assert!(matches!(err, SplitError::Serialize(_)));
    }

    fn rect(width: i64, height: i64) -> Object {
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(width),
            Object::Integer(height),
        ])
    }

    /// Four pages under two intermediate `Pages` nodes. The root carries a
    /// letter-size `MediaBox` and shared `Resources`; the second node
    /// overrides `MediaBox` and adds `Rotate`. Only page 4 has its own
    /// `CropBox`, and no page has its own `MediaBox`.
    fn nested_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let root_id = doc.new_object_id();
        let font_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ]));
        let resources = Dictionary::from_iter(vec![(
            "Font",
            Object::Dictionary(Dictionary::from_iter(vec![(
                "F1",
                Object::Reference(font_id),
            )])),
        )]);

        let mut branch_ids = Vec::new();
        for branch in 0..2i64 {
            let branch_id = doc.new_object_id();
            let mut kids = Vec::new();
            for offset in 1..=2i64 {
                let number = branch * 2 + offset;
                let mut page = Dictionary::from_iter(vec![
                    ("Type", Object::Name(b"Page".to_vec())),
                    ("Parent", Object::Reference(branch_id)),
                    ("PageNumber", Object::Integer(number)),
                ]);
                if number == 4 {
                    page.set("CropBox", rect(200, 200));
                }
                kids.push(Object::Reference(doc.add_object(page)));
            }

            let mut node = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Parent", Object::Reference(root_id)),
                ("Count", Object::Integer(2)),
                ("Kids", Object::Array(kids)),
            ]);
            if branch == 1 {
                node.set("MediaBox", rect(300, 400));
                node.set("Rotate", Object::Integer(90));
            }
            doc.objects.insert(branch_id, Object::Dictionary(node));
            branch_ids.push(Object::Reference(branch_id));
        }

        let root = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(4)),
            ("Kids", Object::Array(branch_ids)),
            ("MediaBox", rect(612, 792)),
            ("Resources", Object::Dictionary(resources)),
        ]);
        doc.objects.insert(root_id, Object::Dictionary(root));

        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(root_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    fn box_size(page: &Dictionary, key: &[u8]) -> (i64, i64) {
        let values = page.get(key).unwrap().as_array().unwrap();
        (values[2].as_i64().unwrap(), values[3].as_i64().unwrap())
    }

    #[test]
    fn test_nested_tree_keeps_inherited_attributes() {
        let pdf = PdfDocument::from_bytes(&nested_pdf()).unwrap();
        assert_eq!(pdf.page_count(), 4);

        let mut out = pdf.extract_group(PageGroup::nth(1, 2)).unwrap();
        let bytes = PdfDocument::to_bytes(&mut out).unwrap();
        assert_eq!(page_markers(&bytes), vec![3, 4]);

        let out = PdfDocument::from_bytes(&bytes).unwrap();
        let root_id = out.page_tree_root().unwrap();
        for &page_id in out.page_ids() {
            let page = out.doc.get_dictionary(page_id).unwrap();
            assert_eq!(box_size(page, b"MediaBox"), (300, 400));
            assert_eq!(page.get(b"Rotate").unwrap().as_i64().unwrap(), 90);
            assert!(page.has(b"Resources"));
            assert_eq!(parent_of(page), Some(root_id));
        }

        let last = out.doc.get_dictionary(out.page_ids()[1]).unwrap();
        assert_eq!(box_size(last, b"CropBox"), (200, 200));

        let root = out.doc.get_dictionary(root_id).unwrap();
        assert_eq!(root.get(b"Count").unwrap().as_i64().unwrap(), 2);
    }

    #[test]
    fn test_nested_tree_drops_intermediate_nodes() {
        let pdf = PdfDocument::from_bytes(&nested_pdf()).unwrap();
        let mut out = pdf.extract_group(PageGroup::nth(0, 2)).unwrap();
        let bytes = PdfDocument::to_bytes(&mut out).unwrap();

        let out = PdfDocument::from_bytes(&bytes).unwrap();
        let page = out.doc.get_dictionary(out.page_ids()[0]).unwrap();
        assert_eq!(box_size(page, b"MediaBox"), (612, 792));
        assert!(!page.has(b"Rotate"));

        let page_nodes = out
            .doc
            .objects
            .values()
            .filter_map(|obj| obj.as_dict().ok())
            .filter(|dict| {
                dict.get(b"Type")
                    .and_then(|t| t.as_name())
                    .map(|name| name == b"Pages")
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(page_nodes, 1);
    }

    #[test]
    fn test_many_single_page_groups() {
        let pdf = PdfDocument::from_bytes(&sample_pdf(150)).unwrap();
        for index in [0u32, 74, 149] {
            let mut out = pdf.extract_group(PageGroup::nth(index, 1)).unwrap();
            let bytes = PdfDocument::to_bytes(&mut out).unwrap();
            assert_eq!(page_markers(&bytes), vec![i64::from(index) + 1]);
        }
    }
}
