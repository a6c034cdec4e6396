mod document;
mod editor;
mod merge;
mod page_index;

pub use document::PdfDocument;
pub use editor::{PageSequence, move_page, remove_page};
pub use merge::merge_files;
pub use page_index::PageIndex;

/// Small PDFs built in memory for unit tests.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

    fn label_content(label: &str) -> Vec<u8> {
        Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
                Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {label}"))]),
                Operation::new("ET", vec![]),
            ],
        }
        .encode()
        .unwrap()
    }

    fn media_box_of(width: i64, height: i64) -> Object {
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(width),
            Object::Integer(height),
        ])
    }

    fn add_page(doc: &mut Document, parent: ObjectId, label: &str, media_box: bool) -> ObjectId {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), label_content(label)));
        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(parent)),
            ("Contents", Object::Reference(content_id)),
        ]);
        if media_box {
            page.set("MediaBox", media_box_of(612, 792));
        }
        doc.add_object(page)
    }

    fn finish(mut doc: Document, pages_id: ObjectId) -> Vec<u8> {
        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    /// One page per label, each showing "Page <label>".
    pub fn sample_pdf(labels: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let kids: Vec<Object> = labels
            .iter()
            .map(|label| Object::Reference(add_page(&mut doc, pages_id, label, true)))
            .collect();

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(i64::try_from(kids.len()).unwrap())),
            ("Kids", Object::Array(kids)),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        finish(doc, pages_id)
    }

    /// Pages "A", "B" under an intermediate node carrying the MediaBox,
    /// then "C" directly under the root (which carries its own MediaBox).
    pub fn nested_tree_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let root_id = doc.new_object_id();
        let branch_id = doc.new_object_id();

        let a = add_page(&mut doc, branch_id, "A", false);
        let b = add_page(&mut doc, branch_id, "B", false);
        let c = add_page(&mut doc, root_id, "C", false);

        let media_box = media_box_of(300, 400);
        let branch = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Parent", Object::Reference(root_id)),
            ("Count", Object::Integer(2)),
            ("Kids", Object::Array(vec![Object::Reference(a), Object::Reference(b)])),
            ("MediaBox", media_box.clone()),
        ]);
        doc.objects.insert(branch_id, Object::Dictionary(branch));

        let root = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(3)),
            ("Kids", Object::Array(vec![Object::Reference(branch_id), Object::Reference(c)])),
            ("MediaBox", media_box),
        ]);
        doc.objects.insert(root_id, Object::Dictionary(root));

        finish(doc, root_id)
    }

    /// Labels of the pages of a serialized PDF, in display order.
    pub fn page_labels(bytes: &[u8]) -> Vec<String> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .into_values()
            .map(|page_id| {
                let content = doc.get_page_content(page_id).unwrap();
                let text = String::from_utf8_lossy(&content);
                let start = text.find("(Page ").unwrap() + "(Page ".len();
                let end = start + text[start..].find(')').unwrap();
                text[start..end].to_string()
            })
            .collect()
    }
}
