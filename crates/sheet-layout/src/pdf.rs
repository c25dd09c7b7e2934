//! lopdf-backed document sink
//!
//! Pages are accumulated as content-stream text plus XObject references and
//! assembled into the page tree only on `finish`, so a failed run never
//! produces partial output.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, xobject};
use tracing::debug;

use crate::sink::{DocumentSink, ImageRef, PageRef};
use crate::types::{Result, SheetError};

struct PendingPage {
    width_pt: f32,
    height_pt: f32,
    content: String,
    xobjects: Vec<(String, ObjectId)>,
}

/// [`DocumentSink`] producing the final PDF byte sequence with lopdf.
pub struct PdfSink {
    doc: Document,
    pages: Vec<PendingPage>,
    images: Vec<ObjectId>,
}

impl PdfSink {
    pub fn new() -> Self {
        Self {
            doc: Document::with_version("1.7"),
            pages: Vec::new(),
            images: Vec::new(),
        }
    }
}

impl Default for PdfSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSink for PdfSink {
    fn add_page(&mut self, width_pt: f32, height_pt: f32) -> Result<PageRef> {
        self.pages.push(PendingPage {
            width_pt,
            height_pt,
            content: String::new(),
            xobjects: Vec::new(),
        });
        Ok(PageRef(self.pages.len() - 1))
    }

    fn embed(&mut self, png: &[u8]) -> Result<ImageRef> {
        let stream = xobject::image_from(png.to_vec())?;
        let id = self.doc.add_object(stream);
        self.images.push(id);
        Ok(ImageRef(self.images.len() - 1))
    }

    fn draw(
        &mut self,
        page: PageRef,
        image: ImageRef,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<()> {
        let image_id = *self.images.get(image.0).ok_or_else(|| {
            SheetError::Document(format!("draw references unknown image {}", image.0))
        })?;
        let pending = self.pages.get_mut(page.0).ok_or_else(|| {
            SheetError::Document(format!("draw references unknown page {}", page.0))
        })?;

        let name = format!("Im{}", image.0);
        pending.xobjects.push((name.clone(), image_id));
        // Scale the unit-square image XObject to the cell and translate it
        // to the placement origin.
        pending.content.push_str(&format!(
            "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
            width, height, x, y, name
        ));
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        let pages_id = self.doc.new_object_id();

        let mut kids = Vec::new();
        for pending in std::mem::take(&mut self.pages) {
            let content_id = self
                .doc
                .add_object(Stream::new(Dictionary::new(), pending.content.into_bytes()));

            let mut xobjects = Dictionary::new();
            for (name, id) in pending.xobjects {
                xobjects.set(name.into_bytes(), Object::Reference(id));
            }
            let mut resources = Dictionary::new();
            resources.set("XObject", Object::Dictionary(xobjects));

            let mut page_dict = Dictionary::new();
            page_dict.set("Type", Object::Name(b"Page".to_vec()));
            page_dict.set("Parent", Object::Reference(pages_id));
            page_dict.set(
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(pending.width_pt),
                    Object::Real(pending.height_pt),
                ]),
            );
            page_dict.set("Contents", Object::Reference(content_id));
            page_dict.set("Resources", Object::Dictionary(resources));

            kids.push(Object::Reference(self.doc.add_object(page_dict)));
        }

        let page_count = kids.len();
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(page_count as i64)),
        ]);
        self.doc
            .objects
            .insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        debug!(
            pages = page_count,
            images = self.images.len(),
            bytes = bytes.len(),
            "serialized sheet document"
        );
        Ok(bytes)
    }
}
