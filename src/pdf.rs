//! Single-page PDF assembly around one JPEG frame

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};

use crate::print::PageSpec;

/// A JPEG-encoded frame with its pixel size
#[derive(Debug, Clone)]
pub struct JpegFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Write a PDF with one page holding `frame` full-bleed
pub fn single_image_pdf(frame: &JpegFrame, page: &PageSpec) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let image_id = Ref::new(4);
    let content_id = Ref::new(5);
    let image_name = Name(b"Card");

    let width = page.width_pt() as f32;
    let height = page.height_pt() as f32;

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut pdf_page = pdf.page(page_id);
    pdf_page.media_box(Rect::new(0.0, 0.0, width, height));
    pdf_page.parent(page_tree_id);
    pdf_page.contents(content_id);
    pdf_page.resources().x_objects().pair(image_name, image_id);
    pdf_page.finish();

    let mut image = pdf.image_xobject(image_id, &frame.data);
    image.filter(Filter::DctDecode);
    image.width(frame.width as i32);
    image.height(frame.height as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    // unit square scaled to the page, origin bottom-left
    let mut content = Content::new();
    content.save_state();
    content.transform([width, 0.0, 0.0, height, 0.0, 0.0]);
    content.x_object(image_name);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    pdf.finish()
}
