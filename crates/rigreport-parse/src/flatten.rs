//! Annotation flattening.
//!
//! Bakes the normal appearance of each visible annotation into its page's
//! content so that form-field values become ordinary page text, then removes
//! the interactive form. The result reads the same in any viewer and the
//! content stream interpreter sees the field values.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use rigreport_core::Ctm;

use crate::error::BackendError;
use crate::interpreter::matrix_from_object;
use crate::lopdf_backend::{number, resolve};

/// `/F` bits that keep an annotation from being drawn.
const INVISIBLE: i64 = 1;
const HIDDEN: i64 = 1 << 1;

/// What a flattening pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenSummary {
    /// Pages whose content or annotation list changed.
    pub pages: usize,
    /// Appearance streams drawn into page content.
    pub drawn: usize,
    /// Annotations removed from `/Annots`.
    pub removed: usize,
}

/// An annotation whose appearance is drawn onto the page.
struct Placement {
    appearance: ObjectId,
    matrix: Ctm,
}

/// Changes planned for one page.
#[derive(Default)]
struct PagePlan {
    placements: Vec<Placement>,
    kept: Vec<Object>,
    removed: usize,
}

/// Flatten `input` into `output`.
///
/// Returns `Ok(None)` without writing anything when `input` does not exist.
pub fn flatten_file(input: &Path, output: &Path) -> Result<Option<FlattenSummary>, BackendError> {
    if !input.exists() {
        return Ok(None);
    }
    let mut doc = Document::load(input)?;
    let summary = flatten_annotations(&mut doc)?;
    doc.save(output)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        drawn = summary.drawn,
        removed = summary.removed,
        output = %output.display(),
        "flattened annotations"
    );

    Ok(Some(summary))
}

/// Flatten every page of `doc` in place and drop the catalog's `/AcroForm`.
pub fn flatten_annotations(doc: &mut Document) -> Result<FlattenSummary, BackendError> {
    let mut summary = FlattenSummary::default();
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

    for page_id in page_ids {
        let Some(plan) = plan_page(doc, page_id)? else {
            continue;
        };
        summary.pages += 1;
        summary.drawn += plan.placements.len();
        summary.removed += plan.removed;
        apply_plan(doc, page_id, plan)?;
    }

    if let Ok(catalog) = doc.catalog_mut() {
        catalog.remove(b"AcroForm");
    }
    Ok(summary)
}

/// Decide what happens to each annotation of a page; `None` when nothing changes.
fn plan_page(doc: &Document, page_id: ObjectId) -> Result<Option<PagePlan>, BackendError> {
    let page = doc.get_dictionary(page_id)?;
    let Some(annots) = page
        .get(b"Annots")
        .ok()
        .and_then(|o| resolve(doc, o).as_array().ok())
    else {
        return Ok(None);
    };

    let mut plan = PagePlan::default();
    for entry in annots {
        let Ok(annot) = resolve(doc, entry).as_dict() else {
            plan.kept.push(entry.clone());
            continue;
        };
        let placement = placement(doc, annot);
        let is_widget = matches!(annot.get(b"Subtype").and_then(Object::as_name), Ok(b"Widget"));
        match placement {
            Some(placement) => {
                plan.placements.push(placement);
                plan.removed += 1;
            }
            None if is_widget => plan.removed += 1,
            None => plan.kept.push(entry.clone()),
        }
    }

    if plan.removed == 0 {
        return Ok(None);
    }
    Ok(Some(plan))
}

/// Where and what to draw for a visible annotation with a normal appearance.
fn placement(doc: &Document, annot: &Dictionary) -> Option<Placement> {
    let flags = annot.get(b"F").ok().and_then(|o| resolve(doc, o).as_i64().ok()).unwrap_or(0);
    if flags & (INVISIBLE | HIDDEN) != 0 {
        return None;
    }

    let appearance = normal_appearance(doc, annot)?;
    let stream = doc.get_object(appearance).ok()?.as_stream().ok()?;
    let rect = rect_of(doc, annot.get(b"Rect").ok()?)?;
    let bbox = rect_of(doc, stream.dict.get(b"BBox").ok()?)?;
    let form_matrix = stream
        .dict
        .get(b"Matrix")
        .ok()
        .and_then(|o| matrix_from_object(resolve(doc, o)))
        .unwrap_or_default();

    Some(Placement {
        appearance,
        matrix: appearance_matrix(rect, bbox, &form_matrix)?,
    })
}

/// `/AP /N`, selecting the `/AS` state when `/N` holds several.
fn normal_appearance(doc: &Document, annot: &Dictionary) -> Option<ObjectId> {
    let ap = resolve(doc, annot.get(b"AP").ok()?).as_dict().ok()?;
    let normal = ap.get(b"N").ok()?;
    // states are usually inline: `/N << /Yes 5 0 R /Off 6 0 R >>`
    let states = match resolve(doc, normal) {
        Object::Stream(_) => return normal.as_reference().ok(),
        Object::Dictionary(states) => states,
        _ => return None,
    };
    let state = resolve(doc, annot.get(b"AS").ok()?).as_name().ok()?;
    let entry = states.get(state).ok()?.as_reference().ok()?;
    doc.get_object(entry).ok()?.as_stream().ok().map(|_| entry)
}

/// `[llx lly urx ury]`, normalized.
fn rect_of(doc: &Document, obj: &Object) -> Option<[f64; 4]> {
    let items = resolve(doc, obj).as_array().ok()?;
    let [a, b, c, d] = items.as_slice() else {
        return None;
    };
    let (a, b, c, d) = (number(a)?, number(b)?, number(c)?, number(d)?);
    Some([a.min(c), b.min(d), a.max(c), b.max(d)])
}

/// Matrix that maps the appearance's transformed `/BBox` onto `rect`.
///
/// `Do` applies the form's own `/Matrix`, so only the fit onto the
/// annotation rectangle is returned.
fn appearance_matrix(rect: [f64; 4], bbox: [f64; 4], form_matrix: &Ctm) -> Option<Ctm> {
    let corners = [
        form_matrix.transform(bbox[0], bbox[1]),
        form_matrix.transform(bbox[2], bbox[1]),
        form_matrix.transform(bbox[2], bbox[3]),
        form_matrix.transform(bbox[0], bbox[3]),
    ];
    let min_x = corners.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    let (width, height) = (max_x - min_x, max_y - min_y);
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let sx = (rect[2] - rect[0]) / width;
    let sy = (rect[3] - rect[1]) / height;
    Some(Ctm::new(sx, 0.0, 0.0, sy, rect[0] - min_x * sx, rect[1] - min_y * sy))
}

fn apply_plan(doc: &mut Document, page_id: ObjectId, plan: PagePlan) -> Result<(), BackendError> {
    if !plan.placements.is_empty() {
        draw_appearances(doc, page_id, &plan.placements)?;
    }
    let page = doc.get_dictionary_mut(page_id)?;
    if plan.kept.is_empty() {
        page.remove(b"Annots");
    } else {
        page.set("Annots", plan.kept);
    }
    Ok(())
}

/// Wrap the page content in `q … Q` and paint each appearance after it.
fn draw_appearances(doc: &mut Document, page_id: ObjectId, placements: &[Placement]) -> Result<(), BackendError> {
    let mut resources = page_resources(doc, page_id);
    let mut xobjects = resources
        .get(b"XObject")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
        .cloned()
        .unwrap_or_default();

    let mut drawing = vec![Operation::new("Q", vec![])];
    let mut counter = 0;
    for placement in placements {
        let name = loop {
            counter += 1;
            let candidate = format!("FxAnnot{counter}");
            if !xobjects.has(candidate.as_bytes()) {
                break candidate;
            }
        };
        xobjects.set(name.as_bytes().to_vec(), Object::Reference(placement.appearance));
        let m = placement.matrix.to_array();
        drawing.push(Operation::new("q", vec![]));
        drawing.push(Operation::new("cm", m.iter().map(|v| Object::Real(*v as f32)).collect()));
        drawing.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        drawing.push(Operation::new("Q", vec![]));
    }
    resources.set("XObject", Object::Dictionary(xobjects));
    ensure_form_subtypes(doc, placements);

    let mut prefix = Content { operations: vec![Operation::new("q", vec![])] }.encode()?;
    prefix.push(b'\n');
    let mut suffix = vec![b'\n'];
    suffix.extend(Content { operations: drawing }.encode()?);
    suffix.push(b'\n');

    let prefix_id = doc.add_object(Stream::new(Dictionary::new(), prefix));
    let suffix_id = doc.add_object(Stream::new(Dictionary::new(), suffix));

    let mut contents = vec![Object::Reference(prefix_id)];
    contents.extend(doc.get_page_contents(page_id).into_iter().map(Object::Reference));
    contents.push(Object::Reference(suffix_id));

    let page = doc.get_dictionary_mut(page_id)?;
    page.set("Contents", contents);
    page.set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// The page's effective resources as an owned dictionary, inherited ones included.
fn page_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    let mut node = doc.get_dictionary(page_id).ok();
    while let Some(dict) = node {
        if let Ok(resources) = dict.get(b"Resources") {
            return resolve(doc, resources).as_dict().cloned().unwrap_or_default();
        }
        node = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .and_then(|id| doc.get_dictionary(id))
            .ok();
    }
    Dictionary::new()
}

/// Appearance streams must be usable as Form XObjects.
fn ensure_form_subtypes(doc: &mut Document, placements: &[Placement]) {
    for placement in placements {
        if let Ok(Object::Stream(stream)) = doc.get_object_mut(placement.appearance) {
            if !stream.dict.has(b"Subtype") {
                stream.dict.set("Subtype", "Form");
            }
            if !stream.dict.has(b"Type") {
                stream.dict.set("Type", "XObject");
            }
        }
    }
}
