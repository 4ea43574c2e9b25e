mod error;
mod fonts;
mod model;
mod pdf;

pub mod form;

pub use error::Error;
pub use fonts::Face;
pub use model::{
    A4, Cell, DocumentFrame, DynamicOptions, HeadingStyle, LayoutConfig, Margins, PLACEHOLDER, Row,
    Section, SectionBody, Stroke, Table, TableStrategy, cell_text,
};
pub use pdf::{
    AutoFitTable, AutoLayout, AutoLayoutError, AutoLayoutStyle, Checkpoint, DrawOp,
    LaidOutDocument, Page, PageCanvas, Rect, Renderer, TextRun,
};

use std::path::Path;
use std::time::Instant;

use form::{AuxiliaryFields, MainDetails};

/// Render the Annexure-I document for one submitted form with the default
/// renderer. Pages are A4; sections whose strategy asks for auto layout are
/// drawn with dynamic rows.
pub fn generate_document(main: &MainDetails, aux: &AuxiliaryFields) -> Result<Vec<u8>, Error> {
    generate_document_with(&Renderer::default(), main, aux)
}

pub fn generate_document_with(
    renderer: &Renderer,
    main: &MainDetails,
    aux: &AuxiliaryFields,
) -> Result<Vec<u8>, Error> {
    let sections = form::annexure_sections(main, aux);
    renderer.render(&form::annexure_frame(), &sections)
}

/// Parse a flat form body from JSON text and render its annexure.
pub fn convert_form_json(json: &str, renderer: &Renderer) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();

    let (main, aux) = form::parse_form(json)?;
    let t_parse = t0.elapsed();

    let bytes = generate_document_with(renderer, &main, &aux)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_total - t_parse).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(bytes)
}

pub fn convert_form_file(input: &Path, output: &Path, renderer: &Renderer) -> Result<(), Error> {
    let t0 = Instant::now();

    let json = std::fs::read_to_string(input)?;
    let bytes = convert_form_json(&json, renderer)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes)?;
    let t_total = t0.elapsed();

    log::info!(
        "Wrote {} ({} bytes): read+render={:.1}ms, write={:.1}ms",
        output.display(),
        bytes.len(),
        t_render.as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
    );

    Ok(())
}
