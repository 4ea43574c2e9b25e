mod common;

use annexure_pdf::form::{self, AuxiliaryFields, NO_SPECIALTIES};
use annexure_pdf::{DrawOp, Face, LaidOutDocument, LayoutConfig, Renderer};
use serde_json::{Value, json};

const SECTION_TITLES: [&str; 15] = [
    "A. Details of the Hospital",
    "Medical Superintendent Details:",
    "B. Details of NABH Accreditation",
    "C. Details of Services Applied for",
    "D. Availability of Doctors",
    "E. Details of Nursing Care",
    "F. Details of Other Staff",
    "G. Infrastructure Details of the Hospital",
    "H. Details of Laboratory Services",
    "I. Details of Imaging Facilities",
    "J. Details of Operation Theatres",
    "K. Details of Supportive Services",
    "L. Details of other Tie Ups",
    "M. Details of Biomedical Waste Management",
    "N. Details of Hospital Bank Account",
];

fn layout(main: &form::MainDetails, aux: &AuxiliaryFields) -> LaidOutDocument {
    let sections = form::annexure_sections(main, aux);
    Renderer::default()
        .layout(&form::annexure_frame(), &sections)
        .expect("layout annexure")
}

fn many_specialties(n: usize) -> Value {
    let list: Vec<Value> = (0..n)
        .map(|i| json!({"name": format!("Specialty {i}"), "head": format!("Dr. Head {i}")}))
        .collect();
    Value::Array(list)
}

fn section_titles(doc: &LaidOutDocument) -> Vec<String> {
    common::all_texts(doc)
        .into_iter()
        .filter(|t| SECTION_TITLES.contains(&t.as_str()))
        .collect()
}

#[test]
fn sections_follow_form_order() {
    let _ = env_logger::try_init();
    let (main, aux) = common::fixture_form();
    let doc = layout(&main, &aux);
    assert_eq!(section_titles(&doc), SECTION_TITLES);
}

#[test]
fn long_address_wraps_without_losing_text() {
    let address = "Plot No. 12-3-456, Road No. 10, Banjara Hills, Near City Centre Mall, \
                   Hyderabad, Telangana 500034, India";
    let (mut main, aux) = common::fixture_form();
    main.address = Some(address.to_string());
    let texts = common::all_texts(&layout(&main, &aux));

    let start = texts.iter().position(|t| t == "Address of the Hospital").unwrap() + 1;
    let end = texts.iter().position(|t| t == "Telephone No.").unwrap();
    assert!(end - start > 1, "address was not wrapped");
    let drawn = texts[start..end].join(" ");
    assert_eq!(drawn, address);
    assert!(!drawn.contains('\u{2026}'));
}

#[test]
fn title_and_footer_frame_the_document() {
    let (main, aux) = common::fixture_form();
    let doc = layout(&main, &aux);
    let first = common::page_texts(&doc.pages()[0]);
    assert_eq!(first[0], form::TITLE);
    assert_eq!(first[1], form::SUBTITLE);
    let last = common::page_texts(&doc.pages()[doc.page_count() - 1]);
    assert_eq!(last.last().map(String::as_str), Some(form::FOOTER));

    let footer = doc.pages()[doc.page_count() - 1].text_runs().last().unwrap();
    assert_eq!(footer.face, Face::HelveticaOblique);
    assert_eq!(footer.color, [0x66, 0x66, 0x66]);
}

#[test]
fn long_specialty_list_redraws_the_header_on_every_page() {
    let _ = env_logger::try_init();
    let (main, aux) = common::form_with("specialties", Some(many_specialties(120)));
    let doc = layout(&main, &aux);
    assert!(doc.page_count() >= 4, "got {} pages", doc.page_count());
    assert_eq!(section_titles(&doc), SECTION_TITLES);

    let mut pages_with_table = 0;
    for (i, page) in doc.pages().iter().enumerate() {
        let texts = common::page_texts(page);
        let Some(pos) = texts.iter().position(|t| t == "S.No") else {
            continue;
        };
        pages_with_table += 1;
        assert_eq!(
            &texts[pos..pos + 3],
            ["S.No", "Name of the Specialty", "Head of the Department"],
            "page {i}"
        );
        if i > 0 {
            assert_eq!(pos, 0, "header is not the first text on page {i}");
        }
    }
    assert!(pages_with_table >= 3);

    let numbers: Vec<usize> = common::all_texts(&doc)
        .iter()
        .filter_map(|t| t.parse().ok())
        .filter(|n| (1..=120).contains(n))
        .collect();
    let expected: Vec<usize> = (1..=120).collect();
    assert!(
        numbers.windows(120).any(|w| w == expected.as_slice()),
        "row numbers out of order"
    );
}

#[test]
fn table_borders_stay_inside_the_margins() {
    let (main, aux) = common::form_with("specialties", Some(many_specialties(90)));
    let doc = layout(&main, &aux);
    let config = LayoutConfig::default();
    let (top, bottom) = (config.page_top(), config.page_bottom());
    for (i, page) in doc.pages().iter().enumerate() {
        for op in page.ops() {
            match op {
                DrawOp::StrokeRect { rect, .. } => {
                    assert!(rect.y >= top - 1e-3 && rect.bottom() <= bottom + 1e-3, "page {i}");
                    assert!(rect.height > 0.0);
                }
                DrawOp::Line { from, to, .. } => {
                    assert!(from.1 <= bottom + 1e-3 && to.1 <= bottom + 1e-3, "page {i}");
                }
                _ => {}
            }
        }
    }
}

#[test]
fn unparseable_specialties_print_the_placeholder() {
    let (main, aux) = common::form_with("specialties", Some(json!("not json")));
    let texts = common::all_texts(&layout(&main, &aux));
    let heading = texts
        .iter()
        .position(|t| t == "C. Details of Services Applied for")
        .unwrap();
    assert_eq!(texts[heading + 1], NO_SPECIALTIES);
    assert!(!texts.iter().any(|t| t == "S.No"));
}

#[test]
fn empty_auxiliary_fields_print_placeholders() {
    let (main, _) = common::fixture_form();
    let doc = layout(&main, &AuxiliaryFields::new());
    let texts = common::all_texts(&doc);

    let value_of = |label: &str| {
        let i = texts.iter().position(|t| t == label).unwrap();
        texts[i + 1].clone()
    };
    assert_eq!(value_of("Name of the Hospital"), "Sri Lakshmi Multispeciality Hospital");
    assert_eq!(value_of("City where Hospital is located"), "Hyderabad");
    assert_eq!(value_of("Fax Number"), "N/A");
    assert_eq!(value_of("Email ID"), "ms@srilakshmi.example");

    // B, D..N hold 58 value cells between them; A has one empty field (fax)
    let placeholders = texts.iter().filter(|t| *t == "N/A").count();
    assert_eq!(placeholders, 58 + 1);
    assert!(texts.iter().any(|t| t == NO_SPECIALTIES));
}

#[test]
fn scalar_values_render_as_json_text() {
    let (main, aux) = common::fixture_form();
    let texts = common::all_texts(&layout(&main, &aux));
    let value_of = |label: &str| {
        let i = texts.iter().position(|t| t == label).unwrap();
        texts[i + 1].clone()
    };
    assert_eq!(value_of("Total No. of Beds"), "250");
    assert_eq!(value_of("Average Bed Occupancy (%)"), "78.5");
    assert_eq!(value_of("Whether there is separate OT for Septic Cases"), "true");
    assert_eq!(value_of("Microbiology"), "N/A");
}

#[test]
fn overflow_thresholds_start_new_pages() {
    let (main, aux) = common::fixture_form();
    let sections = form::annexure_sections_with(
        &main,
        &aux,
        form::AnnexureThresholds {
            staffing: 0.0,
            services: 0.0,
        },
    );
    let doc = Renderer::default()
        .layout(&form::annexure_frame(), &sections)
        .unwrap();
    for title in ["D.", "F.", "H.", "L."] {
        let page = doc
            .pages()
            .iter()
            .find(|p| p.texts().any(|t| t.starts_with(title)))
            .unwrap();
        assert!(
            page.texts().next().unwrap().starts_with(title),
            "{title} does not open its page"
        );
    }
}

#[test]
fn keep_with_next_never_strands_a_heading() {
    let (main, aux) = common::form_with("specialties", Some(many_specialties(37)));
    let doc = layout(&main, &aux);
    for (i, page) in doc.pages().iter().enumerate() {
        let texts = common::page_texts(page);
        if let Some(last_heading) = texts.iter().rposition(|t| SECTION_TITLES.contains(&t.as_str())) {
            assert!(
                last_heading + 1 < texts.len(),
                "heading {:?} is the last text on page {i}",
                texts[last_heading]
            );
        }
    }
}
