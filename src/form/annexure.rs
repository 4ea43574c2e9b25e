use super::{AuxiliaryFields, MainDetails, parse_specialties, scalar_text};
use crate::model::{DocumentFrame, DynamicOptions, Section, Table, TableStrategy};

pub const TITLE: &str = "Annexure \u{2013} I";
pub const SUBTITLE: &str = "Details of Hospital for Empanelment";
pub const FOOTER: &str = "Generated by Hospital Enrollment System";
pub const NO_SPECIALTIES: &str = "No specialties provided";

/// Cursor positions past which a section starts on a fresh page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnnexureThresholds {
    /// Before D (doctors) and F (other staff).
    pub staffing: f32,
    /// Before H (laboratory) and L (tie ups).
    pub services: f32,
}

impl Default for AnnexureThresholds {
    fn default() -> Self {
        Self {
            staffing: 720.0,
            services: 650.0,
        }
    }
}

pub fn annexure_frame() -> DocumentFrame {
    DocumentFrame {
        title: TITLE.into(),
        subtitle: Some(SUBTITLE.into()),
        footer: Some(FOOTER.into()),
    }
}

fn pairs(headers: [&str; 2], aux: &AuxiliaryFields, rows: &[(&str, &str)]) -> Table {
    let mut table = Table::new(headers);
    for (label, key) in rows {
        table.push_pair(label, scalar_text(aux.get(*key)));
    }
    table
}

fn fixed(title: &str, table: Table) -> Section {
    Section::table(title, table, TableStrategy::FixedRow)
}

fn services_applied(aux: &AuxiliaryFields) -> Section {
    const HEADING: &str = "C. Details of Services Applied for";
    let specialties = parse_specialties(aux.get("specialties"));
    if specialties.is_empty() {
        return Section::placeholder(HEADING, NO_SPECIALTIES);
    }
    let mut table = Table::new(["S.No", "Name of the Specialty", "Head of the Department"])
        .with_widths(vec![40.0, 300.0, 175.0]);
    for (i, s) in specialties.into_iter().enumerate() {
        table.push_row(vec![Some((i + 1).to_string()), s.name, s.head]);
    }
    Section::table(HEADING, table, TableStrategy::AutoLayout(DynamicOptions::default()))
}

/// Sections of the Annexure-I form in print order with the default
/// page-break thresholds.
pub fn annexure_sections(main: &MainDetails, aux: &AuxiliaryFields) -> Vec<Section> {
    annexure_sections_with(main, aux, AnnexureThresholds::default())
}

pub fn annexure_sections_with(
    main: &MainDetails,
    aux: &AuxiliaryFields,
    thresholds: AnnexureThresholds,
) -> Vec<Section> {
    let mut hospital = Table::new(["Field", "Details"]);
    hospital.push_pair("Name of the Hospital", main.name.clone());
    hospital.push_pair("City where Hospital is located", main.city.clone());
    hospital.push_pair("Address of the Hospital", main.address.clone());
    hospital.push_pair("Telephone No.", main.telephone.clone());
    hospital.push_pair("Mobile No.", main.mobile.clone());
    hospital.push_pair("Fax Number", main.fax.clone());
    hospital.push_pair("Email Address", main.email.clone());

    let mut superintendent = Table::new(["Field", "Details"]);
    superintendent.push_pair("Name of Medical Superintendent/RMO", main.superintendent_name.clone());
    superintendent.push_pair("Contact Details", main.superintendent_contact.clone());
    superintendent.push_pair("Email ID", main.superintendent_email.clone());
    superintendent.push_pair("Telephone No./Mobile No.", main.superintendent_phone.clone());

    let dynamic = DynamicOptions::default();

    vec![
        Section::table("A. Details of the Hospital", hospital, TableStrategy::DynamicRow(dynamic)),
        Section::table(
            "Medical Superintendent Details:",
            superintendent,
            TableStrategy::DynamicRow(dynamic),
        )
        .subsection(),
        fixed(
            "B. Details of NABH Accreditation",
            pairs(["Parameter", "Status"], aux, &[("Whether NABH Accredited", "nabh_accredited")]),
        ),
        services_applied(aux),
        fixed(
            "D. Availability of Doctors",
            pairs(
                ["Category", "Number"],
                aux,
                &[
                    ("Number of Full time Specialists", "full_time_specialists"),
                    ("Number of Duty Doctors", "duty_doctors"),
                    ("Number of Resident Medical Officers", "resident_medical_officers"),
                    ("Number of Super specialists (if any)", "super_specialists"),
                    ("Number of Doctors on Call", "doctors_on_call"),
                ],
            ),
        )
        .break_below(thresholds.staffing),
        fixed(
            "E. Details of Nursing Care",
            pairs(
                ["Parameter", "Details"],
                aux,
                &[
                    ("Total No of Nurses", "total_nurses"),
                    ("Name of the Nursing Superintendent", "nursing_superintendent"),
                    (
                        "Patient: Nurse Ratio - General Ward (Norm 6:1)",
                        "patient_nurse_ratio_general",
                    ),
                    ("Patient: Nurse Ratio - ICCU/ICU (Norm 1:1)", "patient_nurse_ratio_icu"),
                ],
            ),
        ),
        fixed(
            "F. Details of Other Staff",
            pairs(
                ["Staff Category", "Number"],
                aux,
                &[
                    ("No of Lab Technicians", "lab_technicians"),
                    ("No of Radiographers", "radiographers"),
                    ("No of Physiotherapists", "physiotherapists"),
                    ("No of Dieticians", "dieticians"),
                    ("No of Administrative Staff", "admin_staff"),
                    ("No of House Keeping Staff", "house_keeping"),
                    ("No of Security Personnel", "security"),
                ],
            ),
        )
        .break_below(thresholds.staffing),
        fixed(
            "G. Infrastructure Details of the Hospital",
            pairs(
                ["Infrastructure Parameter", "Details"],
                aux,
                &[
                    ("Total No. of Beds", "total_beds"),
                    ("No of Beds in the Casualty/Emergency", "casualty_beds"),
                    ("No of Beds in ICCU/ICU/HDU", "icu_beds"),
                    ("No of Ventilators", "ventilators"),
                    ("No of General Ward Beds", "general_ward_beds"),
                    ("Average Daily OPD Attendance", "avg_opd_attendance"),
                    ("Average Bed Occupancy (%)", "avg_bed_occupancy"),
                    ("Total Area of the Hospital (sq ft)", "total_area"),
                    ("Area allotted to the OPD (sq ft)", "opd_area"),
                    ("Area allotted to the IPD (sq ft)", "ipd_area"),
                    ("No of Wards", "wards"),
                    ("Dimensions of the Wards", "ward_dimensions"),
                    ("Alternate Power Source", "alt_power"),
                ],
            ),
        ),
        fixed(
            "H. Details of Laboratory Services",
            pairs(
                ["Department", "Head of the Department"],
                aux,
                &[
                    ("Biochemistry", "biochemistry_head"),
                    ("Pathology", "pathology_head"),
                    ("Microbiology", "microbiology_head"),
                ],
            ),
        )
        .break_below(thresholds.services),
        fixed(
            "I. Details of Imaging Facilities",
            pairs(
                ["Facility", "Available (YES/NO)"],
                aux,
                &[
                    ("X Ray", "xray"),
                    ("Ultrasonography", "ultrasonography"),
                    ("Mammography", "mammography"),
                    ("CT Scan", "ct_scan"),
                    ("MRI Scan", "mri_scan"),
                ],
            ),
        ),
        fixed(
            "J. Details of Operation Theatres",
            pairs(
                ["Parameter", "Details"],
                aux,
                &[
                    ("Number of Operation Theatres", "operation_theatres"),
                    ("Whether there is separate OT for Septic Cases", "septic_ot"),
                    ("Whether OT facility available around the Clock", "ot_24x7"),
                ],
            ),
        ),
        fixed(
            "K. Details of Supportive Services",
            pairs(
                ["Service", "Available (YES/NO)"],
                aux,
                &[
                    ("Blood Bank", "blood_bank"),
                    ("24 Hour Pharmacy", "pharmacy_24hr"),
                    ("Physiotherapy", "physiotherapy"),
                    ("CSSD", "cssd"),
                    ("In-house Canteen", "canteen"),
                    ("Gas Plant", "gas_plant"),
                    ("Medical Records Department", "medical_records"),
                ],
            ),
        ),
        Section::table(
            "L. Details of other Tie Ups",
            pairs(
                ["Tie Up Category", "Status/Details"],
                aux,
                &[
                    ("Whether your hospital is empaneled with CGHS", "empaneled_cghs"),
                    (
                        "Whether your hospital is recognized by State Govt. for Aarogyasri/EHS",
                        "recognized_aarogyasri",
                    ),
                    ("Any Tie Up with TPIs", "tpi_tieup"),
                ],
            )
            .with_widths(vec![300.0, 215.0]),
            TableStrategy::AutoLayout(dynamic),
        )
        .break_below(thresholds.services),
        Section::table(
            "M. Details of Biomedical Waste Management",
            pairs(
                ["Parameter", "Details"],
                aux,
                &[
                    (
                        "Whether your hospital is following the Biomedical waste management as per statutory requirements",
                        "biomedical_waste",
                    ),
                    ("Please Provide PCB License No", "pcb_license"),
                ],
            )
            .with_widths(vec![350.0, 165.0]),
            TableStrategy::DynamicRow(dynamic),
        ),
        fixed(
            "N. Details of Hospital Bank Account",
            pairs(
                ["Bank Details", "Information"],
                aux,
                &[
                    ("Name of the Bank", "bank_name"),
                    ("Branch of the Bank", "bank_branch"),
                    ("Account Number", "account_number"),
                    ("IFSC Code", "ifsc_code"),
                    ("MICR No.", "micr_no"),
                ],
            ),
        ),
    ]
}
