//! Export: SAP XML from EDI, Excel from batch reports

pub mod excel;
pub mod xml;

pub use excel::export_to_excel;
pub use xml::{convert_edi_to_xml, xml_file_name, XmlReport, EDI_IMPORT_USER};
