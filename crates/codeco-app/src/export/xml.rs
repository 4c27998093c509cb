//! EDI to SAP XML conversion
//!
//! Produces the `SAP_CODECO_REPORT_MT` document the SAP proxy ingests: one
//! `Records/Header` and one `Records/Item` per message.

use std::io::Cursor;

use chrono::NaiveDateTime;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;

use codeco_domain::model::COMPONENT_SEPARATOR;
use codeco_domain::service::decode;
use codeco_types::{Error, ParsedMessage, Result};

const NS_N0: &str = "urn:olam.com:IVC:EDIFACT:ONE";
const NS_PRX: &str = "urn:sap.com:proxy:GRP:/1SAI/TASC3DF160D1FCBB8D1B039:740";
const NS_SOAP_ENV: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Company code the SAP side books depot movements under
pub const DEFAULT_COMPANY_CODE: &str = "CIABJ31";
/// Creator recorded for messages imported from EDI
pub const EDI_IMPORT_USER: &str = "EDI_IMPORT";

// Static item fields expected by the receiving interface
const DESIGN: &str = "003";
const ITEM_TYPE: &str = "02";
const COLOR: &str = "#312682";
const CLEAN_TYPE: &str = "001";
const DEVICE_NUMBER: &str = "TD2019031200";

/// Flat view of one report item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XmlReport {
    pub company_code: String,
    pub plant: String,
    pub customer: String,
    pub weighbridge_id: String,
    pub weighbridge_id_sno: String,
    pub transporter: String,
    pub container_number: String,
    pub container_size: String,
    pub status: String,
    pub vehicle_number: String,
    pub created_date: String,
    pub created_time: String,
    pub created_by: String,
}

fn first_component(value: &str) -> &str {
    value.split(COMPONENT_SEPARATOR).next().unwrap_or("")
}

impl XmlReport {
    /// Map a decoded message; `at` stamps the weighbridge id and fills
    /// dates the message does not carry
    pub fn from_message(message: &ParsedMessage, at: NaiveDateTime, created_by: &str) -> Self {
        let plant = message
            .location("165")
            .or_else(|| message.location("87"))
            .map(|l| first_component(&l.id).to_string())
            .or_else(|| message.party("TO").map(|p| p.id.clone()))
            .unwrap_or_default();

        let customer = message
            .party("CF")
            .or_else(|| message.party("SH"))
            .map(|p| first_component(&p.id).to_string())
            .unwrap_or_default();

        let transporter = message
            .party("CA")
            .or_else(|| message.party("FR"))
            .map(|p| p.name.clone().unwrap_or_else(|| p.id.clone()))
            .unwrap_or_default();

        let details = &message.container_details;
        let status = details
            .equipment_type
            .clone()
            .or_else(|| details.status.clone())
            .unwrap_or_default();

        let (created_date, created_time) = message_datetime(message)
            .unwrap_or_else(|| (at.format("%Y%m%d").to_string(), at.format("%H%M%S").to_string()));

        Self {
            company_code: DEFAULT_COMPANY_CODE.to_string(),
            plant,
            customer,
            weighbridge_id: format!("WB{}", at.format("%Y%m%d%H%M%S")),
            weighbridge_id_sno: "00001".to_string(),
            transporter,
            container_number: details.number.clone().unwrap_or_default(),
            container_size: details.size.clone().unwrap_or_default(),
            status,
            // Not carried by CODECO
            vehicle_number: "UNKNOWN".to_string(),
            created_date,
            created_time,
            created_by: created_by.to_string(),
        }
    }

    /// Serialize as an indented XML document
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;

        let mut root = BytesStart::new("n0:SAP_CODECO_REPORT_MT");
        root.push_attribute(("xmlns:n0", NS_N0));
        root.push_attribute(("xmlns:prx", NS_PRX));
        root.push_attribute(("xmlns:soap-env", NS_SOAP_ENV));
        writer.write_event(Event::Start(root)).map_err(xml_error)?;
        start(&mut writer, "Records")?;

        start(&mut writer, "Header")?;
        text_element(&mut writer, "Company_Code", &self.company_code)?;
        text_element(&mut writer, "Plant", &self.plant)?;
        text_element(&mut writer, "Customer", &self.customer)?;
        end(&mut writer, "Header")?;

        start(&mut writer, "Item")?;
        let item = [
            ("Weighbridge_ID", self.weighbridge_id.as_str()),
            ("Weighbridge_ID_SNO", self.weighbridge_id_sno.as_str()),
            ("Transporter", self.transporter.as_str()),
            ("Container_Number", self.container_number.as_str()),
            ("Container_Size", self.container_size.as_str()),
            ("Design", DESIGN),
            ("Type", ITEM_TYPE),
            ("Color", COLOR),
            ("Clean_Type", CLEAN_TYPE),
            ("Status", self.status.as_str()),
            ("Device_Number", DEVICE_NUMBER),
            ("Vehicle_Number", self.vehicle_number.as_str()),
            ("Created_Date", self.created_date.as_str()),
            ("Created_Time", self.created_time.as_str()),
            ("Created_By", self.created_by.as_str()),
            ("Changed_Date", self.created_date.as_str()),
            ("Changed_Time", self.created_time.as_str()),
            ("Changed_By", self.created_by.as_str()),
            ("Num_Of_Entries", "1"),
        ];
        for (name, value) in item {
            text_element(&mut writer, name, value)?;
        }
        end(&mut writer, "Item")?;

        end(&mut writer, "Records")?;
        end(&mut writer, "n0:SAP_CODECO_REPORT_MT")?;

        String::from_utf8(writer.into_inner().into_inner()).map_err(xml_error)
    }
}

/// Creation date/time from DTM: 137 (CCYYMMDDHHMMSS) or 203 (CCYYMMDDHHMM)
fn message_datetime(message: &ParsedMessage) -> Option<(String, String)> {
    if let Some(dtm) = message
        .date("137")
        .filter(|d| d.value.len() >= 14 && d.value.is_ascii())
    {
        return Some((dtm.value[..8].to_string(), dtm.value[8..14].to_string()));
    }
    message
        .date("203")
        .filter(|d| d.value.len() >= 12 && d.value.is_ascii())
        .map(|d| (d.value[..8].to_string(), format!("{}00", &d.value[8..12])))
}

fn xml_error(e: impl std::fmt::Display) -> Error {
    Error::Xml(e.to_string())
}

fn start(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)
}

fn end(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)
}

fn text_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str, value: &str) -> Result<()> {
    start(writer, name)?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(xml_error)?;
    end(writer, name)
}

/// Decode EDI content and render it as the SAP report
pub fn convert_edi_to_xml(content: &str, at: NaiveDateTime, created_by: &str) -> Result<String> {
    let message = decode(content)?;
    XmlReport::from_message(&message, at, created_by).to_xml()
}

/// `CODECO_<customer>_<YYYYMMDDHHMMSS>_<created_by>.xml`
pub fn xml_file_name(customer: &str, created_by: &str, at: NaiveDateTime) -> String {
    format!(
        "CODECO_{}_{}_{}.xml",
        customer,
        at.format("%Y%m%d%H%M%S"),
        created_by
    )
}
