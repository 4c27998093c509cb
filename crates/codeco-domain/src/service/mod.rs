//! Domain services: encode, decode and check CODECO messages

pub mod clock;
pub mod decoder;
pub mod encoder;
pub mod file_name;
pub mod location;
pub mod policy;
pub mod record_check;
pub mod validator;

pub use clock::{Clock, ControlReferences, FixedClock, SystemClock};
pub use decoder::decode;
pub use encoder::{CodecoEncoder, EncoderSettings};
pub use file_name::edi_file_name;
pub use location::{
    LocationRule, LocationTable, DEFAULT_LOCATION_CODE, DEFAULT_LOCATION_DETAIL,
    ONEY_LOCATION_DETAIL, PIL_LOCATION_DETAIL,
};
pub use policy::{EquipmentStatusPolicy, ReferenceQualifier, SegmentPolicy};
pub use record_check::{check_record, is_valid_container_number, RecordIssue};
pub use validator::validate;
