mod field;
mod status;

pub use field::{Field, OrderPolicy};
pub use status::Status;

/// One inspection entry. Values are kept as the strings that will be written
/// to the backing file; empty means "not recorded".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub line_no: String,
    pub test_pack_no: String,
    pub bolt_no: String,
    pub bolting_type: String,
    pub date: String,
    pub supervisor: String,
    pub torque_value: String,
    pub status: String,
    pub remarks: String,
}

impl Record {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::LineNo => &self.line_no,
            Field::TestPackNo => &self.test_pack_no,
            Field::BoltNo => &self.bolt_no,
            Field::BoltingType => &self.bolting_type,
            Field::Date => &self.date,
            Field::Supervisor => &self.supervisor,
            Field::TorqueValue => &self.torque_value,
            Field::Status => &self.status,
            Field::Remarks => &self.remarks,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::LineNo => self.line_no = value,
            Field::TestPackNo => self.test_pack_no = value,
            Field::BoltNo => self.bolt_no = value,
            Field::BoltingType => self.bolting_type = value,
            Field::Date => self.date = value,
            Field::Supervisor => self.supervisor = value,
            Field::TorqueValue => self.torque_value = value,
            Field::Status => self.status = value,
            Field::Remarks => self.remarks = value,
        }
    }
}
