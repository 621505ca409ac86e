use crate::record::Field;

/// Resolved mapping from logical fields to physical column indexes for one
/// concrete header row. Built once per load and reused wherever a field has
/// to be located in a row.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    slots: [Option<usize>; Field::ALL.len()],
}

impl Layout {
    /// Resolve `columns` against the alias lists of every logical field.
    pub fn resolve(columns: &[String]) -> Self {
        let mut slots = [None; Field::ALL.len()];
        for field in Field::ALL {
            slots[field as usize] = super::resolve(columns, field.aliases());
        }
        Layout { slots }
    }

    /// Column index backing `field`, if any column matched an alias.
    pub fn index(&self, field: Field) -> Option<usize> {
        self.slots[field as usize]
    }

    /// Fields with no backing column at all. Callers treat these as empty
    /// for every row.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|field| self.index(*field).is_none())
            .collect()
    }
}
