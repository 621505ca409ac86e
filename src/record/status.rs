/// Recognized inspection status values. `Unset` is the empty string, a row
/// whose outcome has not been assessed yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Unset,
    Ok,
    NotOk,
    Pending,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Unset, Status::Ok, Status::NotOk, Status::Pending];

    pub fn as_str(&self) -> &str {
        match self {
            Status::Unset => "",
            Status::Ok => "OK",
            Status::NotOk => "NOT OK",
            Status::Pending => "PENDING",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" => Some(Status::Unset),
            "ok" => Some(Status::Ok),
            "not ok" => Some(Status::NotOk),
            "pending" => Some(Status::Pending),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_tolerant() {
        assert_eq!(Status::from_str("ok"), Some(Status::Ok));
        assert_eq!(Status::from_str(" NOT OK "), Some(Status::NotOk));
        assert_eq!(Status::from_str(""), Some(Status::Unset));
        assert_eq!(Status::from_str("done"), None);
    }

    #[test]
    fn round_trips_through_as_str() {
        for status in Status::ALL {
            assert_eq!(Status::from_str(status.as_str()), Some(status));
        }
    }
}
