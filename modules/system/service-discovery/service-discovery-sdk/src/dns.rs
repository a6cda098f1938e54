//! DNS record shapes exchanged with [`DnsProvider`](crate::api::DnsProvider)s.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RecordParseError;

/// Record type of a [`DnsRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    A,
    Aaaa,
    Cname,
    Srv,
    Txt,
}

impl fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Srv => "SRV",
            Self::Txt => "TXT",
        };
        f.write_str(s)
    }
}

/// A name-resolution record as stored by a provider.
///
/// `data` holds the record payload in zone-file presentation format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DnsRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    pub data: String,
}

/// Parsed payload of an SRV record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SrvData {
    /// Host that serves the record, terminated with `.`.
    pub target: String,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
}

impl fmt::Display for SrvData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.priority, self.weight, self.port, self.target
        )
    }
}

impl DnsRecord {
    /// Build an SRV record.
    #[must_use]
    pub fn srv(name: impl Into<String>, data: &SrvData) -> Self {
        Self {
            name: name.into(),
            record_type: DnsRecordType::Srv,
            data: data.to_string(),
        }
    }

    #[must_use]
    pub fn is_srv(&self) -> bool {
        self.record_type == DnsRecordType::Srv
    }

    /// Parse the payload as `"{priority} {weight} {port} {target}"`.
    ///
    /// # Errors
    /// Returns `RecordParseError` if the record is not SRV, has the wrong
    /// number of fields, or a numeric field is out of range.
    pub fn parse_srv(&self) -> Result<SrvData, RecordParseError> {
        if !self.is_srv() {
            return Err(RecordParseError::WrongType {
                expected: DnsRecordType::Srv,
                actual: self.record_type,
            });
        }

        let fields: Vec<&str> = self.data.split_whitespace().collect();
        let [priority, weight, port, target] = fields.as_slice() else {
            return Err(RecordParseError::FieldCount {
                expected: 4,
                actual: fields.len(),
            });
        };

        Ok(SrvData {
            priority: parse_u16("priority", priority)?,
            weight: parse_u16("weight", weight)?,
            port: parse_u16("port", port)?,
            target: (*target).to_owned(),
        })
    }
}

fn parse_u16(field: &'static str, value: &str) -> Result<u16, RecordParseError> {
    value.parse().map_err(|_| RecordParseError::InvalidField {
        field,
        value: value.to_owned(),
    })
}

#[cfg(test)]
#[path = "dns_tests.rs"]
mod tests;
