use super::*;

fn sample() -> SrvData {
    SrvData {
        target: "n1.example.com.".to_owned(),
        port: 26257,
        priority: 1000,
        weight: 0,
    }
}

#[test]
fn srv_payload_uses_presentation_order() {
    let record = DnsRecord::srv("_system-sql._tcp.c.example.com", &sample());
    assert_eq!(record.record_type, DnsRecordType::Srv);
    assert_eq!(record.data, "1000 0 26257 n1.example.com.");
}

#[test]
fn parse_srv_recovers_built_data() {
    let record = DnsRecord::srv("_system-sql._tcp.c.example.com", &sample());
    assert_eq!(record.parse_srv().unwrap(), sample());
}

#[test]
fn parse_srv_tolerates_extra_whitespace() {
    let record = DnsRecord {
        name: "x".to_owned(),
        record_type: DnsRecordType::Srv,
        data: "  0  5 8080   host.  ".to_owned(),
    };
    let data = record.parse_srv().unwrap();
    assert_eq!(data.priority, 0);
    assert_eq!(data.weight, 5);
    assert_eq!(data.port, 8080);
    assert_eq!(data.target, "host.");
}

#[test]
fn parse_srv_rejects_non_srv_records() {
    let record = DnsRecord {
        name: "x".to_owned(),
        record_type: DnsRecordType::A,
        data: "10.0.0.1".to_owned(),
    };
    assert!(matches!(
        record.parse_srv(),
        Err(RecordParseError::WrongType {
            actual: DnsRecordType::A,
            ..
        })
    ));
}

#[test]
fn parse_srv_rejects_missing_fields() {
    let record = DnsRecord {
        name: "x".to_owned(),
        record_type: DnsRecordType::Srv,
        data: "0 0 8080".to_owned(),
    };
    assert!(matches!(
        record.parse_srv(),
        Err(RecordParseError::FieldCount {
            expected: 4,
            actual: 3
        })
    ));
}

#[test]
fn parse_srv_rejects_out_of_range_port() {
    let record = DnsRecord {
        name: "x".to_owned(),
        record_type: DnsRecordType::Srv,
        data: "0 0 70000 host.".to_owned(),
    };
    assert!(matches!(
        record.parse_srv(),
        Err(RecordParseError::InvalidField { field: "port", .. })
    ));
}

#[test]
fn record_type_serializes_uppercase() {
    let json = serde_json::to_value(DnsRecordType::Srv).unwrap();
    assert_eq!(json, serde_json::json!("SRV"));
    assert_eq!(DnsRecordType::Aaaa.to_string(), "AAAA");
}
